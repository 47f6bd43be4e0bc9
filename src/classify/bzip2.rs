//! bzip2 streams.  Confirmation parses the stream header and checks the
//! compressed block magic `1AY&SY` behind it; length stays undetermined.

use std::io::SeekFrom;
use std::path::Path;
use crate::binstruct::NamedStruct;
use crate::futil;
use super::{Classifier,Source,ExtractOptions};

const SIGNATURE: &[u8] = b"BZh";

fn header() -> NamedStruct {
    NamedStruct::new("",&[
        ("h","magic"),
        ("s","version"),
        ("s","blocksize"),
        ("6s","compressed_magic"),
        ("L","crc")
    ])
}

pub struct BZip2;

impl Classifier for BZip2 {
    fn name(&self) -> &'static str {
        "bz2"
    }
    fn scan<'a>(&self,chunk: &'a [u8]) -> Box<dyn Iterator<Item = usize> + 'a> {
        Box::new(futil::findall(chunk,SIGNATURE))
    }
    fn investigate(&self,infile: &mut dyn Source,offset: u64) -> Option<(u64,Option<u64>)> {
        let hdr = header().unpack_from(infile,Some(offset)).ok()?;
        if hdr.bytes("compressed_magic") != b"1AY&SY" {
            return None;
        }
        Some((offset,None))
    }
    fn extract(&self,input_file: &mut dyn Source,start_offset: u64,_file_length: Option<u64>,destination: &Path,opts: &ExtractOptions) -> bool {
        if input_file.seek(SeekFrom::Start(start_offset)).is_err() {
            return false;
        }
        super::stdout_decompress(&["bzcat","--decompress"],&[0],input_file,destination,opts)
    }
}
