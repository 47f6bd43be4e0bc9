//! Bare zlib streams.  The signature is a `78` CMF byte followed by one of
//! the three common FLG values; there is nothing more to verify without
//! inflating, so investigation re-checks the pair and leaves the length
//! undetermined.

use std::io::SeekFrom;
use std::path::Path;
use crate::binstruct::NamedStruct;
use crate::futil;
use super::{Classifier,Source,ExtractOptions};

const CMF: [u8;1] = [0x78];
const FLG: [u8;3] = [0x01,0x9c,0xda];

fn header() -> NamedStruct {
    NamedStruct::new("",&[
        ("B","cmf"),
        ("B","flg")
    ])
}

pub struct Zlib;

impl Classifier for Zlib {
    fn name(&self) -> &'static str {
        "zlib"
    }
    fn scan<'a>(&self,chunk: &'a [u8]) -> Box<dyn Iterator<Item = usize> + 'a> {
        Box::new(futil::findall(chunk,&CMF).filter(move |at| {
            match chunk.get(*at + 1) {
                Some(flg) => FLG.contains(flg),
                None => false
            }
        }))
    }
    fn investigate(&self,infile: &mut dyn Source,offset: u64) -> Option<(u64,Option<u64>)> {
        let hdr = header().unpack_from(infile,Some(offset)).ok()?;
        if hdr.uint("cmf") as u8 != CMF[0] || !FLG.contains(&(hdr.uint("flg") as u8)) {
            return None;
        }
        Some((offset,None))
    }
    fn extract(&self,input_file: &mut dyn Source,start_offset: u64,_file_length: Option<u64>,destination: &Path,opts: &ExtractOptions) -> bool {
        if input_file.seek(SeekFrom::Start(start_offset)).is_err() {
            return false;
        }
        super::stdout_decompress(&["zlib-flate","-uncompress"],&[0],input_file,destination,opts)
    }
}
