//! Dalvik executables.  The magic is `dex\n` followed by a three digit
//! version; the header states the file length at offset 0x20.  Extraction
//! hands the carved file to `dex2jar`.

use std::path::Path;
use crate::binstruct::NamedStruct;
use crate::futil;
use super::{Classifier,Source,ExtractOptions};

const SIGNATURE: &[u8] = b"dex\n";
/// file_size field position within the dex header
const SIZE_OFFSET: u64 = 0x20;

fn magic_header() -> NamedStruct {
    NamedStruct::new("",&[
        ("4s","magic"),
        ("3s","version")
    ])
}

fn size_field() -> NamedStruct {
    NamedStruct::new("",&[
        ("L","file_size")
    ])
}

pub struct Dex;

impl Classifier for Dex {
    fn name(&self) -> &'static str {
        "dex"
    }
    fn scan<'a>(&self,chunk: &'a [u8]) -> Box<dyn Iterator<Item = usize> + 'a> {
        Box::new(futil::findall(chunk,SIGNATURE))
    }
    fn investigate(&self,infile: &mut dyn Source,offset: u64) -> Option<(u64,Option<u64>)> {
        let hdr = magic_header().unpack_from(infile,Some(offset)).ok()?;
        if !hdr.bytes("version").iter().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let length = size_field().unpack_from(infile,Some(offset + SIZE_OFFSET)).ok()?.uint("file_size");
        Some((offset,Some(length)))
    }
    fn extract(&self,input_file: &mut dyn Source,start_offset: u64,file_length: Option<u64>,destination: &Path,_opts: &ExtractOptions) -> bool {
        super::extract_via_temp_file(input_file,start_offset,file_length,destination,".dex",&mut |archive,dest| {
            super::multi_file_extract(vec![
                "dex2jar".to_string(),
                "-o".to_string(),
                dest.to_string_lossy().to_string(),
                archive.to_string_lossy().to_string()
            ],dest)
        })
    }
}
