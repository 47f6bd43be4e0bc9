//! U-Boot legacy images.  The 64 byte big endian header carries the payload
//! length, so the whole container is delimited without touching the payload.
//! Extraction is a bare carve of the payload behind the header; no external
//! decoder is involved.

use std::path::Path;
use crate::binstruct::NamedStruct;
use crate::futil;
use super::{Classifier,Source,ExtractOptions};

const SIGNATURE: &[u8] = &[0x27,0x05,0x19,0x56];

fn header() -> NamedStruct {
    NamedStruct::new(">",&[
        ("L","magic"),
        ("L","hdr_crc"),
        ("L","time"),
        ("L","size"),
        ("L","load_addr"),
        ("L","entry_point"),
        ("L","data_crc"),
        ("B","os"),
        ("B","arch"),
        ("B","img_type"),
        ("B","compression"),
        ("32s","img_name")
    ])
}

pub struct UBootImage;

impl Classifier for UBootImage {
    fn name(&self) -> &'static str {
        "uboot"
    }
    fn scan<'a>(&self,chunk: &'a [u8]) -> Box<dyn Iterator<Item = usize> + 'a> {
        Box::new(futil::findall(chunk,SIGNATURE))
    }
    fn investigate(&self,infile: &mut dyn Source,offset: u64) -> Option<(u64,Option<u64>)> {
        let layout = header();
        let hdr = layout.unpack_from(infile,Some(offset)).ok()?;
        Some((offset,Some(layout.size() as u64 + hdr.uint("size"))))
    }
    fn extract(&self,input_file: &mut dyn Source,start_offset: u64,_file_length: Option<u64>,destination: &Path,_opts: &ExtractOptions) -> bool {
        let layout = header();
        let hdr = match layout.unpack_from(input_file,Some(start_offset)) {
            Ok(hdr) => hdr,
            Err(_) => return false
        };
        super::carve_extract(input_file,start_offset + layout.size() as u64,Some(hdr.uint("size")),destination)
    }
}
