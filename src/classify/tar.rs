//! tar archives.  The `ustar` signature sits at byte 0x101 of the first
//! header block, so the confirmed start is the candidate minus 0x101.  The
//! header checksum is not validated here; a stray `ustar` in a text file will
//! be caught by `tar` itself failing to extract.

use std::path::Path;
use crate::futil;
use super::{Classifier,Source,ExtractOptions};

const SIGNATURE: &[u8] = b"ustar";
/// position of the magic within a tar header block
const MAGIC_OFFSET: u64 = 0x101;

pub struct Tar;

impl Classifier for Tar {
    fn name(&self) -> &'static str {
        "tar"
    }
    fn scan<'a>(&self,chunk: &'a [u8]) -> Box<dyn Iterator<Item = usize> + 'a> {
        Box::new(futil::findall(chunk,SIGNATURE))
    }
    fn investigate(&self,_infile: &mut dyn Source,offset: u64) -> Option<(u64,Option<u64>)> {
        match offset.checked_sub(MAGIC_OFFSET) {
            Some(start) => Some((start,None)),
            None => None
        }
    }
    fn extract(&self,input_file: &mut dyn Source,start_offset: u64,file_length: Option<u64>,destination: &Path,_opts: &ExtractOptions) -> bool {
        super::extract_via_temp_file(input_file,start_offset,file_length,destination,".tar",&mut |archive,dest| {
            super::multi_file_extract(vec![
                "tar".to_string(),
                "-x".to_string(),
                "-f".to_string(),
                archive.to_string_lossy().to_string()
            ],dest)
        })
    }
}
