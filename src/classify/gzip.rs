//! gzip streams.  The two byte signature is weak, so confirmation asks the
//! external lister whether a valid member starts at the candidate.  Length
//! stays undetermined; `gunzip` consumes what it needs during extraction and
//! exit code 2 (trailing garbage warning) still counts as success.

use std::io::SeekFrom;
use std::path::Path;
use crate::futil;
use super::{Classifier,Source,ExtractOptions};

const SIGNATURE: &[u8] = &[0x1f,0x8b];

pub struct GZip;

impl Classifier for GZip {
    fn name(&self) -> &'static str {
        "gzip"
    }
    fn scan<'a>(&self,chunk: &'a [u8]) -> Box<dyn Iterator<Item = usize> + 'a> {
        Box::new(futil::findall(chunk,SIGNATURE))
    }
    fn investigate(&self,infile: &mut dyn Source,offset: u64) -> Option<(u64,Option<u64>)> {
        infile.seek(SeekFrom::Start(offset)).ok()?;
        match super::subprocess_probe(&["gunzip","-l"],infile) {
            true => Some((offset,None)),
            false => None
        }
    }
    fn extract(&self,input_file: &mut dyn Source,start_offset: u64,_file_length: Option<u64>,destination: &Path,opts: &ExtractOptions) -> bool {
        if input_file.seek(SeekFrom::Start(start_offset)).is_err() {
            return false;
        }
        super::stdout_decompress(&["gunzip"],&[0,2],input_file,destination,opts)
    }
}
