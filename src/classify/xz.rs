//! xz streams.  Like gzip, the only cheap confirmation is the decoder
//! itself: an integrity test bounded to the first stream.  Length stays
//! undetermined.

use std::io::SeekFrom;
use std::path::Path;
use crate::futil;
use super::{Classifier,Source,ExtractOptions};

const SIGNATURE: &[u8] = &[0xfd,0x37,0x7a,0x58,0x5a,0x00];

pub struct Xz;

impl Classifier for Xz {
    fn name(&self) -> &'static str {
        "xz"
    }
    fn scan<'a>(&self,chunk: &'a [u8]) -> Box<dyn Iterator<Item = usize> + 'a> {
        Box::new(futil::findall(chunk,SIGNATURE))
    }
    fn investigate(&self,infile: &mut dyn Source,offset: u64) -> Option<(u64,Option<u64>)> {
        infile.seek(SeekFrom::Start(offset)).ok()?;
        match super::subprocess_probe(&["xz","--test","--single-stream","-q"],infile) {
            true => Some((offset,None)),
            false => None
        }
    }
    fn extract(&self,input_file: &mut dyn Source,start_offset: u64,_file_length: Option<u64>,destination: &Path,opts: &ExtractOptions) -> bool {
        if input_file.seek(SeekFrom::Start(start_offset)).is_err() {
            return false;
        }
        super::stdout_decompress(&["xzcat","--single-stream"],&[0],input_file,destination,opts)
    }
}
