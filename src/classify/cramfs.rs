//! CramFS images.  The superblock's `size` field delimits the filesystem.
//! This is the one format decoded end-to-end in process: the carved image is
//! handed to `fs::cramfs` instead of an external tool.

use std::path::Path;
use log::warn;
use crate::fs::cramfs::{types,UncramFS};
use crate::futil;
use super::{Classifier,Source,ExtractOptions};

const SIGNATURE: &[u8] = &[0x45,0x3d,0xcd,0x28];

pub struct CramFS;

impl Classifier for CramFS {
    fn name(&self) -> &'static str {
        "cramfs"
    }
    fn scan<'a>(&self,chunk: &'a [u8]) -> Box<dyn Iterator<Item = usize> + 'a> {
        Box::new(futil::findall(chunk,SIGNATURE))
    }
    fn investigate(&self,infile: &mut dyn Source,offset: u64) -> Option<(u64,Option<u64>)> {
        let hdr = types::header().unpack_from(infile,Some(offset)).ok()?;
        if hdr.uint("magic") != types::MAGIC {
            return None;
        }
        Some((offset,Some(hdr.uint("size"))))
    }
    fn extract(&self,input_file: &mut dyn Source,start_offset: u64,file_length: Option<u64>,destination: &Path,_opts: &ExtractOptions) -> bool {
        super::extract_via_temp_file(input_file,start_offset,file_length,destination,".cramfs",&mut |archive,dest| {
            let f = match std::fs::File::open(archive) {
                Ok(f) => f,
                Err(e) => {
                    warn!("cannot reopen carved image: {}",e);
                    return false;
                }
            };
            match UncramFS::open(f) {
                Ok(mut ucfs) => match ucfs.uncram(dest) {
                    Ok(()) => true,
                    Err(e) => {
                        warn!("cramfs extraction into {} failed: {}",dest.display(),e);
                        false
                    }
                },
                Err(e) => {
                    warn!("carved image did not decode as cramfs: {}",e);
                    false
                }
            }
        })
    }
}
