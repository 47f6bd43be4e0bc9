//! SquashFS images, little endian variants only.  The superblock's
//! `bytes_used` field delimits the whole filesystem; extraction is delegated
//! to `unsquashfs`.

use std::path::Path;
use crate::binstruct::NamedStruct;
use crate::futil;
use super::{Classifier,Source,ExtractOptions};

const SIGNATURE: &[u8] = b"hsqs";

fn superblock() -> NamedStruct {
    NamedStruct::new("<",&[
        ("L","magic"),
        ("L","inode_count"),
        ("l","modification_time"),
        ("L","block_size"),
        ("L","fragment_entry_count"),
        ("H","compression_id"),
        ("H","block_log"),
        ("H","flags"),
        ("H","id_count"),
        ("H","version_major"),
        ("H","version_minor"),
        ("Q","root_inode_ref"),
        ("Q","bytes_used"),
        ("Q","id_table_start"),
        ("Q","xattr_id_table_start"),
        ("Q","inode_table_start"),
        ("Q","directory_table_start"),
        ("Q","fragment_table_start"),
        ("Q","export_table_start")
    ])
}

pub struct SquashFS;

impl Classifier for SquashFS {
    fn name(&self) -> &'static str {
        "squashfs"
    }
    fn scan<'a>(&self,chunk: &'a [u8]) -> Box<dyn Iterator<Item = usize> + 'a> {
        Box::new(futil::findall(chunk,SIGNATURE))
    }
    fn investigate(&self,infile: &mut dyn Source,offset: u64) -> Option<(u64,Option<u64>)> {
        let hdr = superblock().unpack_from(infile,Some(offset)).ok()?;
        Some((offset,Some(hdr.uint("bytes_used"))))
    }
    fn extract(&self,input_file: &mut dyn Source,start_offset: u64,file_length: Option<u64>,destination: &Path,_opts: &ExtractOptions) -> bool {
        super::extract_via_temp_file(input_file,start_offset,file_length,destination,".sqfs",&mut |archive,dest| {
            super::multi_file_extract(vec![
                "unsquashfs".to_string(),
                archive.to_string_lossy().to_string()
            ],dest)
        })
    }
}
