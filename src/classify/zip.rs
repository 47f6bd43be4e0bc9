//! PKZIP archives.  Scanning anchors on the end-of-central-directory record
//! near the end of the archive; the confirmed range is computed backwards
//! from it: the central directory must immediately precede the EOCD and the
//! archive begins `cd_size + cd_offset` bytes before it.

use std::path::Path;
use crate::binstruct::NamedStruct;
use crate::futil;
use super::{Classifier,Source,ExtractOptions};

const SIGNATURE: &[u8] = b"PK\x05\x06";
const CD_SIGNATURE: u64 = 0x2014b50;
/// fixed part of the EOCD record
const EOCD_SIZE: u64 = 0x16;

fn central_directory() -> NamedStruct {
    NamedStruct::new("",&[
        ("L","signature"),
        ("H","version"),
        ("H","version_needed"),
        ("H","flags"),
        ("H","compression"),
        ("H","mod_time"),
        ("H","mod_date"),
        ("L","crc32"),
        ("L","compressed_size"),
        ("L","uncompressed_size")
    ])
}

fn end_of_central_directory() -> NamedStruct {
    NamedStruct::new("",&[
        ("L","signature"),
        ("H","disk_number"),
        ("H","disk_number_with_cd"),
        ("H","disk_entries"),
        ("H","total_entries"),
        ("L","central_directory_size"),
        ("L","offset_of_central_directory"),
        ("H","comment_length")
    ])
}

pub struct PKZip;

impl Classifier for PKZip {
    fn name(&self) -> &'static str {
        "zip"
    }
    fn scan<'a>(&self,chunk: &'a [u8]) -> Box<dyn Iterator<Item = usize> + 'a> {
        Box::new(futil::findall(chunk,SIGNATURE))
    }
    fn investigate(&self,infile: &mut dyn Source,offset: u64) -> Option<(u64,Option<u64>)> {
        let eocd = end_of_central_directory().unpack_from(infile,Some(offset)).ok()?;
        let file_end_offset = offset + EOCD_SIZE + eocd.uint("comment_length");
        let cd_offset = offset.checked_sub(eocd.uint("central_directory_size"))?;
        let cd = central_directory().unpack_from(infile,Some(cd_offset)).ok()?;
        if cd.uint("signature") != CD_SIGNATURE {
            // CD does not precede EOCD
            return None;
        }
        let file_start_offset = cd_offset.checked_sub(eocd.uint("offset_of_central_directory"))?;
        let file_length = file_end_offset - file_start_offset;
        Some((file_start_offset,Some(file_length)))
    }
    fn extract(&self,input_file: &mut dyn Source,start_offset: u64,file_length: Option<u64>,destination: &Path,_opts: &ExtractOptions) -> bool {
        super::extract_via_temp_file(input_file,start_offset,file_length,destination,".zip",&mut |archive,dest| {
            super::multi_file_extract(vec![
                "unzip".to_string(),
                "-n".to_string(),
                archive.to_string_lossy().to_string()
            ],dest)
        })
    }
}
