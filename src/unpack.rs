//! # Unpacker driver
//!
//! Streams an input file through every registered classifier and acts on the
//! confirmed matches.  The file is read in 1 MiB chunks that overlap by
//! 64 KiB, so a signature straddling a chunk boundary is still seen by the
//! following chunk.  Classifiers run in priority order and their sized
//! matches are deduplicated through an interval set: a byte range claimed by
//! a container cannot be claimed again by a lower priority classifier.
//!
//! Matches are acted on inline.  A confirmed range is carved when carving is
//! requested or the format has no inner payload; extraction runs unless
//! suppressed; a successful extraction may be fed back into the driver for
//! depth-first recursion.

use std::io::{Read,Seek,SeekFrom};
use std::path::{Path,PathBuf};
use log::{info,warn,debug,error};
use crate::classify::{self,Classifier,ExtractOptions};
use crate::intervals::{Interval,IntervalSet};
use crate::futil;
use crate::STDRESULT;

const CHUNKSIZE_BYTES: usize = 1024 * 1024;
const OVERLAP_BYTES: usize = 64 * 1024;

/// Toggles from the command line
#[derive(Clone,Copy,Default)]
pub struct UnpackOptions {
    /// carve the raw source bytes of every confirmed match
    pub carve: bool,
    /// do not extract payloads
    pub noextract: bool,
    /// recursively unpack extracted payloads
    pub recurse: bool,
    /// descend into directories (and extracted multi-file trees)
    pub recurse_multifiles: bool,
    /// cap on bytes forwarded to external decoders
    pub archive_limit: Option<u64>
}

pub struct FileUnpacker {
    active_classifiers: Vec<Box<dyn Classifier>>,
    opts: UnpackOptions,
    chunksize_bytes: usize,
    overlap_bytes: usize
}

impl FileUnpacker {
    pub fn new(opts: UnpackOptions) -> Self {
        Self {
            active_classifiers: classify::all(),
            opts,
            chunksize_bytes: CHUNKSIZE_BYTES,
            overlap_bytes: OVERLAP_BYTES
        }
    }
    /// Testing aid, shrink the chunk geometry so boundary handling can be
    /// exercised with small inputs.  Overlap must stay below the chunk size
    /// and at or above the longest signature.
    pub fn with_geometry(mut self,chunksize_bytes: usize,overlap_bytes: usize) -> Self {
        assert!(overlap_bytes < chunksize_bytes);
        self.chunksize_bytes = chunksize_bytes;
        self.overlap_bytes = overlap_bytes;
        self
    }
    /// Unpack a file, or every file under a directory when multi-file
    /// recursion is on.  Per-file errors under a directory are reported and
    /// the walk continues; symlinks are skipped.
    pub fn unpack_all(&self,filename: &Path,destination: &Path) -> STDRESULT {
        let meta = std::fs::symlink_metadata(filename)?;
        if meta.file_type().is_symlink() {
            debug!("skipping symlink {}",filename.display());
            return Ok(());
        }
        if meta.is_file() {
            return self.unpack(filename,destination);
        }
        if !self.opts.recurse_multifiles {
            return Ok(());
        }
        self.walk_tree(filename)
    }
    fn walk_tree(&self,dir: &Path) -> STDRESULT {
        let mut entries: Vec<PathBuf> = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            entries.push(entry?.path());
        }
        entries.sort();
        for path in entries {
            let meta = std::fs::symlink_metadata(&path)?;
            if meta.file_type().is_symlink() {
                debug!("skipping symlink {}",path.display());
                continue;
            }
            if meta.is_dir() {
                if let Err(e) = self.walk_tree(&path) {
                    error!("cannot descend into {}: {}",path.display(),e);
                }
                continue;
            }
            let mut content_dest = path.clone().into_os_string();
            content_dest.push("_content");
            if let Err(e) = self.unpack(&path,Path::new(&content_dest)) {
                error!("unpacking {} failed: {}",path.display(),e);
            }
        }
        Ok(())
    }
    /// Scan one file with every classifier and act on the confirmed matches
    pub fn unpack(&self,filename: &Path,destination: &Path) -> STDRESULT {
        let file_size = std::fs::metadata(filename)?.len();
        let mut found_blobs = IntervalSet::new(false,false);
        let mut f = std::fs::File::open(filename)?;
        for classifier in &self.active_classifiers {
            debug!("checking for content of type {}",classifier.name());
            f.seek(SeekFrom::Start(0))?;
            loop {
                let base_offset = f.stream_position()?;
                let mut chunk: Vec<u8> = Vec::new();
                (&mut f).take(self.chunksize_bytes as u64).read_to_end(&mut chunk)?;
                if chunk.len()==0 {
                    break;
                }
                // quick signature pass over the chunk, then a header check
                // for every candidate
                for local_offset in classifier.scan(&chunk) {
                    let abs_offset = base_offset + local_offset as u64;
                    f.seek(SeekFrom::Start(abs_offset))?;
                    match classifier.investigate(&mut f,abs_offset) {
                        Some(m) => self.act_on_match(classifier.as_ref(),&mut f,file_size,&mut found_blobs,filename,destination,m)?,
                        None => continue
                    };
                }
                if chunk.len() < self.chunksize_bytes {
                    break;
                }
                f.seek(SeekFrom::Start(base_offset + (self.chunksize_bytes - self.overlap_bytes) as u64))?;
            }
        }
        Ok(())
    }
    fn act_on_match(&self,classifier: &dyn Classifier,f: &mut std::fs::File,file_size: u64,found_blobs: &mut IntervalSet,
                    filename: &Path,destination: &Path,m: (u64,Option<u64>)) -> STDRESULT {
        let (start_offset,file_length) = m;
        if let Some(length) = file_length {
            let end = match start_offset.checked_add(length) {
                Some(end) if length > 0 && end <= file_size => end,
                _ => {
                    debug!("{}: {} match at {:#x} rejected, claimed range does not fit the file",
                        filename.display(),classifier.name(),start_offset);
                    return Ok(());
                }
            };
            if let Err(e) = found_blobs.add(Interval::new(start_offset,end)) {
                warn!("{}: {} found at {:#x} length {} bytes, but discarded because contained/overlapping with different blob ({})",
                    filename.display(),classifier.name(),start_offset,length,e);
                return Ok(());
            }
            info!("{}: {} found at {:#x} length {} bytes",filename.display(),classifier.name(),start_offset,length);
        } else {
            info!("{}: {} found at {:#x} with indeterminate length",filename.display(),classifier.name(),start_offset);
        }
        // formats without an inner payload are carved by default
        if self.opts.carve || !classifier.contains_payload() && file_length.is_some() {
            let carve_destination = destination.join(format!("carved_{:#010x}.{}",start_offset,classifier.name()));
            info!("carving {} [{:#x}] -> {}",filename.display(),start_offset,carve_destination.display());
            std::fs::create_dir_all(destination)?;
            f.seek(SeekFrom::Start(start_offset))?;
            let mut dest_file = std::fs::File::create(&carve_destination)?;
            futil::carve(f,&mut dest_file,file_length)?;
        }
        if !self.opts.noextract && classifier.contains_payload() {
            let extract_destination = destination.join(format!("payload_{:#010x}.{}",start_offset,classifier.name()));
            info!("extracting {} [{:#x}] -> {}",filename.display(),start_offset,extract_destination.display());
            f.seek(SeekFrom::Start(start_offset))?;
            let extract_opts = ExtractOptions { archive_limit: self.opts.archive_limit };
            let success = classifier.extract(f,start_offset,file_length,&extract_destination,&extract_opts);
            if success && self.opts.recurse {
                let recurse_destination = destination.join(format!("content_{:#010x}.{}",start_offset,classifier.name()));
                info!("recursing {} into {}",extract_destination.display(),recurse_destination.display());
                if let Err(e) = self.unpack_all(&extract_destination,&recurse_destination) {
                    warn!("recursion into {} failed: {}",extract_destination.display(),e);
                }
            }
        }
        Ok(())
    }
}
