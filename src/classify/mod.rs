//! # Format Classifiers
//!
//! Each classifier encapsulates one container or compression format behind a
//! three-step contract:
//! * `scan` runs a cheap signature search over a chunk and yields candidate
//!   offsets; false positives are fine, misses are not
//! * `investigate` parses the header(s) around a candidate, confirming or
//!   rejecting it and fixing the true start offset and length
//! * `extract` produces the payload, either in process or through an
//!   external decoder subprocess
//!
//! The registry is a fixed list ordered by priority: containers come before
//! the compressed streams they usually hold, so that when two signatures
//! coincide the container claims the byte range first.

pub mod gzip;
pub mod bzip2;
pub mod xz;
pub mod zlib;
pub mod tar;
pub mod zip;
pub mod uboot;
pub mod squashfs;
pub mod cramfs;
pub mod dex;

use std::io::{Read,Seek,SeekFrom,Write};
use std::path::Path;
use std::process::{Command,Stdio};
use log::{info,debug,warn};
use crate::futil;

/// Readable, seekable view of the input being scanned
pub trait Source: Read + Seek {}
impl<T: Read + Seek> Source for T {}

/// Knobs the driver passes down into extraction
#[derive(Clone,Copy,Default)]
pub struct ExtractOptions {
    /// cap on bytes forwarded to an external decoder, None forwards the rest
    /// of the file
    pub archive_limit: Option<u64>
}

/// One format's scan/investigate/extract contract
pub trait Classifier {
    /// unique tag used in output filenames and the priority table
    fn name(&self) -> &'static str;
    /// true when extraction produces a distinct artifact worth recursing into
    fn contains_payload(&self) -> bool {
        true
    }
    /// fast signature search over one chunk, yielding chunk-local candidate
    /// offsets
    fn scan<'a>(&self,chunk: &'a [u8]) -> Box<dyn Iterator<Item = usize> + 'a>;
    /// parse the header(s) at or around `offset`, returning the confirmed
    /// `(start, length)` or None for a false positive.  The start may differ
    /// from the candidate when the signature sits inside the format's header.
    /// Length None means the format is streamable and the extractor will
    /// consume what it needs.
    fn investigate(&self,infile: &mut dyn Source,offset: u64) -> Option<(u64,Option<u64>)>;
    /// produce the payload at `destination`, returning success
    fn extract(&self,input_file: &mut dyn Source,start_offset: u64,file_length: Option<u64>,destination: &Path,opts: &ExtractOptions) -> bool;
}

/// All classifiers in scanning order: containers by descending priority
/// (uboot, squashfs, cramfs, tar, zip, gzip), then the rest in registration
/// order.
pub fn all() -> Vec<Box<dyn Classifier>> {
    vec![
        Box::new(uboot::UBootImage),
        Box::new(squashfs::SquashFS),
        Box::new(cramfs::CramFS),
        Box::new(tar::Tar),
        Box::new(zip::PKZip),
        Box::new(gzip::GZip),
        Box::new(bzip2::BZip2),
        Box::new(xz::Xz),
        Box::new(zlib::Zlib),
        Box::new(dex::Dex)
    ]
}

/// Stream from the source's current position into `sink`, up to the archive
/// limit if one is set.  A broken pipe means the consumer stopped reading
/// early and is not an error here.
fn copy_until_limit(infile: &mut dyn Source,sink: &mut dyn Write,limit: Option<u64>) -> Result<u64,std::io::Error> {
    let result = match limit {
        Some(n) => std::io::copy(&mut (&mut *infile).take(n),sink),
        None => std::io::copy(&mut *infile,sink)
    };
    match result {
        Err(e) if e.kind()==std::io::ErrorKind::BrokenPipe => {
            debug!("consumer closed its input early");
            Ok(0)
        },
        other => other
    }
}

/// Carve the raw byte range into a file at `destination`, creating parent
/// directories as needed.  This is the whole of extraction for formats whose
/// payload is a bare byte range.
pub fn carve_extract(input_file: &mut dyn Source,start_offset: u64,file_length: Option<u64>,destination: &Path) -> bool {
    let mut step = || -> crate::STDRESULT {
        if let Some(parent) = destination.parent() {
            std::fs::create_dir_all(parent)?;
        }
        input_file.seek(SeekFrom::Start(start_offset))?;
        let mut output_file = std::fs::File::create(destination)?;
        futil::carve(input_file,&mut output_file,file_length)?;
        Ok(())
    };
    match step() {
        Ok(()) => true,
        Err(e) => {
            warn!("carving to {} failed: {}",destination.display(),e);
            false
        }
    }
}

/// Pipe the stream from the source's current position through a decoder
/// subprocess, writing its stdout to `destination`.  Success is judged by
/// the classifier's accepted exit codes; stderr is discarded.
pub fn stdout_decompress(cmdline: &[&str],success_codes: &[i32],input_file: &mut dyn Source,destination: &Path,opts: &ExtractOptions) -> bool {
    let mut step = || -> Result<bool,crate::DYNERR> {
        if let Some(parent) = destination.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let outfile = std::fs::File::create(destination)?;
        let mut process = Command::new(cmdline[0])
            .args(&cmdline[1..])
            .stdin(Stdio::piped())
            .stdout(outfile)
            .stderr(Stdio::null())
            .spawn()?;
        if let Some(mut stdin) = process.stdin.take() {
            copy_until_limit(input_file,&mut stdin,opts.archive_limit)?;
        }
        let status = process.wait()?;
        let success = match status.code() {
            Some(code) => success_codes.contains(&code),
            None => false
        };
        info!("{} extraction to {} returned {} (status {:?})",cmdline[0],destination.display(),
            match success { true => "successfully", false => "unsuccessfully" },status.code());
        Ok(success)
    };
    match step() {
        Ok(success) => success,
        Err(e) => {
            warn!("{} extraction failed: {}",cmdline[0],e);
            false
        }
    }
}

/// Run a quick confirmation subprocess fed from the source's current
/// position, true when it exits 0.  Used by streamable formats whose only
/// cheap validity check is the decoder itself.
pub fn subprocess_probe(cmdline: &[&str],input_file: &mut dyn Source) -> bool {
    let mut step = || -> Result<bool,crate::DYNERR> {
        let mut process = Command::new(cmdline[0])
            .args(&cmdline[1..])
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        if let Some(mut stdin) = process.stdin.take() {
            copy_until_limit(input_file,&mut stdin,None)?;
        }
        Ok(process.wait()?.code()==Some(0))
    };
    match step() {
        Ok(confirmed) => confirmed,
        Err(e) => {
            debug!("probe {} could not run: {}",cmdline[0],e);
            false
        }
    }
}

/// Carve the byte range to a temporary file, then hand the temp path to
/// `inner` for the real extraction.  The temp file is deleted on all exit
/// paths.  `destination` is created as a directory and absolutized so inner
/// steps that change the working directory still resolve it.
pub fn extract_via_temp_file(input_file: &mut dyn Source,start_offset: u64,file_length: Option<u64>,destination: &Path,suffix: &str,
                             inner: &mut dyn FnMut(&Path,&Path) -> bool) -> bool {
    let mut step = || -> Result<bool,crate::DYNERR> {
        std::fs::create_dir_all(destination)?;
        let destination = destination.canonicalize()?;
        let mut archive_file = tempfile::Builder::new().suffix(suffix).tempfile()?;
        input_file.seek(SeekFrom::Start(start_offset))?;
        futil::carve(input_file,archive_file.as_file_mut(),file_length)?;
        archive_file.as_file_mut().flush()?;
        Ok(inner(archive_file.path(),&destination))
    };
    match step() {
        Ok(success) => success,
        Err(e) => {
            warn!("temporary carve for {} failed: {}",destination.display(),e);
            false
        }
    }
}

/// Run a multi-file extractor subprocess with the working directory set to
/// the destination, so archives that unpack into the cwd land in the right
/// place.  A failed extraction removes the destination directory if it is
/// empty.
pub fn multi_file_extract(cmdline: Vec<String>,destination: &Path) -> bool {
    let workdir = match futil::WorkDir::push(destination) {
        Ok(guard) => guard,
        Err(e) => {
            warn!("cannot enter {}: {}",destination.display(),e);
            return false;
        }
    };
    let result = Command::new(&cmdline[0])
        .args(&cmdline[1..])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();
    drop(workdir);
    match result {
        Ok(status) if status.code()==Some(0) => true,
        Ok(status) => {
            info!("{} extraction into {} returned status {:?}",cmdline[0],destination.display(),status.code());
            let _ = std::fs::remove_dir(destination);
            false
        },
        Err(e) => {
            warn!("could not run {}: {}",cmdline[0],e);
            let _ = std::fs::remove_dir(destination);
            false
        }
    }
}
