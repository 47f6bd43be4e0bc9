//! # Byte and file utilities
//!
//! Low level primitives shared by the scanner and the extractors: overlapping
//! substring search over a byte slice, byte-range carving between streams, and
//! a working-directory scope guard for extractors that unpack into the
//! current directory.

use std::io::{Read,Write};
use std::path::{Path,PathBuf};

/// Lazy iterator over every occurrence of `needle` in `haystack`.
/// Matches may overlap: the cursor advances by one byte past each match.
pub struct FindAll<'a> {
    haystack: &'a [u8],
    needle: &'a [u8],
    cursor: usize
}

impl<'a> Iterator for FindAll<'a> {
    type Item = usize;
    fn next(&mut self) -> Option<usize> {
        if self.needle.len()==0 || self.needle.len() > self.haystack.len() {
            return None;
        }
        while self.cursor + self.needle.len() <= self.haystack.len() {
            let at = self.cursor;
            self.cursor += 1;
            if &self.haystack[at..at+self.needle.len()] == self.needle {
                return Some(at);
            }
        }
        None
    }
}

/// Find all occurrences of `needle` in `haystack`, including overlapping ones.
pub fn findall<'a>(haystack: &'a [u8],needle: &'a [u8]) -> FindAll<'a> {
    FindAll { haystack, needle, cursor: 0 }
}

/// Copy `length` bytes from `src` to `dst`, or everything up to EOF if
/// `length` is None.  If the source runs short the copy stops at EOF.
/// Returns the number of bytes copied.
pub fn carve<R,W>(src: &mut R,dst: &mut W,length: Option<u64>) -> Result<u64,std::io::Error>
where R: Read + ?Sized, W: Write + ?Sized {
    match length {
        Some(n) => std::io::copy(&mut (&mut *src).take(n),dst),
        None => std::io::copy(src,dst)
    }
}

/// Scope guard that changes the working directory and restores the previous
/// one when dropped, on success and failure paths alike.
pub struct WorkDir {
    saved: PathBuf
}

impl WorkDir {
    pub fn push(path: &Path) -> Result<Self,std::io::Error> {
        let saved = std::env::current_dir()?;
        std::env::set_current_dir(path)?;
        Ok(Self { saved })
    }
}

impl Drop for WorkDir {
    fn drop(&mut self) {
        if let Err(e) = std::env::set_current_dir(&self.saved) {
            log::error!("could not restore working directory {}: {}",self.saved.display(),e);
        }
    }
}
