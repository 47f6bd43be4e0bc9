//! # `fwkit` main library
//!
//! This library scans opaque binary files (firmware images, memory dumps, disk
//! images) for embedded artifacts in known container and compression formats,
//! and either carves the raw byte ranges or extracts their payloads.
//!
//! ## Architecture
//!
//! Scanning is built around a trait object and a driver:
//! * `classify::Classifier` encapsulates one format: a cheap signature `scan`,
//!   a header-parsing `investigate`, and an `extract` step
//! * `unpack::FileUnpacker` streams a file in overlapping chunks, feeds every
//!   chunk to every registered classifier in priority order, deduplicates
//!   confirmed byte ranges through `intervals::IntervalSet`, and carves or
//!   extracts each confirmed match
//!
//! Most formats delegate extraction to an external decoder subprocess
//! (`gunzip`, `unzip`, `unsquashfs`, ...).  CramFS is the exception: the
//! `fs::cramfs` module decodes the filesystem end-to-end in process, walking
//! the inode table and inflating the zlib block chains itself.
//!
//! ## Supporting modules
//!
//! * `binstruct` is a declarative fixed-layout parser; classifiers use it for
//!   every on-disk header
//! * `bits` reads bit streams in either bit order and either byte order
//! * `encode` turns `TYPE:VALUE` strings into search needles
//! * `hexrec` reassembles Intel-HEX records into contiguous binary chunks
//! * `futil` holds the byte-level primitives: substring search, carving, and
//!   a working-directory scope guard

pub mod futil;
pub mod binstruct;
pub mod bits;
pub mod intervals;
pub mod encode;
pub mod hexrec;
pub mod fs;
pub mod classify;
pub mod unpack;
pub mod commands;

#[cfg(test)]
mod futil_test;
#[cfg(test)]
mod intervals_test;

type DYNERR = Box<dyn std::error::Error>;
type STDRESULT = Result<(),Box<dyn std::error::Error>>;

/// Display binary to stdout in columns of hex and ascii
pub fn display_block(start_addr: usize,block: &[u8]) {
    let mut slice_start = 0;
    loop {
        let row_label = start_addr + slice_start;
        let mut slice_end = slice_start + 16;
        if slice_end > block.len() {
            slice_end = block.len();
        }
        let slice = &block[slice_start..slice_end];
        let txt: Vec<u8> = slice.iter().map(|c| match *c {
            x if x<32 => '.' as u8,
            x if x<127 => x,
            _ => '.' as u8
        }).collect();
        print!("{:08X} : ",row_label);
        for byte in slice {
            print!("{:02X} ",byte);
        }
        for _blank in slice_end..slice_start+16 {
            print!("   ");
        }
        println!("| {}",String::from_utf8_lossy(&txt));
        slice_start += 16;
        if slice_end==block.len() {
            break;
        }
    }
}
