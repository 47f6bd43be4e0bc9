//! # Intel-HEX reassembly
//!
//! Joins the discontiguous data records of an Intel-HEX firmware file into
//! contiguous binary chunks.  A record merges into an existing chunk when its
//! address falls within `MERGE_TOLERANCE` bytes of the chunk's start or end;
//! any gap this admits is filled with zeros.  Records too far from every
//! chunk seed a new one.  One output file is written per chunk.

use std::collections::BTreeMap;
use std::io::BufRead;
use std::io::Write;
use std::path::Path;
use log::{info,warn,debug};
use regex::Regex;
use crate::STDRESULT;

/// Addresses within this many bytes of a chunk boundary merge into the chunk
pub const MERGE_TOLERANCE: u64 = 0x100;

/// Enumerates reassembly errors.  The `Display` trait will print the long message.
#[derive(thiserror::Error,Debug)]
pub enum Error {
    #[error("unsupported record type {0:#04x}")]
    UnsupportedRecord(u8),
    #[error("cannot merge record at {addr:#x} into chunk at {start:#x}")]
    Merge { addr: u64, start: u64 },
    #[error("i/o error during reassembly")]
    Io(#[from] std::io::Error)
}

/// Reassembles data records into address-keyed binary chunks.
/// Lines that do not parse, or whose checksum or length is wrong, are
/// silently skipped; the line grammar requires at least one data byte, so
/// zero-data records such as the end-of-file marker are skipped as well.
/// Unsupported record types are fatal for the file.
pub struct Reassembler {
    line_patt: Regex,
    addr_high_word: u64,
    entry_point: Option<u64>,
    chunks: BTreeMap<u64,Vec<u8>>
}

fn big_uint(data: &[u8]) -> u64 {
    data.iter().fold(0,|acc,byte| (acc << 8) | *byte as u64)
}

impl Reassembler {
    pub fn new() -> Self {
        Self {
            line_patt: Regex::new(r"^:(([A-Fa-f0-9]{2})([A-Fa-f0-9]{4})([A-Fa-f0-9]{2})([A-Fa-f0-9]+))([A-Fa-f0-9]{2})$").expect("regex parsing error"),
            addr_high_word: 0,
            entry_point: None,
            chunks: BTreeMap::new()
        }
    }
    /// Entry point seen in a start-linear-address record, if any
    pub fn entry_point(&self) -> Option<u64> {
        self.entry_point
    }
    /// The reassembled chunks keyed by absolute start address
    pub fn chunks(&self) -> &BTreeMap<u64,Vec<u8>> {
        &self.chunks
    }
    /// Feed every line of a hex file
    pub fn feed<R: BufRead>(&mut self,reader: R) -> Result<(),Error> {
        for line in reader.lines() {
            self.feed_line(line?.trim_end_matches(['\r','\n']))?;
        }
        Ok(())
    }
    /// Feed one line.  Non-record lines are ignored.
    pub fn feed_line(&mut self,line: &str) -> Result<(),Error> {
        let caps = match self.line_patt.captures(line) {
            Some(caps) => caps,
            None => return Ok(())
        };
        let payload = match hex::decode(&caps[1]) {
            Ok(payload) => payload,
            // odd digit count, the line is noise
            Err(_) => return Ok(())
        };
        let length = payload[0] as usize;
        let load_offset = big_uint(&payload[1..3]);
        let record_type = payload[3];
        let data = &payload[4..];
        let checksum = u8::from_str_radix(&caps[6],16).expect("unreachable");
        let expected: u8 = payload.iter().fold(0u8,|acc,byte| acc.wrapping_add(*byte)).wrapping_neg();
        if expected != checksum || data.len() != length {
            debug!("skipping record with bad checksum or length at offset {:#x}",load_offset);
            return Ok(());
        }
        match record_type {
            0x00 => {
                let address = self.addr_high_word | load_offset;
                self.interpret_data_chunk(address,data.to_vec())
            },
            0x04 => {
                self.addr_high_word = big_uint(data) << 16;
                Ok(())
            },
            0x05 => {
                let ip = big_uint(data);
                info!("entry point at {:#x}",ip);
                self.entry_point = Some(ip);
                Ok(())
            },
            other => Err(Error::UnsupportedRecord(other))
        }
    }
    fn interpret_data_chunk(&mut self,address: u64,data: Vec<u8>) -> Result<(),Error> {
        let mut home: Option<u64> = None;
        for (start,chunk) in &self.chunks {
            let end = start + chunk.len() as u64;
            let range_min = start.saturating_sub(MERGE_TOLERANCE);
            let range_max = end + MERGE_TOLERANCE;
            if address >= range_min && address <= range_max {
                home = Some(*start);
                break;
            }
        }
        match home {
            Some(start) => self.update_chunk(start,address,data),
            None => {
                self.chunks.insert(address,data);
                Ok(())
            }
        }
    }
    fn update_chunk(&mut self,chunk_start: u64,address: u64,data: Vec<u8>) -> Result<(),Error> {
        let chunk = self.chunks.get_mut(&chunk_start).expect("unreachable");
        let chunk_end = chunk_start + chunk.len() as u64;
        if address == chunk_end {
            chunk.extend_from_slice(&data);
        } else if address > chunk_end {
            let gap_size = (address - chunk_end) as usize;
            warn!("gap detected, new record at {:#x}, previous end at {:#x}, filling {} bytes with zeros",address,chunk_end,gap_size);
            chunk.resize(chunk.len() + gap_size,0);
            chunk.extend_from_slice(&data);
        } else if address + data.len() as u64 == chunk_start {
            let mut replacement = data;
            replacement.extend_from_slice(chunk);
            self.chunks.remove(&chunk_start);
            self.chunks.insert(address,replacement);
        } else {
            return Err(Error::Merge { addr: address, start: chunk_start });
        }
        Ok(())
    }
    /// Write one `chunk_{start:08x}.bin` file per chunk into `dir`
    pub fn write_chunks(&self,dir: &Path) -> STDRESULT {
        std::fs::create_dir_all(dir)?;
        for (start,chunk) in &self.chunks {
            let filename = dir.join(format!("chunk_{:08x}.bin",start));
            info!("writing {} ({} bytes)",filename.display(),chunk.len());
            let mut f = std::fs::File::create(filename)?;
            f.write_all(chunk)?;
        }
        Ok(())
    }
}
