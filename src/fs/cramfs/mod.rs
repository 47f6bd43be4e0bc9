//! # CramFS
//!
//! In-process decoder for the compressed read-only Linux filesystem.  The
//! image is a 64 byte little endian superblock, a packed inode table, and a
//! data region of zlib streams.  Directory inodes point at the byte offset of
//! their first child; the children occupy a contiguous `size` byte range of
//! the inode table.  File inodes point at a table of little endian 32 bit
//! block-end pointers followed by the compressed blocks themselves, one per
//! 4096 byte slice of the file.
//!
//! Inodes are indexed both sequentially and by byte offset; the offset is the
//! natural identifier because that is how directories address their children.

pub mod types;

use std::collections::HashMap;
use std::io::{Read,Seek,SeekFrom,Write};
use std::path::Path;
use flate2::read::ZlibDecoder;
use log::{debug,trace};
use num_traits::FromPrimitive;
use types::{Error,InodeType,BLOCK_SIZE,MAGIC,HEADER_SIZE};
use crate::{STDRESULT,DYNERR};

/// A decoded inode.  `at` is the byte offset of the inode within the image,
/// `offset` is where its data lives: first child for directories, block
/// pointer table for files.
#[derive(Clone,Debug)]
pub struct Inode {
    pub index: usize,
    pub at: u64,
    pub inodetype: InodeType,
    pub perms: u16,
    pub uid: u16,
    pub gid: u8,
    pub size: u64,
    pub offset: u64,
    pub filename: String,
    pub nblocks: usize
}

/// A CramFS image over any seekable byte source
pub struct UncramFS<R: Read + Seek> {
    f: R,
    fsid_files: usize,
    inodes: Vec<Inode>,
    inode_index: HashMap<u64,usize>
}

impl<R: Read + Seek> UncramFS<R> {
    /// Read the superblock and the whole inode table.  Fails with `BadMagic`
    /// unless the image starts with the CramFS magic.
    pub fn open(mut f: R) -> Result<Self,DYNERR> {
        let hdr = types::header().unpack_from(&mut f,Some(0))?;
        if hdr.uint("magic") != MAGIC {
            return Err(Box::new(Error::BadMagic));
        }
        let fsid_files = hdr.uint("fsid_files") as usize;
        let mut ans = Self {
            f,
            fsid_files,
            inodes: Vec::new(),
            inode_index: HashMap::new()
        };
        ans.read_all_inodes()?;
        Ok(ans)
    }
    fn read_all_inodes(&mut self) -> Result<(),DYNERR> {
        self.f.seek(SeekFrom::Start(HEADER_SIZE))?;
        for index in 0..self.fsid_files {
            let inode = self.read_next_inode(index)?;
            trace!("inode {} at {:#x}: {:?} `{}`",index,inode.at,inode.inodetype,inode.filename);
            self.inode_index.insert(inode.at,index);
            self.inodes.push(inode);
        }
        Ok(())
    }
    fn read_next_inode(&mut self,index: usize) -> Result<Inode,DYNERR> {
        let at = self.f.stream_position()?;
        let inode = types::inode_header().unpack_from(&mut self.f,None)?;
        let mode_uid = inode.uint("mode_uid");
        let size_gid = inode.uint("size_gid");
        let namelen_offset = inode.uint("namelen_offset");
        let mode = (mode_uid & 0xffff) as u16;
        let typecode = mode >> 12;
        let inodetype = InodeType::from_u16(typecode).ok_or(Error::UnknownInodeType(typecode))?;
        let size = size_gid & 0xffffff;
        let namelen = 4 * (namelen_offset & 0x3f) as usize;
        let mut name = vec![0;namelen];
        self.f.read_exact(&mut name)?;
        while name.last()==Some(&0) {
            name.pop();
        }
        let filename = String::from_utf8(name).or(Err(Error::BadName))?;
        Ok(Inode {
            index,
            at,
            inodetype,
            perms: mode & 0o7777,
            uid: ((mode_uid >> 16) & 0xffff) as u16,
            gid: ((size_gid >> 24) & 0xff) as u8,
            size,
            offset: 4 * ((namelen_offset >> 6) & 0x3ffffff),
            filename,
            nblocks: match size {
                0 => 0,
                n => (n as usize - 1) / BLOCK_SIZE + 1
            }
        })
    }
    /// Inode by its byte offset in the image
    pub fn get_inode(&self,inode_offset: u64) -> Option<&Inode> {
        self.inode_index.get(&inode_offset).map(|idx| &self.inodes[*idx])
    }
    /// Files and subdirectories directly contained by the directory inode at
    /// `inode_offset`.  Children are the inodes whose byte offsets fall in
    /// `[offset, offset+size)`, taken in inode table order.
    pub fn listdir(&self,inode_offset: u64) -> Result<(Vec<&Inode>,Vec<&Inode>),Error> {
        let root = self.get_inode(inode_offset).ok_or(Error::Invariant)?;
        if root.inodetype != InodeType::Dir {
            return Err(Error::NotADirectory(inode_offset));
        }
        let mut contained_files: Vec<&Inode> = Vec::new();
        let mut contained_dirs: Vec<&Inode> = Vec::new();
        if root.offset != 0 {
            let first = self.get_inode(root.offset).ok_or(Error::Invariant)?;
            let end = root.offset + root.size;
            let mut index = first.index;
            while index < self.inodes.len() {
                let next = &self.inodes[index];
                if next.at >= end {
                    break;
                }
                match next.inodetype {
                    InodeType::Dir => contained_dirs.push(next),
                    _ => contained_files.push(next)
                }
                index += 1;
            }
        }
        Ok((contained_files,contained_dirs))
    }
    /// Lazy depth-first walk rooted at the first inode.  Yields
    /// `(path, files, dirs)` for the root and then for every subdirectory.
    pub fn walk(&self) -> Walk<'_,R> {
        Walk {
            fs: self,
            stack: vec![("/".to_string(),HEADER_SIZE)]
        }
    }
    /// Lazy walk over just the non-directory inodes, yielding the full path
    /// of each together with its inode
    pub fn walk_files(&self) -> WalkFiles<'_,R> {
        WalkFiles {
            walk: self.walk(),
            pending: Vec::new()
        }
    }
    /// Concatenated contents of a file inode, each block inflated in turn
    pub fn retrieve_file(&mut self,inode: &Inode) -> Result<Vec<u8>,DYNERR> {
        let mut result: Vec<u8> = Vec::new();
        self.retrieve_chunked_file(inode,&mut |chunk| {
            result.extend_from_slice(chunk);
            Ok(())
        })?;
        Ok(result)
    }
    /// Stream the blocks of a file inode through `sink`.  The block pointer
    /// table holds the end offset of each compressed block; the first block
    /// begins right after the table.
    pub fn retrieve_chunked_file(&mut self,inode: &Inode,sink: &mut dyn FnMut(&[u8]) -> STDRESULT) -> STDRESULT {
        self.f.seek(SeekFrom::Start(inode.offset))?;
        let mut pointer_data = vec![0;4*inode.nblocks];
        self.f.read_exact(&mut pointer_data)?;
        let mut pointers: Vec<u64> = Vec::new();
        for quad in pointer_data.chunks_exact(4) {
            pointers.push(u32::from_le_bytes([quad[0],quad[1],quad[2],quad[3]]) as u64);
        }
        let mut offset = inode.offset + 4*inode.nblocks as u64;
        for pointer in pointers {
            if pointer < offset {
                return Err(Box::new(Error::BlockPointers));
            }
            let mut compressed = vec![0;(pointer - offset) as usize];
            self.f.read_exact(&mut compressed)?;
            let mut chunk: Vec<u8> = Vec::new();
            let mut decoder = ZlibDecoder::new(&compressed[..]);
            decoder.read_to_end(&mut chunk).or(Err(Error::BadBlock))?;
            sink(&chunk)?;
            offset = pointer;
        }
        Ok(())
    }
    /// Extract every regular file under `target_directory`, creating
    /// intermediate directories.  Links, devices, fifos and sockets are not
    /// materialized.
    pub fn uncram(&mut self,target_directory: &Path) -> STDRESULT {
        let mut files: Vec<(String,Inode)> = Vec::new();
        for item in self.walk_files() {
            let (path,inode) = item?;
            files.push((path,inode.clone()));
        }
        for (path,inode) in files {
            if inode.inodetype != InodeType::RegularFile {
                debug!("skipping {} ({:?})",path,inode.inodetype);
                continue;
            }
            let disk_file = target_directory.join(path.trim_start_matches('/'));
            if let Some(parent) = disk_file.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let mut f = std::fs::File::create(&disk_file)?;
            self.retrieve_chunked_file(&inode,&mut |chunk| {
                f.write_all(chunk)?;
                Ok(())
            })?;
        }
        Ok(())
    }
}

/// Walk state: a stack of directories still to be listed
pub struct Walk<'a,R: Read + Seek> {
    fs: &'a UncramFS<R>,
    stack: Vec<(String,u64)>
}

impl<'a,R: Read + Seek> Iterator for Walk<'a,R> {
    type Item = Result<(String,Vec<&'a Inode>,Vec<&'a Inode>),Error>;
    fn next(&mut self) -> Option<Self::Item> {
        let (pathname,inode_offset) = self.stack.pop()?;
        match self.fs.listdir(inode_offset) {
            Ok((files,dirs)) => {
                let base = match pathname.ends_with("/") {
                    true => pathname.clone(),
                    false => pathname.clone() + "/"
                };
                // depth first, first subdirectory on top
                for subdir in dirs.iter().rev() {
                    self.stack.push((base.clone() + &subdir.filename + "/",subdir.at));
                }
                Some(Ok((pathname,files,dirs)))
            },
            Err(e) => {
                self.stack.clear();
                Some(Err(e))
            }
        }
    }
}

/// Walk state plus the files of the directory currently being drained
pub struct WalkFiles<'a,R: Read + Seek> {
    walk: Walk<'a,R>,
    pending: Vec<(String,&'a Inode)>
}

impl<'a,R: Read + Seek> Iterator for WalkFiles<'a,R> {
    type Item = Result<(String,&'a Inode),Error>;
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.pending.pop() {
                return Some(Ok(item));
            }
            match self.walk.next()? {
                Ok((base_path,files,_dirs)) => {
                    for inode in files.iter().rev() {
                        self.pending.push((base_path.trim_end_matches('/').to_string() + "/" + &inode.filename,inode));
                    }
                },
                Err(e) => return Some(Err(e))
            }
        }
    }
}
