use num_derive::FromPrimitive;
use crate::binstruct::NamedStruct;

/// CramFS compresses file data in blocks of this many bytes.  The block size
/// is not recorded in the superblock; images built with a different size are
/// not supported.
pub const BLOCK_SIZE: usize = 4096;
pub const MAGIC: u64 = 0x28cd3d45;
/// Superblock length; the root inode follows immediately
pub const HEADER_SIZE: u64 = 64;

/// Enumerates CramFS errors.  The `Display` trait will print the long message.
#[derive(thiserror::Error,Debug)]
pub enum Error {
    #[error("bad magic in superblock")]
    BadMagic,
    #[error("unrecognized inode type code {0}")]
    UnknownInodeType(u16),
    #[error("inode name is not valid utf-8")]
    BadName,
    #[error("inode at offset {0:#x} is not a directory")]
    NotADirectory(u64),
    #[error("directory child range is inconsistent")]
    Invariant,
    #[error("block pointer table is not monotonic")]
    BlockPointers,
    #[error("bad zlib stream in file data")]
    BadBlock
}

/// Inode types as stored in the high 4 bits of the mode field.
/// Conversion from the raw code is through `FromPrimitive::from_u16`.
#[derive(FromPrimitive,Clone,Copy,PartialEq,Debug)]
pub enum InodeType {
    Fifo = 1,
    CharDev = 2,
    Dir = 4,
    BlockDev = 6,
    RegularFile = 8,
    Link = 10,
    Socket = 12
}

/// Little endian superblock layout, shared with the cramfs classifier
pub fn header() -> NamedStruct {
    NamedStruct::new("<",&[
        ("L","magic"),
        ("L","size"),
        ("L","flags"),
        ("L","future"),
        ("16s","signature"),
        ("L","fsid_crc"),
        ("L","fsid_edition"),
        ("L","fsid_blocks"),
        ("L","fsid_files"),
        ("16s","name")
    ])
}

/// Packed inode header, three 32 bit words of bitfields; the 4-byte-aligned
/// name follows
pub fn inode_header() -> NamedStruct {
    NamedStruct::new("<",&[
        ("L","mode_uid"),
        ("L","size_gid"),
        ("L","namelen_offset")
    ])
}
