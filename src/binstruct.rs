//! # Named binary structures
//!
//! Declarative parser for fixed-layout headers.  A `NamedStruct` is built
//! from an ordered list of `(format code, field name)` pairs using the usual
//! pack mini-language: `L`=u32, `H`=u16, `Q`=u64, `B`=u8, `l`=i32, `h`=i16,
//! `Ns`=N-byte string (bare `s` is one byte).  Endianness is given once as a
//! prefix, `<` little or `>` big, defaulting to little.
//!
//! Classifiers read every on-disk header through this module, either from a
//! byte slice with `unpack` or from a seekable stream with `unpack_from`.

use std::io::{Read,Seek,SeekFrom};

/// Enumerates structure decoding errors.  The `Display` trait will print the long message.
#[derive(thiserror::Error,Debug)]
pub enum Error {
    #[error("needed {wanted} bytes but only {got} available")]
    ShortRead { wanted: usize, got: usize },
    #[error("i/o error reading structure")]
    Io(#[from] std::io::Error)
}

#[derive(Clone,Copy,PartialEq)]
enum Endian {
    Little,
    Big
}

#[derive(Clone,Copy)]
enum Code {
    U8,
    U16,
    U32,
    U64,
    I16,
    I32,
    Str(usize)
}

impl Code {
    fn width(&self) -> usize {
        match self {
            Self::U8 => 1,
            Self::U16 => 2,
            Self::U32 => 4,
            Self::U64 => 8,
            Self::I16 => 2,
            Self::I32 => 4,
            Self::Str(n) => *n
        }
    }
}

/// A decoded field value.  Integer codes widen to 64 bits, string codes
/// keep their raw bytes.
#[derive(Clone,Debug,PartialEq)]
pub enum Value {
    Uint(u64),
    Int(i64),
    Bytes(Vec<u8>)
}

/// A decoded structure, fields in declaration order.
pub struct Record {
    fields: Vec<(&'static str,Value)>
}

impl Record {
    fn get(&self,name: &str) -> &Value {
        for (key,val) in &self.fields {
            if *key==name {
                return val;
            }
        }
        panic!("no field named {}",name);
    }
    /// Unsigned field by name.  Panics if the name is not in the layout,
    /// that is a programming error, not a data error.
    pub fn uint(&self,name: &str) -> u64 {
        match self.get(name) {
            Value::Uint(v) => *v,
            _ => panic!("field {} is not unsigned",name)
        }
    }
    /// Signed field by name.
    pub fn int(&self,name: &str) -> i64 {
        match self.get(name) {
            Value::Int(v) => *v,
            _ => panic!("field {} is not signed",name)
        }
    }
    /// String field by name, raw bytes including any padding.
    pub fn bytes(&self,name: &str) -> &[u8] {
        match self.get(name) {
            Value::Bytes(v) => v,
            _ => panic!("field {} is not a string",name)
        }
    }
}

/// Fixed binary layout described by pack format codes.
pub struct NamedStruct {
    endian: Endian,
    fields: Vec<(Code,&'static str)>
}

fn parse_code(code: &str) -> Code {
    match code {
        "B" => Code::U8,
        "H" => Code::U16,
        "L" => Code::U32,
        "Q" => Code::U64,
        "h" => Code::I16,
        "l" => Code::I32,
        "s" => Code::Str(1),
        _ => {
            if let Some(count) = code.strip_suffix('s') {
                if let Ok(n) = count.parse::<usize>() {
                    return Code::Str(n);
                }
            }
            panic!("bad struct format code `{}`",code);
        }
    }
}

impl NamedStruct {
    /// Create a layout.  `endian` is `"<"`, `">"`, or `""` for the default
    /// little endian.  Format codes are static; a bad code panics.
    pub fn new(endian: &str,spec: &[(&'static str,&'static str)]) -> Self {
        let endian = match endian {
            "<" | "" => Endian::Little,
            ">" => Endian::Big,
            _ => panic!("bad endian prefix `{}`",endian)
        };
        let fields = spec.iter().map(|(code,name)| (parse_code(code),*name)).collect();
        Self { endian, fields }
    }
    /// Total size of the layout in bytes
    pub fn size(&self) -> usize {
        self.fields.iter().map(|(code,_)| code.width()).sum()
    }
    /// Decode the layout from the front of `data`.  Extra bytes are ignored,
    /// missing bytes fail with `ShortRead`.
    pub fn unpack(&self,data: &[u8]) -> Result<Record,Error> {
        if data.len() < self.size() {
            return Err(Error::ShortRead { wanted: self.size(), got: data.len() });
        }
        let mut fields: Vec<(&'static str,Value)> = Vec::new();
        let mut at = 0;
        for (code,name) in &self.fields {
            let width = code.width();
            let raw = &data[at..at+width];
            let val = match code {
                Code::Str(_) => Value::Bytes(raw.to_vec()),
                Code::U8 => Value::Uint(raw[0] as u64),
                Code::I16 | Code::I32 => Value::Int(self.int_field(raw,true)),
                _ => Value::Uint(self.int_field(raw,false) as u64)
            };
            fields.push((name,val));
            at += width;
        }
        Ok(Record { fields })
    }
    /// Seek to `offset` if given, then read and decode exactly `size()` bytes
    /// from the stream's current position.
    pub fn unpack_from<R: Read + Seek + ?Sized>(&self,f: &mut R,offset: Option<u64>) -> Result<Record,Error> {
        if let Some(at) = offset {
            f.seek(SeekFrom::Start(at))?;
        }
        let mut buf = vec![0;self.size()];
        let mut got = 0;
        while got < buf.len() {
            match f.read(&mut buf[got..])? {
                0 => return Err(Error::ShortRead { wanted: self.size(), got }),
                n => got += n
            }
        }
        self.unpack(&buf)
    }
    fn int_field(&self,raw: &[u8],signed: bool) -> i64 {
        let mut acc: u64 = 0;
        match self.endian {
            Endian::Big => {
                for byte in raw {
                    acc = (acc << 8) | *byte as u64;
                }
            },
            Endian::Little => {
                for byte in raw.iter().rev() {
                    acc = (acc << 8) | *byte as u64;
                }
            }
        }
        if signed {
            let bits = 8 * raw.len() as u32;
            let sign = 1u64 << (bits - 1);
            if acc & sign > 0 {
                return (acc as i64) - ((sign as i64) << 1);
            }
        }
        acc as i64
    }
}
