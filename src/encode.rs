//! # Encodable types
//!
//! Turns `TYPE:VALUE` strings into byte needles for the scan front-ends.
//! A single request can expand into several encodings, e.g. `uint16-?e`
//! emits both byte orders and `str-*` emits every supported text encoding.
//!
//! Supported types: `[us]int<bits>[-<b|l|?>e]`, `str[-<encoding>]`, `hex`,
//! `b64`/`base64`, `ip`, `float<32|64>[-<b|l>e]`.

use base64::Engine;
use regex::Regex;

/// Enumerates encoding errors.  The `Display` trait will print the long message.
#[derive(thiserror::Error,Debug)]
pub enum Error {
    #[error("cannot encode `{0}`, missing type/value")]
    MissingValue(String),
    #[error("unknown encoding type `{0}`")]
    UnknownType(String),
    #[error("cannot encode `{0}`, bit length is not divisible by 8")]
    BitLength(String),
    #[error("unsupported bit length {0}")]
    UnsupportedLength(usize),
    #[error("`{0}` is not a valid integer")]
    BadInt(String),
    #[error("unsigned int of {bits} bits cannot hold {value}")]
    UnsignedRange { bits: usize, value: i128 },
    #[error("signed int of {bits} bits cannot hold {value}")]
    SignedRange { bits: usize, value: i128 },
    #[error("unknown string encoding `{0}`")]
    UnknownStrEncoding(String),
    #[error("string cannot be represented in `{0}`")]
    Unencodable(String),
    #[error("`{0}` is not a valid hex string")]
    BadHex(String),
    #[error("`{0}` is not valid base64")]
    BadBase64(String),
    #[error("`{0}` is not a valid IPv4 address")]
    BadIp(String),
    #[error("`{0}` is not a valid float")]
    BadFloat(String)
}

/// One encoding of a value: a tag naming the exact variant and the bytes
pub struct Encoded {
    pub name: String,
    pub data: Vec<u8>
}

/// Parse an integer literal, `0x`/`0X` hex, `0o` octal, decimal otherwise
fn decode_int(value: &str) -> Result<i128,Error> {
    if value.starts_with("0x") || value.starts_with("0X") {
        return i128::from_str_radix(&value[2..],16).or(Err(Error::BadInt(value.to_string())));
    }
    if value.starts_with("0o") {
        return i128::from_str_radix(&value[2..],8).or(Err(Error::BadInt(value.to_string())));
    }
    value.parse::<i128>().or(Err(Error::BadInt(value.to_string())))
}

fn int_bytes(value: u128,length: usize,little_endian: bool) -> Vec<u8> {
    let mut ans: Vec<u8> = Vec::new();
    for i in 0..length {
        ans.push(((value >> (8*i)) & 0xff) as u8);
    }
    if !little_endian {
        ans.reverse();
    }
    ans
}

fn encode_uint(value: &str,little_endian: bool,length: usize) -> Result<Vec<u8>,Error> {
    let value = decode_int(value)?;
    let bits = 8 * length;
    if value < 0 {
        return Err(Error::UnsignedRange { bits, value });
    }
    if length < 16 && value >> bits > 0 {
        return Err(Error::UnsignedRange { bits, value });
    }
    Ok(int_bytes(value as u128,length,little_endian))
}

fn encode_sint(value: &str,little_endian: bool,length: usize) -> Result<Vec<u8>,Error> {
    let value = decode_int(value)?;
    let bits = 8 * length;
    let minvalue: i128 = match length < 16 {
        true => -(1i128 << (bits - 1)),
        false => i128::MIN
    };
    let maxvalue: i128 = match length < 16 {
        true => (1i128 << (bits - 1)) - 1,
        false => i128::MAX
    };
    if value < minvalue || value > maxvalue {
        return Err(Error::SignedRange { bits, value });
    }
    // two's complement at the given width
    let unsigned = (value as u128) & match length < 16 {
        true => (1u128 << bits) - 1,
        false => u128::MAX
    };
    Ok(int_bytes(unsigned,length,little_endian))
}

fn encode_str(value: &str,encoding: &str) -> Result<Vec<u8>,Error> {
    match encoding {
        "utf-8" => Ok(value.as_bytes().to_vec()),
        "latin1" => {
            let mut ans: Vec<u8> = Vec::new();
            for c in value.chars() {
                let code = c as u32;
                if code > 0xff {
                    return Err(Error::Unencodable("latin1".to_string()));
                }
                ans.push(code as u8);
            }
            Ok(ans)
        },
        "utf-16-be" => Ok(value.encode_utf16().flat_map(|u| u.to_be_bytes()).collect()),
        "utf-16-le" => Ok(value.encode_utf16().flat_map(|u| u.to_le_bytes()).collect()),
        _ => Err(Error::UnknownStrEncoding(encoding.to_string()))
    }
}

fn parse_ip(value: &str) -> Result<[u8;4],Error> {
    let patt = Regex::new(r"^(\d{1,3})\.(\d{1,3})\.(\d{1,3})\.(\d{1,3})$").expect("regex parsing error");
    let caps = patt.captures(value).ok_or(Error::BadIp(value.to_string()))?;
    let mut quad = [0u8;4];
    for i in 0..4 {
        quad[i] = caps[i+1].parse::<u8>().or(Err(Error::BadIp(value.to_string())))?;
    }
    Ok(quad)
}

fn encode_float(value: &str,length: usize,little_endian: bool) -> Result<Vec<u8>,Error> {
    let parsed = value.parse::<f64>().or(Err(Error::BadFloat(value.to_string())))?;
    match (length,little_endian) {
        (32,true) => Ok((parsed as f32).to_le_bytes().to_vec()),
        (32,false) => Ok((parsed as f32).to_be_bytes().to_vec()),
        (64,true) => Ok(parsed.to_le_bytes().to_vec()),
        (64,false) => Ok(parsed.to_be_bytes().to_vec()),
        _ => Err(Error::UnsupportedLength(length))
    }
}

fn encode_int_family(encode_as: &str,value: &str,caps: &regex::Captures) -> Result<Vec<Encoded>,Error> {
    let sign = &caps[1];
    let bits = caps[2].parse::<usize>().or(Err(Error::UnknownType(encode_as.to_string())))?;
    let endian = caps.get(4).map(|m| m.as_str()).unwrap_or("l");
    if bits==0 || bits % 8 != 0 {
        return Err(Error::BitLength(encode_as.to_string()));
    }
    let length = bits / 8;
    if length > 16 {
        return Err(Error::UnsupportedLength(bits));
    }
    let endian_chars = match endian {
        "?" => vec!["b","l"],
        e => vec![e]
    };
    let mut ans: Vec<Encoded> = Vec::new();
    for endian_char in endian_chars {
        let little_endian = endian_char=="l";
        let data = match sign {
            "s" => encode_sint(value,little_endian,length)?,
            _ => encode_uint(value,little_endian,length)?
        };
        ans.push(Encoded { name: format!("{}int-{}-{}e",sign,bits,endian_char), data });
    }
    Ok(ans)
}

fn encode_str_family(value: &str,caps: &regex::Captures) -> Result<Vec<Encoded>,Error> {
    let requested = caps.get(2).map(|m| m.as_str()).unwrap_or("utf-8");
    let encodings: Vec<&str> = match requested {
        "*" => vec!["utf-8","utf-16-be","utf-16-le","latin1"],
        "lat1" => vec!["latin1"],
        "u16-be" => vec!["utf-16-be"],
        "u16-le" => vec!["utf-16-le"],
        other => vec![other]
    };
    let mut ans: Vec<Encoded> = Vec::new();
    for encoding in encodings {
        ans.push(Encoded { name: format!("str-{}",encoding), data: encode_str(value,encoding)? });
    }
    Ok(ans)
}

/// Encode a value in all variants implied by the type string
pub fn encode(value: &str,encode_as: &str) -> Result<Vec<Encoded>,Error> {
    let int_patt = Regex::new(r"^([us])int(\d+)(-([bl?])e)?$").expect("regex parsing error");
    let str_patt = Regex::new(r"^str(-([-a-zA-Z0-9*]+))?$").expect("regex parsing error");
    let float_patt = Regex::new(r"^float(\d+)?(-([bl])e)?$").expect("regex parsing error");
    let b64_patt = Regex::new(r"^b(ase)?64$").expect("regex parsing error");

    if let Some(caps) = int_patt.captures(encode_as) {
        return encode_int_family(encode_as,value,&caps);
    }
    if let Some(caps) = str_patt.captures(encode_as) {
        return encode_str_family(value,&caps);
    }
    if let Some(caps) = float_patt.captures(encode_as) {
        let bits = match caps.get(1) {
            Some(m) => m.as_str().parse::<usize>().or(Err(Error::UnknownType(encode_as.to_string())))?,
            None => 32
        };
        let endian = caps.get(3).map(|m| m.as_str()).unwrap_or("l");
        let data = encode_float(value,bits,endian=="l")?;
        return Ok(vec![Encoded { name: format!("float-{}-{}e",bits,endian), data }]);
    }
    if encode_as=="hex" {
        let stripped: String = value.chars().filter(|c| !c.is_whitespace()).collect();
        let data = hex::decode(&stripped).or(Err(Error::BadHex(value.to_string())))?;
        return Ok(vec![Encoded { name: "hex".to_string(), data }]);
    }
    if b64_patt.is_match(encode_as) {
        let data = base64::engine::general_purpose::STANDARD.decode(value)
            .or(Err(Error::BadBase64(value.to_string())))?;
        return Ok(vec![Encoded { name: "base64".to_string(), data }]);
    }
    if encode_as=="ip" {
        let quad = parse_ip(value)?;
        return Ok(vec![
            Encoded { name: "ipv4-str".to_string(), data: format!("{}.{}.{}.{}",quad[0],quad[1],quad[2],quad[3]).into_bytes() },
            Encoded { name: "ipv4-be".to_string(), data: quad.to_vec() },
            Encoded { name: "ipv4-le".to_string(), data: quad.iter().rev().cloned().collect() }
        ]);
    }
    Err(Error::UnknownType(encode_as.to_string()))
}

/// Encode a whole `TYPE:VALUE` argument
pub fn encode_argument(argument: &str) -> Result<Vec<Encoded>,Error> {
    match argument.split_once(':') {
        Some((encode_as,value)) => encode(value,encode_as),
        None => Err(Error::MissingValue(argument.to_string()))
    }
}
