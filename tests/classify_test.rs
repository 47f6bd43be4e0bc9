// investigation logic of the header-driven classifiers, over in-memory files
use std::io::Cursor;
use fwkit::classify::{self,Classifier};

/// EOCD record with the given geometry, comment omitted
fn eocd(cd_size: u32,cd_offset: u32,comment_length: u16) -> Vec<u8> {
    let mut rec: Vec<u8> = b"PK\x05\x06".to_vec();
    rec.extend_from_slice(&[0;4]); // disk numbers
    rec.extend_from_slice(&u16::to_le_bytes(1)); // disk entries
    rec.extend_from_slice(&u16::to_le_bytes(1)); // total entries
    rec.extend_from_slice(&u32::to_le_bytes(cd_size));
    rec.extend_from_slice(&u32::to_le_bytes(cd_offset));
    rec.extend_from_slice(&u16::to_le_bytes(comment_length));
    rec
}

/// minimal central directory entry header
fn cd_entry() -> Vec<u8> {
    let mut rec: Vec<u8> = u32::to_le_bytes(0x02014b50).to_vec();
    rec.extend_from_slice(&[0;42]);
    rec
}

#[test]
fn zip_reverse_locate() {
    // archive laid out as local data (70 bytes), CD (46 bytes), EOCD
    let prefix_junk = 100;
    let cd_offset = 70u32;
    let cd = cd_entry();
    let cd_size = cd.len() as u32;
    let mut file: Vec<u8> = vec![0x41;prefix_junk + cd_offset as usize];
    file.extend_from_slice(&cd);
    let eocd_at = file.len() as u64;
    file.extend_from_slice(&eocd(cd_size,cd_offset,0));
    let mut f = Cursor::new(file);
    let classifier = classify::zip::PKZip;
    let (start,length) = classifier.investigate(&mut f,eocd_at).expect("zip rejected");
    assert_eq!(start,eocd_at - cd_size as u64 - cd_offset as u64);
    assert_eq!(start,prefix_junk as u64);
    assert_eq!(length,Some(cd_size as u64 + cd_offset as u64 + 22));
}

#[test]
fn zip_missing_central_directory() {
    // EOCD whose claimed central directory is absent
    let mut file: Vec<u8> = vec![0x41;200];
    let eocd_at = file.len() as u64;
    file.extend_from_slice(&eocd(46,70,0));
    let mut f = Cursor::new(file);
    let classifier = classify::zip::PKZip;
    assert!(classifier.investigate(&mut f,eocd_at).is_none());
}

#[test]
fn zip_underflow_rejected() {
    // EOCD too close to the file start for its own bookkeeping
    let mut file: Vec<u8> = vec![0x41;10];
    let eocd_at = file.len() as u64;
    file.extend_from_slice(&eocd(0x1000,0,0));
    let mut f = Cursor::new(file);
    let classifier = classify::zip::PKZip;
    assert!(classifier.investigate(&mut f,eocd_at).is_none());
}

fn uboot_image(payload: &[u8]) -> Vec<u8> {
    let mut img: Vec<u8> = vec![0x27,0x05,0x19,0x56];
    img.extend_from_slice(&[0;4]); // hdr_crc
    img.extend_from_slice(&[0;4]); // time
    img.extend_from_slice(&u32::to_be_bytes(payload.len() as u32));
    img.extend_from_slice(&[0;12]); // load_addr, entry_point, data_crc
    img.extend_from_slice(&[5,2,2,1]); // os, arch, img_type, compression
    let mut name = b"test-kernel".to_vec();
    name.resize(32,0);
    img.extend_from_slice(&name);
    img.extend_from_slice(payload);
    img
}

#[test]
fn uboot_sized_by_header() {
    let payload = [0xcc;48];
    let mut file: Vec<u8> = vec![0x41;64];
    let at = file.len() as u64;
    file.extend_from_slice(&uboot_image(&payload));
    let mut f = Cursor::new(file);
    let classifier = classify::uboot::UBootImage;
    let (start,length) = classifier.investigate(&mut f,at).expect("uboot rejected");
    assert_eq!(start,at);
    assert_eq!(length,Some(64 + 48));
}

#[test]
fn tar_start_precedes_signature() {
    let classifier = classify::tar::Tar;
    let mut f = Cursor::new(Vec::<u8>::new());
    assert_eq!(classifier.investigate(&mut f,0x301),Some((0x200,None)));
    // a signature closer to the file start than a header allows is rejected
    assert!(classifier.investigate(&mut f,0x100).is_none());
}

#[test]
fn dex_version_and_length() {
    let mut file: Vec<u8> = b"dex\n035\x00".to_vec();
    file.resize(0x20,0);
    file.extend_from_slice(&u32::to_le_bytes(0x70));
    file.resize(0x70,0);
    let mut f = Cursor::new(file.clone());
    let classifier = classify::dex::Dex;
    assert_eq!(classifier.investigate(&mut f,0),Some((0,Some(0x70))));
    // a non-digit version is a false positive
    file[4] = b'x';
    let mut f = Cursor::new(file);
    assert!(classifier.investigate(&mut f,0).is_none());
}

#[test]
fn bzip2_block_magic_checked() {
    let classifier = classify::bzip2::BZip2;
    let mut good: Vec<u8> = b"BZh9".to_vec();
    good.extend_from_slice(b"1AY&SY");
    good.extend_from_slice(&[0;8]);
    let mut f = Cursor::new(good);
    assert_eq!(classifier.investigate(&mut f,0),Some((0,None)));
    let mut bad: Vec<u8> = b"BZh9".to_vec();
    bad.extend_from_slice(b"XXXXXX");
    bad.extend_from_slice(&[0;8]);
    let mut f = Cursor::new(bad);
    assert!(classifier.investigate(&mut f,0).is_none());
}

#[test]
fn zlib_byte_pair() {
    let classifier = classify::zlib::Zlib;
    for flg in [0x01u8,0x9c,0xda] {
        let mut f = Cursor::new(vec![0x78,flg,0,0]);
        assert_eq!(classifier.investigate(&mut f,0),Some((0,None)));
    }
    let mut f = Cursor::new(vec![0x78,0x02,0,0]);
    assert!(classifier.investigate(&mut f,0).is_none());
    let hits: Vec<usize> = classifier.scan(&[0x00,0x78,0x9c,0x78,0x02,0x78]).collect();
    assert_eq!(hits,vec![1]);
}

#[test]
fn registry_priority_order() {
    let names: Vec<&str> = classify::all().iter().map(|c| c.name()).collect();
    assert_eq!(&names[0..6],&["uboot","squashfs","cramfs","tar","zip","gzip"]);
    assert_eq!(names.len(),10);
}
