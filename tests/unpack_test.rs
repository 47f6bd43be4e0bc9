// end-to-end scanning tests built around the uboot classifier, whose
// extraction is a bare carve and needs no external decoder
use assert_cmd::Command;
use std::path::Path;
use fwkit::unpack::{FileUnpacker,UnpackOptions};

fn uboot_image(payload: &[u8]) -> Vec<u8> {
    let mut img: Vec<u8> = vec![0x27,0x05,0x19,0x56];
    img.extend_from_slice(&[0;4]);
    img.extend_from_slice(&[0;4]);
    img.extend_from_slice(&u32::to_be_bytes(payload.len() as u32));
    img.extend_from_slice(&[0;12]);
    img.extend_from_slice(&[5,2,2,1]);
    let mut name = b"test-kernel".to_vec();
    name.resize(32,0);
    img.extend_from_slice(&name);
    img.extend_from_slice(payload);
    img
}

/// filler that contains no classifier signature
fn junk(len: usize) -> Vec<u8> {
    vec![0x41;len]
}

#[test]
fn unpack_extracts_uboot_payload() {
    let dir = tempfile::tempdir().expect("no temp dir");
    let payload = [0xcc;48];
    let mut data = junk(0x40);
    data.extend_from_slice(&uboot_image(&payload));
    data.extend_from_slice(&junk(0x20));
    let input = dir.path().join("firmware.bin");
    std::fs::write(&input,&data).expect("could not write input");
    let dest = dir.path().join("out");

    let mut cmd = Command::cargo_bin("fwkit").expect("binary missing");
    cmd.arg("unpack")
        .arg("-d").arg(&dest)
        .arg(&input)
        .assert()
        .success();

    let extracted = std::fs::read(dest.join("payload_0x00000040.uboot")).expect("payload missing");
    assert_eq!(extracted,payload);
}

#[test]
fn unpack_carves_whole_container() {
    let dir = tempfile::tempdir().expect("no temp dir");
    let payload = [0xcc;16];
    let image = uboot_image(&payload);
    let mut data = junk(0x10);
    data.extend_from_slice(&image);
    let input = dir.path().join("firmware.bin");
    std::fs::write(&input,&data).expect("could not write input");
    let dest = dir.path().join("out");

    let mut cmd = Command::cargo_bin("fwkit").expect("binary missing");
    cmd.arg("unpack")
        .arg("-c").arg("-n")
        .arg("-d").arg(&dest)
        .arg(&input)
        .assert()
        .success();

    let carved = std::fs::read(dest.join("carved_0x00000010.uboot")).expect("carve missing");
    assert_eq!(carved,image);
    // extraction was suppressed
    assert!(!dest.join("payload_0x00000010.uboot").exists());
}

#[test]
fn oversized_claim_is_rejected() {
    let dir = tempfile::tempdir().expect("no temp dir");
    // header claims 4 KiB of payload but the file ends after 8 bytes
    let mut image = uboot_image(&[0xcc;4096]);
    image.truncate(64 + 8);
    let input = dir.path().join("firmware.bin");
    std::fs::write(&input,&image).expect("could not write input");
    let dest = dir.path().join("out");

    let mut cmd = Command::cargo_bin("fwkit").expect("binary missing");
    cmd.arg("unpack")
        .arg("-c").arg("-n")
        .arg("-d").arg(&dest)
        .arg(&input)
        .assert()
        .success();

    assert!(!dest.join("carved_0x00000000.uboot").exists());
}

fn carve_names(dest: &Path) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    if let Ok(listing) = std::fs::read_dir(dest) {
        for entry in listing {
            names.push(entry.expect("bad dir entry").file_name().to_string_lossy().to_string());
        }
    }
    names.sort();
    names
}

#[test]
fn matches_independent_of_chunk_geometry() {
    let dir = tempfile::tempdir().expect("no temp dir");
    let mut data = junk(100);
    data.extend_from_slice(&uboot_image(&[0xcc;16])); // at 100
    data.resize(4090,0x41);
    data.extend_from_slice(&uboot_image(&[0xdd;16])); // signature straddles a 4 KiB boundary
    data.extend_from_slice(&junk(64));
    let input = dir.path().join("firmware.bin");
    std::fs::write(&input,&data).expect("could not write input");

    let opts = UnpackOptions { carve: true, noextract: true, ..Default::default() };
    let mut results: Vec<Vec<String>> = Vec::new();
    for (chunk,overlap) in [(4096,512),(1024,256),(1 << 20,64 << 10)] {
        let dest = dir.path().join(format!("out_{}",chunk));
        let unpacker = FileUnpacker::new(opts).with_geometry(chunk,overlap);
        unpacker.unpack_all(&input,&dest).expect("unpack failed");
        results.push(carve_names(&dest));
    }
    assert_eq!(results[0],vec!["carved_0x00000064.uboot","carved_0x00000ffa.uboot"]);
    assert_eq!(results[0],results[1]);
    assert_eq!(results[0],results[2]);
}

#[test]
fn directory_walk_requires_flag() {
    let dir = tempfile::tempdir().expect("no temp dir");
    let tree = dir.path().join("tree");
    std::fs::create_dir_all(&tree).expect("could not make tree");
    let mut data = junk(8);
    data.extend_from_slice(&uboot_image(&[0xee;8]));
    std::fs::write(tree.join("inner.bin"),&data).expect("could not write input");

    // without the flag a directory input is a no-op
    let opts = UnpackOptions { carve: true, noextract: true, ..Default::default() };
    FileUnpacker::new(opts).unpack_all(&tree,&dir.path().join("unused")).expect("unpack failed");
    assert!(!tree.join("inner.bin_content").exists());

    let opts = UnpackOptions { carve: true, noextract: true, recurse_multifiles: true, ..Default::default() };
    FileUnpacker::new(opts).unpack_all(&tree,&dir.path().join("unused")).expect("unpack failed");
    let carved = std::fs::read(tree.join("inner.bin_content").join("carved_0x00000008.uboot")).expect("carve missing");
    assert_eq!(carved.len(),64 + 8);
}
