use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn encode_uint16_piped() {
    let mut cmd = Command::cargo_bin("fwkit").expect("binary missing");
    let output = cmd.arg("encode").arg("uint16:1234").output().expect("run failed");
    assert!(output.status.success());
    assert_eq!(output.stdout,vec![0xd2,0x04]);
}

#[test]
fn encode_uint16_big_endian_piped() {
    let mut cmd = Command::cargo_bin("fwkit").expect("binary missing");
    let output = cmd.arg("encode").arg("uint16-be:1234").output().expect("run failed");
    assert!(output.status.success());
    assert_eq!(output.stdout,vec![0x04,0xd2]);
}

#[test]
fn encode_several_specs() {
    let mut cmd = Command::cargo_bin("fwkit").expect("binary missing");
    let output = cmd.arg("encode").arg("hex:aabb").arg("str:cd").output().expect("run failed");
    assert!(output.status.success());
    assert_eq!(output.stdout,vec![0xaa,0xbb,0x63,0x64]);
}

#[test]
fn encode_signed_overflow_fails() {
    let mut cmd = Command::cargo_bin("fwkit").expect("binary missing");
    cmd.arg("encode")
        .arg("sint8:-129")
        .assert()
        .failure()
        .stderr(predicate::str::contains("signed int of 8 bits"));
}

#[test]
fn encode_unknown_type_fails() {
    let mut cmd = Command::cargo_bin("fwkit").expect("binary missing");
    cmd.arg("encode")
        .arg("nonsense:1")
        .assert()
        .failure()
        .stderr(predicate::str::contains("nonsense"));
}

#[test]
fn hexbin_reassembles_records() {
    let dir = tempfile::tempdir().expect("no temp dir");
    // two 16 byte records at 0x1000 and 0x1010, checksums precomputed,
    // terminated by the standard end-of-file marker
    let hexfile = ":10100000000102030405060708090A0B0C0D0E0F68\n\
                   :10101000101112131415161718191A1B1C1D1E1F58\n\
                   :00000001FF\n";
    let input = dir.path().join("firmware.hex");
    std::fs::write(&input,hexfile).expect("could not write input");
    let dest = dir.path().join("chunks");

    let mut cmd = Command::cargo_bin("fwkit").expect("binary missing");
    cmd.arg("hexbin")
        .arg("-d").arg(&dest)
        .arg(&input)
        .assert()
        .success();

    let chunk = std::fs::read(dest.join("chunk_00001000.bin")).expect("chunk missing");
    let expected: Vec<u8> = (0..32).collect();
    assert_eq!(chunk,expected);
}

#[test]
fn hexbin_unsupported_record_fails() {
    let dir = tempfile::tempdir().expect("no temp dir");
    // record type 0x03 (start segment address) is not supported
    let hexfile = ":0400000300003800C1\n";
    let input = dir.path().join("firmware.hex");
    std::fs::write(&input,hexfile).expect("could not write input");

    let mut cmd = Command::cargo_bin("fwkit").expect("binary missing");
    cmd.arg("hexbin")
        .arg("-d").arg(dir.path().join("chunks"))
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported record type"));
}

#[test]
fn completions_bash() {
    let mut cmd = Command::cargo_bin("fwkit").expect("binary missing");
    cmd.arg("completions")
        .arg("-s").arg("bash")
        .assert()
        .success()
        .stdout(predicate::str::contains("fwkit"));
}

#[test]
fn unpack_missing_file_fails() {
    let mut cmd = Command::cargo_bin("fwkit").expect("binary missing");
    cmd.arg("unpack")
        .arg("no-such-file.bin")
        .assert()
        .failure();
}
