#[cfg(test)]
use super::futil::{findall,carve};

#[test]
fn findall_overlapping() {
    let hay = b"aaaa";
    let hits: Vec<usize> = findall(hay,b"aa").collect();
    assert_eq!(hits,vec![0,1,2]);
}

#[test]
fn findall_none() {
    let hits: Vec<usize> = findall(b"abcdef",b"xy").collect();
    assert_eq!(hits.len(),0);
    let hits: Vec<usize> = findall(b"ab",b"abc").collect();
    assert_eq!(hits.len(),0);
}

#[test]
fn carve_limited() {
    let src = b"0123456789";
    let mut out: Vec<u8> = Vec::new();
    let n = carve(&mut &src[..],&mut out,Some(4)).expect("carve failed");
    assert_eq!(n,4);
    assert_eq!(out,b"0123");
    let mut out: Vec<u8> = Vec::new();
    let n = carve(&mut &src[..],&mut out,None).expect("carve failed");
    assert_eq!(n,10);
    assert_eq!(out,src);
}
