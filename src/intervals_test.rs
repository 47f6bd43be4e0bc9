#[cfg(test)]
use super::intervals::{Interval,IntervalSet,Error};

#[test]
fn disjoint_inserts() {
    let mut set = IntervalSet::new(false,false);
    set.add(Interval::new(10,20)).expect("rejected disjoint interval");
    set.add(Interval::new(30,40)).expect("rejected disjoint interval");
    set.add(Interval::new(0,5)).expect("rejected disjoint interval");
    assert_eq!(set.len(),3);
    let begins: Vec<u64> = set.iter().map(|i| i.begin).collect();
    assert_eq!(begins,vec![0,10,30]);
}

#[test]
fn adjacent_is_not_overlap() {
    let mut set = IntervalSet::new(false,false);
    set.add(Interval::new(0,5)).expect("rejected disjoint interval");
    set.add(Interval::new(5,8)).expect("half-open neighbors must not collide");
    assert_eq!(set.len(),2);
}

#[test]
fn overlap_rejected() {
    let mut set = IntervalSet::new(false,false);
    set.add(Interval::new(10,20)).expect("rejected disjoint interval");
    assert_eq!(set.add(Interval::new(15,25)),Err(Error::Overlap));
    assert_eq!(set.add(Interval::new(5,11)),Err(Error::Overlap));
    assert_eq!(set.add(Interval::new(12,13)),Err(Error::Overlap));
    assert_eq!(set.add(Interval::new(0,30)),Err(Error::Overlap));
    assert_eq!(set.len(),1);
}

#[test]
fn identical_rejected() {
    let mut set = IntervalSet::new(false,false);
    set.add(Interval::new(10,20)).expect("rejected disjoint interval");
    let err = set.add(Interval::new(10,20)).expect_err("duplicate accepted");
    // a duplicate is also an overlap, the identical check runs first
    assert_eq!(err,Error::Identical);
}

#[test]
fn overlap_allowed_identical_rejected() {
    let mut set = IntervalSet::new(true,false);
    set.add(Interval::new(10,20)).expect("rejected interval");
    set.add(Interval::new(15,25)).expect("overlap should be allowed here");
    set.add(Interval::new(10,30)).expect("overlap should be allowed here");
    assert_eq!(set.add(Interval::new(10,20)),Err(Error::Identical));
    assert_eq!(set.len(),3);
}

#[test]
fn everything_allowed() {
    let mut set = IntervalSet::new(true,true);
    set.add(Interval::new(10,20)).expect("rejected interval");
    set.add(Interval::new(10,20)).expect("rejected interval");
    assert_eq!(set.len(),2);
}

#[test]
fn begin_length_form() {
    let ival = Interval::begin_length(0x100,0x40);
    assert_eq!(ival.begin,0x100);
    assert_eq!(ival.end,0x140);
    assert_eq!(ival.len(),0x40);
}
