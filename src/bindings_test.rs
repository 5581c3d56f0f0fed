use std::cell::{Cell, OnceCell};
use std::rc::Rc;

use super::*;

#[test]
fn install_once_builds_on_first_call_only() {
    let slot = OnceCell::new();
    let builds = Cell::new(0);
    let build = |value: &'static str| {
        builds.set(builds.get() + 1);
        Some(value)
    };

    assert_eq!(install_once(&slot, || build("default")), Some("default"));
    assert_eq!(install_once(&slot, || build("custom")), Some("default"));
    assert_eq!(builds.get(), 1);
}

#[test]
fn install_once_retries_after_failed_build() {
    let slot: OnceCell<u32> = OnceCell::new();
    assert_eq!(install_once(&slot, || None), None);
    assert!(slot.get().is_none());
    assert_eq!(install_once(&slot, || Some(7)), Some(7));
}

#[test]
fn second_install_shares_the_first_controller() {
    let slot = OnceCell::new();
    let first = install_once(&slot, || Some(Rc::new(0_u8)));
    let second = install_once(&slot, || Some(Rc::new(1_u8)));
    match (first, second) {
        (Some(a), Some(b)) => assert!(Rc::ptr_eq(&a, &b)),
        other => panic!("expected two installs, got {other:?}"),
    }
}
