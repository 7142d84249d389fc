//! Platform Contract Tests
//!
//! Checks the ambient storage layer directly, below any cell. Cells rely on
//! exactly these behaviours, so a regression here shows up first.

use flowcell::prelude::*;
use flowcell::{Slot, SlotId};

fn read(slot: SlotId) -> Option<i32> {
    CurrentChain
        .get(slot)
        .and_then(|s| s.downcast_ref::<i32>().copied())
}

#[test]
fn test_value_inherited_by_another_thread() {
    let slot = SlotId::new();
    CurrentChain.set(slot, Slot::explicit(13));
    let seen = spawn_thread(move || read(slot)).join().unwrap();
    assert_eq!(seen, Some(13));
}

#[test]
fn test_value_modified_by_thread_not_propagated_back() {
    let slot = SlotId::new();
    CurrentChain.set(slot, Slot::explicit(13));
    spawn_thread(move || CurrentChain.set(slot, Slot::explicit(17)))
        .join()
        .unwrap();
    assert_eq!(read(slot), Some(13));
}

#[test]
fn test_missing_value_added_by_thread_not_propagated_back() {
    let slot = SlotId::new();
    spawn_thread(move || CurrentChain.set(slot, Slot::explicit(13)))
        .join()
        .unwrap();
    assert_eq!(read(slot), None);
}

#[test]
fn test_missing_value_added_by_plain_call_is_visible_to_caller() {
    let slot = SlotId::new();
    let action = || CurrentChain.set(slot, Slot::explicit(13));
    action();
    assert_eq!(read(slot), Some(13));
}

#[test]
fn test_inherited_wrapper_is_shared_not_copied() {
    let slot = SlotId::new();
    CurrentChain.set(slot, Slot::explicit(String::from("immutable")));
    let parent = CurrentChain.get(slot).unwrap();
    let child = fork(|| CurrentChain.get(slot).unwrap());
    assert!(parent.ptr_eq(&child));
}
