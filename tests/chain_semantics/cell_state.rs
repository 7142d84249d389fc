//! Cell State Tests
//!
//! is_set / is_created / clear / dispose within a single chain.

use crate::init_tracing;
use flowcell::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

// =============================================================================
// IS_SET
// =============================================================================

#[test]
fn test_fresh_cell_is_not_set() {
    init_tracing();
    let local = AsyncLocal::<i32>::new();
    assert!(!local.is_set());
}

#[test]
fn test_read_of_type_default_does_not_set() {
    init_tracing();
    let local = AsyncLocal::<i32>::new();
    assert_eq!(local.get(), 0);
    assert!(!local.is_set());
}

#[test]
fn test_read_of_fixed_default_does_not_set() {
    init_tracing();
    let local = AsyncLocal::with_default(13);
    assert_eq!(local.get(), 13);
    assert!(!local.is_set());
}

#[test]
fn test_write_sets_and_reads_back() {
    init_tracing();
    let local = AsyncLocal::<i32>::new();
    local.set(13);
    assert!(local.is_set());
    assert_eq!(local.get(), 13);
}

#[test]
fn test_write_of_zero_value_counts_as_set() {
    let local = AsyncLocal::with_default(13);
    local.set(0);
    assert!(local.is_set());
    assert_eq!(local.get(), 0);
}

// =============================================================================
// CLEAR
// =============================================================================

#[test]
fn test_clear_resets_and_reruns_factory() {
    init_tracing();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let local = AsyncLocal::with_factory(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        String::from("fresh")
    });

    local.set(String::from("written"));
    local.clear();

    assert!(!local.is_set());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(local.get(), "fresh");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_clear_is_idempotent() {
    let local = AsyncLocal::<i32>::new();
    local.clear();
    local.clear();
    assert!(!local.is_created());
}

// =============================================================================
// CREATED VS SET
// =============================================================================

#[test]
fn test_read_materializes_but_has_value_query_does_not() {
    let local = AsyncLocal::<i32>::new();
    assert!(!local.is_set());
    assert!(!local.is_created());

    let _ = local.get();
    assert!(local.is_created());
    assert!(!local.is_set());
}

// =============================================================================
// DISPOSE
// =============================================================================

#[test]
fn test_dispose_frees_slot() {
    init_tracing();
    let local = AsyncLocal::<i32>::new();
    let id = local.id();
    local.set(13);
    local.dispose();
    assert!(!CurrentChain.contains(id));
}

// =============================================================================
// INDEPENDENT CELLS
// =============================================================================

#[test]
fn test_independent_cells_never_observe_each_other() {
    let a = AsyncLocal::<i32>::new();
    let b = AsyncLocal::<i32>::with_default(-1);

    a.set(1);
    assert_eq!(b.get(), -1);
    b.set(2);
    assert_eq!(a.get(), 1);

    fork(|| {
        a.set(10);
        assert_eq!(b.get(), 2);
    });
    assert_eq!(a.get(), 1);
    assert_eq!(b.get(), 2);
}
