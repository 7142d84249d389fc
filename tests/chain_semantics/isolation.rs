//! Isolation Tests
//!
//! Isolated roots model separate environments: nothing crosses them.

use crate::init_tracing;
use flowcell::prelude::*;

async_local!(static ENVIRONMENT_LOCAL: i32 = 17;);

#[test]
fn test_value_does_not_travel_into_isolated_environment() {
    init_tracing();
    ENVIRONMENT_LOCAL.set(13);

    let inside = isolate(|| ENVIRONMENT_LOCAL.get());

    assert_eq!(inside, 17);
    assert_eq!(ENVIRONMENT_LOCAL.get(), 13);
}

#[test]
fn test_isolated_write_does_not_travel_out() {
    let local = AsyncLocal::<i32>::new();
    isolate(|| local.set(99));
    assert!(!local.is_set());
}

#[test]
fn test_static_cell_is_named() {
    assert_eq!(ENVIRONMENT_LOCAL.name(), Some("ENVIRONMENT_LOCAL"));
}

// =============================================================================
// EXPLICIT ROOTS
// =============================================================================

#[test]
fn test_explicit_roots_share_nothing() {
    let local = AsyncLocal::with_default(17);
    let here = Chain::root();
    let there = Chain::root();

    local.set_in(&here, 13);

    assert_eq!(local.get_in(&there), 17);
    assert_eq!(local.get_in(&here), 13);
}

#[test]
fn test_chain_run_bridges_to_plain_accessors() {
    let local = AsyncLocal::<i32>::new();
    let chain = Chain::root();

    chain.run(|| local.set(13));

    assert_eq!(local.get_in(&chain), 13);
    assert!(!local.is_set());
    assert_eq!(chain.run(|| local.get()), 13);
}

#[test]
fn test_forked_explicit_chain_isolation() {
    let local = AsyncLocal::<i32>::new();
    let parent = Chain::root();
    local.set_in(&parent, 13);

    let child = parent.fork();
    assert_eq!(local.get_in(&child), 13);
    local.set_in(&child, 17);

    assert_eq!(local.get_in(&parent), 13);
}

#[test]
fn test_explicit_write_inside_run_survives() {
    let local = AsyncLocal::<i32>::new();
    let chain = Chain::root();

    chain.run(|| local.set_in(&chain, 13));

    assert_eq!(local.get_in(&chain), 13);
    assert!(local.is_set_in(&chain));
    assert_eq!(chain.run(|| local.get()), 13);
}

#[test]
fn test_both_accessors_inside_run_share_one_default() {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let local = AsyncLocal::with_factory(move || counter.fetch_add(1, Ordering::SeqCst));
    let chain = Chain::root();

    let (explicit, ambient) = chain.run(|| (local.get_in(&chain), local.get()));

    assert_eq!(explicit, ambient);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(local.is_created_in(&chain));
    assert!(!local.is_set_in(&chain));
}

#[test]
fn test_nested_run_on_one_chain() {
    let local = AsyncLocal::<i32>::new();
    let chain = Chain::root();

    chain.run(|| {
        chain.run(|| local.set(13));
        assert_eq!(local.get_in(&chain), 13);
        local.set_in(&chain, 17);
    });

    assert_eq!(local.get_in(&chain), 17);
    assert!(!local.is_set());
}
