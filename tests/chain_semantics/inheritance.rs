//! Inheritance Tests
//!
//! Values flow from a chain into the children it forks, never back.

use crate::init_tracing;
use flowcell::prelude::*;
use std::sync::{Arc, Barrier};

// =============================================================================
// SYNCHRONOUS FORKS
// =============================================================================

#[test]
fn test_value_inherited_by_nested_fork() {
    init_tracing();
    let local = AsyncLocal::<i32>::new();
    local.set(13);
    assert_eq!(fork(|| local.get()), 13);
}

#[test]
fn test_fork_before_write_isolation() {
    init_tracing();
    let local = AsyncLocal::<i32>::new();
    local.set(13);
    fork(|| {
        assert_eq!(local.get(), 13);
        local.set(17);
    });
    assert_eq!(local.get(), 13);
}

#[test]
fn test_clear_in_child_does_not_clear_parent() {
    let local = AsyncLocal::<i32>::with_default(5);
    local.set(13);
    fork(|| {
        local.clear();
        assert_eq!(local.get(), 5);
    });
    assert!(local.is_set());
    assert_eq!(local.get(), 13);
}

#[test]
fn test_snapshot_taken_at_capture_not_at_run() {
    let local = AsyncLocal::<i32>::new();
    local.set(13);
    let snapshot = ChainSnapshot::capture();
    local.set(17);
    assert_eq!(snapshot.run(|| local.get()), 13);
}

// =============================================================================
// THREADS
// =============================================================================

#[test]
fn test_value_inherited_by_thread() {
    init_tracing();
    let local = Arc::new(AsyncLocal::<i32>::new());
    local.set(13);
    let inner = Arc::clone(&local);
    assert_eq!(spawn_thread(move || inner.get()).join().unwrap(), 13);
}

#[test]
fn test_thread_write_not_visible_to_parent() {
    let local = Arc::new(AsyncLocal::<i32>::new());
    local.set(13);
    let inner = Arc::clone(&local);
    spawn_thread(move || inner.set(17)).join().unwrap();
    assert_eq!(local.get(), 13);
}

#[test]
fn test_parent_write_after_spawn_not_visible_to_thread() {
    let local = Arc::new(AsyncLocal::<i32>::new());
    local.set(13);

    let forked = Arc::new(Barrier::new(2));
    let written = Arc::new(Barrier::new(2));
    let handle = {
        let local = Arc::clone(&local);
        let forked = Arc::clone(&forked);
        let written = Arc::clone(&written);
        spawn_thread(move || {
            forked.wait();
            written.wait();
            local.get()
        })
    };

    forked.wait();
    local.set(17);
    written.wait();

    assert_eq!(handle.join().unwrap(), 13);
    assert_eq!(local.get(), 17);
}

#[test]
fn test_sibling_threads_do_not_see_each_other() {
    let local = Arc::new(AsyncLocal::<usize>::new());
    let barrier = Arc::new(Barrier::new(8));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let local = Arc::clone(&local);
            let barrier = Arc::clone(&barrier);
            spawn_thread(move || {
                local.set(i);
                barrier.wait();
                local.get()
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), i);
    }
    assert!(!local.is_set());
}
