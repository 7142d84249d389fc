//! # Flowcell
//!
//! Async-local variables: data that belongs to a logical call chain rather
//! than to an OS thread.
//!
//! A logical operation may hop between many threads (continuations resumed
//! on different workers, blocking work handed to a pool) while still needing
//! data that belongs to *that operation*. Flowcell gives each chain its own
//! copy: forked children inherit a snapshot taken at the moment they are
//! created, and nothing a child writes ever flows back to its parent or
//! siblings.
//!
//! ## Quick Start
//!
//! ```
//! use flowcell::prelude::*;
//!
//! let request_id = AsyncLocal::<u64>::new();
//! request_id.set(42);
//!
//! let seen = spawn_thread({
//!     let request_id = std::sync::Arc::new(request_id);
//!     move || request_id.get()
//! })
//! .join()
//! .unwrap();
//!
//! assert_eq!(seen, 42);
//! ```
//!
//! ## Forking
//!
//! - [`fork`]: nested synchronous call, inherits, never leaks back
//! - [`spawn_thread`]: OS thread starting in a child chain
//! - [`flow()`] / [`FlowExt::flow`]: future carrying its own chain across polls
//! - [`spawn`] / [`spawn_blocking`]: tokio tasks starting in a child chain
//! - [`isolate`] / [`Chain::root`]: fresh roots that share nothing
//!
//! ## Layers
//!
//! - `flowcell-core`: ids, slot wrapper, [`AmbientStorage`] contract, errors
//! - `flowcell-storage`: [`ChainView`], [`CurrentChain`], [`Chain`]
//! - `flowcell-concurrency`: snapshots, forks, [`Flow`], tokio helpers
//! - `flowcell-primitives`: [`AsyncLocal`]

#![warn(missing_docs)]

pub mod prelude;

// Re-export core types
pub use flowcell_core::{AmbientStorage, ChainId, Error, Origin, Result, Slot, SlotId};

// Re-export storage
pub use flowcell_storage::{Chain, ChainView, CurrentChain, EnterGuard};

// Re-export propagation
pub use flowcell_concurrency::{
    flow, fork, isolate, spawn, spawn_blocking, spawn_thread, ChainSnapshot, Flow, FlowExt,
};

// Re-export primitives
pub use flowcell_primitives::{async_local, AsyncLocal, AsyncLocalBuilder, CellConfig};
