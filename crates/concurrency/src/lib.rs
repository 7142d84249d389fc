//! Propagation layer for flowcell
//!
//! This crate implements the "flows forward, never backward" law on top of
//! the storage layer:
//! - ChainSnapshot: capture the current chain, run code in a child of it
//! - fork / isolate / spawn_thread: synchronous and thread-level forks
//! - Flow: a future that carries its own chain across polls and threads
//! - spawn / spawn_blocking: tokio entry points that fork automatically
//!
//! Every fork takes its snapshot when the child is *created*, not when it
//! first reads. Writes made after that instant stay on their own side.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod flow;
pub mod runtime;
pub mod snapshot;

pub use flow::{flow, Flow, FlowExt};
pub use runtime::{spawn, spawn_blocking};
pub use snapshot::{fork, isolate, spawn_thread, ChainSnapshot};
