//! Storage layer for flowcell
//!
//! This crate implements the chain-scoped ambient storage a cell talks to:
//! - ChainView: copy-on-write map of one chain's slots
//! - CurrentChain: the view installed on the running thread
//! - Chain: an explicit, injectable chain handle
//!
//! Forking a view is O(1). The first write after a fork copies the map once,
//! so parent and child never observe each other's later writes.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod chain;
pub mod current;
pub mod view;

pub use chain::Chain;
pub use current::{CurrentChain, EnterGuard};
pub use view::ChainView;
