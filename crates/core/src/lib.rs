//! Core types for flowcell
//!
//! This crate defines the vocabulary shared by every layer:
//! - [`SlotId`]: process-unique identity of one async-local variable
//! - [`ChainId`]: diagnostic identity of one logical call chain
//! - [`Slot`]: the tagged wrapper stored in ambient storage
//! - [`AmbientStorage`]: the contract a host chain-scoped store must satisfy
//! - [`Error`]: the (small) error taxonomy
//!
//! Nothing here performs IO, spawns threads, or touches thread-locals.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod slot;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
pub use slot::{Origin, Slot};
pub use traits::AmbientStorage;
pub use types::{ChainId, SlotId};
