//! Error types for flowcell
//!
//! Normal operation never fails: reads fall back to the default factory,
//! writes and clears are total. The one latent failure is a slot holding a
//! wrapper of a different type than the cell expects, which can only happen
//! if two cells ended up with the same identity.

use crate::types::SlotId;
use thiserror::Error;

/// All flowcell errors
#[derive(Debug, Error)]
pub enum Error {
    /// The slot holds a value of another type
    #[error("slot {slot} holds a value of type {found}, expected {expected}")]
    TypeMismatch {
        /// Slot that was read
        slot: SlotId,
        /// Type the cell stores
        expected: &'static str,
        /// Type actually found in the slot
        found: &'static str,
    },
}

/// Result type alias for flowcell operations
pub type Result<T> = std::result::Result<T, Error>;
