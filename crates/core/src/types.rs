//! Identity types
//!
//! - [`SlotId`]: key of one async-local variable in ambient storage
//! - [`ChainId`]: label of one logical call chain, used for tracing

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Unique identifier for an async-local slot
///
/// Every cell owns exactly one SlotId for its whole lifetime. It is the key
/// into ambient storage, so two cells must never share one: a collision would
/// let unrelated cells read each other's wrappers. UUID v4 keeps the
/// probability of that negligible, and ids are never recycled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotId(Uuid);

impl SlotId {
    /// Create a new random SlotId using UUID v4
    ///
    /// # Examples
    ///
    /// ```
    /// use flowcell_core::SlotId;
    ///
    /// let a = SlotId::new();
    /// let b = SlotId::new();
    /// assert_ne!(a, b);
    /// ```
    pub fn new() -> Self {
        SlotId(Uuid::new_v4())
    }

    /// Create SlotId from raw bytes
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        SlotId(Uuid::from_bytes(bytes))
    }

    /// Get raw bytes representation
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }
}

impl Default for SlotId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SlotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

static NEXT_CHAIN: AtomicU64 = AtomicU64::new(1);

/// Identifier of a logical call chain
///
/// Chain ids only label chains in logs; storage is never keyed by them.
/// They are allocated from a process-wide counter and are monotonically
/// increasing, so a child always carries a larger id than its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChainId(u64);

impl ChainId {
    /// Allocate the next chain id
    pub fn next() -> Self {
        ChainId(NEXT_CHAIN.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ChainId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "chain-{}", self.0)
    }
}
