//! Copy-on-write view of one chain's slots
//!
//! # Design
//!
//! - `Arc<FxHashMap>`: forks share the map until one side writes
//! - `Arc::make_mut` on write: the writer gets a private copy, the other
//!   side keeps the old map untouched
//! - Removing an absent slot never copies
//!
//! The map is small (one entry per live cell), so a copy on the first write
//! after a fork is cheaper than any persistent structure would be on reads.

use flowcell_core::{ChainId, Slot, SlotId};
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Snapshot-able view of one logical chain
///
/// `Clone` keeps the chain id (same chain, shared entries). Use
/// [`ChainView::fork`] to start a child chain.
#[derive(Debug, Clone)]
pub struct ChainView {
    id: ChainId,
    parent: Option<ChainId>,
    entries: Arc<FxHashMap<SlotId, Slot>>,
}

impl ChainView {
    /// Create an empty root chain
    pub fn root() -> Self {
        Self {
            id: ChainId::next(),
            parent: None,
            entries: Arc::new(FxHashMap::default()),
        }
    }

    /// Start a child chain whose view equals this one right now
    pub fn fork(&self) -> Self {
        Self {
            id: ChainId::next(),
            parent: Some(self.id),
            entries: Arc::clone(&self.entries),
        }
    }

    /// Id of this chain
    pub fn id(&self) -> ChainId {
        self.id
    }

    /// Id of the chain this one forked from, if any
    pub fn parent(&self) -> Option<ChainId> {
        self.parent
    }

    /// Entry for `slot`
    pub fn get(&self, slot: SlotId) -> Option<&Slot> {
        self.entries.get(&slot)
    }

    /// True if this chain has an entry for `slot`
    pub fn contains(&self, slot: SlotId) -> bool {
        self.entries.contains_key(&slot)
    }

    /// Store an entry, returning the one it replaced
    pub fn insert(&mut self, slot: SlotId, value: Slot) -> Option<Slot> {
        Arc::make_mut(&mut self.entries).insert(slot, value)
    }

    /// Remove an entry, returning it
    pub fn remove(&mut self, slot: SlotId) -> Option<Slot> {
        if !self.entries.contains_key(&slot) {
            return None;
        }
        Arc::make_mut(&mut self.entries).remove(&slot)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the chain holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True if both views still share one map (no write since the fork)
    pub fn shares_entries_with(&self, other: &ChainView) -> bool {
        Arc::ptr_eq(&self.entries, &other.entries)
    }
}

impl Default for ChainView {
    fn default() -> Self {
        Self::root()
    }
}
