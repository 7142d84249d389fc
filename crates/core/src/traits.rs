//! The ambient storage contract
//!
//! A cell never propagates anything itself. It reads and writes through an
//! [`AmbientStorage`], which is expected to honour the propagation law:
//!
//! - every operation addresses the view of one logical chain
//! - a chain created from another starts with a snapshot of its parent's
//!   view taken at creation time
//! - writes on either side after that instant are invisible to the other
//! - isolated roots never share entries
//!
//! Methods take `&self` because the "current chain" is ambient: the handle
//! itself is a capability, the state lives with the chain.

use crate::slot::Slot;
use crate::types::{ChainId, SlotId};
use std::sync::Arc;

/// Chain-scoped key/value storage supplied by the host environment
pub trait AmbientStorage {
    /// Id of the chain this handle currently addresses
    fn chain_id(&self) -> ChainId;

    /// Entry for `slot` in the current chain's view
    ///
    /// `None` if neither this chain nor any ancestor it forked from wrote it.
    fn get(&self, slot: SlotId) -> Option<Slot>;

    /// Store `value` for `slot` in the current chain's view only
    fn set(&self, slot: SlotId, value: Slot);

    /// Remove `slot` from the current chain's view only
    fn remove(&self, slot: SlotId);

    /// True if the current chain has an entry for `slot`
    fn contains(&self, slot: SlotId) -> bool {
        self.get(slot).is_some()
    }

    /// Release `slot` when its owner is torn down
    ///
    /// Chain-local like every other operation: chains that already forked
    /// keep their copy until they are dropped.
    fn free(&self, slot: SlotId) {
        self.remove(slot);
    }
}

impl<S: AmbientStorage + ?Sized> AmbientStorage for &S {
    fn chain_id(&self) -> ChainId {
        (**self).chain_id()
    }

    fn get(&self, slot: SlotId) -> Option<Slot> {
        (**self).get(slot)
    }

    fn set(&self, slot: SlotId, value: Slot) {
        (**self).set(slot, value)
    }

    fn remove(&self, slot: SlotId) {
        (**self).remove(slot)
    }

    fn contains(&self, slot: SlotId) -> bool {
        (**self).contains(slot)
    }

    fn free(&self, slot: SlotId) {
        (**self).free(slot)
    }
}

impl<S: AmbientStorage + ?Sized> AmbientStorage for Arc<S> {
    fn chain_id(&self) -> ChainId {
        (**self).chain_id()
    }

    fn get(&self, slot: SlotId) -> Option<Slot> {
        (**self).get(slot)
    }

    fn set(&self, slot: SlotId, value: Slot) {
        (**self).set(slot, value)
    }

    fn remove(&self, slot: SlotId) {
        (**self).remove(slot)
    }

    fn contains(&self, slot: SlotId) -> bool {
        (**self).contains(slot)
    }

    fn free(&self, slot: SlotId) {
        (**self).free(slot)
    }
}
