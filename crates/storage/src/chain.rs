//! Explicit chain handles
//!
//! [`Chain`] is the injectable form of ambient storage: instead of resolving
//! "the current chain" through a thread-local, the caller holds the chain
//! and passes it to the cell. This makes fork/inherit/isolate behaviour
//! testable step by step, with no threads or executors involved.
//!
//! Two chains created with [`Chain::root`] never share entries; that is the
//! model for an isolation boundary such as a separate process or sandbox.

use crate::current::{CurrentChain, SharedView};
use crate::view::ChainView;
use flowcell_core::{AmbientStorage, ChainId, Slot, SlotId};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;

/// An explicitly owned logical chain
///
/// # Thread Safety
///
/// The view sits behind a mutex so a `Chain` can be shared, but a chain is
/// meant to have one logical owner at a time. Concurrent writers on the same
/// chain are serialised, not ordered. [`Chain::run`] installs this same view,
/// so writers inside the call and writers through the handle are serialised
/// against each other too.
#[derive(Debug)]
pub struct Chain {
    view: SharedView,
}

impl Chain {
    /// Create an isolated root chain
    pub fn root() -> Self {
        Self::from_view(ChainView::root())
    }

    /// Wrap an existing view
    pub fn from_view(view: ChainView) -> Self {
        Self {
            view: Arc::new(Mutex::new(view)),
        }
    }

    /// Adopt a snapshot of the calling thread's current chain
    pub fn capture() -> Self {
        Self::from_view(CurrentChain::view())
    }

    /// Start a child chain inheriting this chain's entries as of now
    pub fn fork(&self) -> Chain {
        let child = self.view.lock().fork();
        debug!(chain = %child.id(), parent = ?child.parent(), "forked explicit chain");
        Self::from_view(child)
    }

    /// Id of this chain
    pub fn id(&self) -> ChainId {
        self.view.lock().id()
    }

    /// Copy of this chain's view as a child chain
    pub fn snapshot(&self) -> ChainView {
        self.view.lock().fork()
    }

    /// Number of entries held by this chain
    pub fn len(&self) -> usize {
        self.view.lock().len()
    }

    /// True if this chain holds no entries
    pub fn is_empty(&self) -> bool {
        self.view.lock().is_empty()
    }

    /// Run `f` with this chain installed as the thread's current chain
    ///
    /// The chain itself is installed, not a copy of it: inside `f`,
    /// [`CurrentChain`] and this handle read and write the same entries.
    /// Nested calls on the same chain are allowed. Writes made before a
    /// panic in `f` are kept.
    pub fn run<R>(&self, f: impl FnOnce() -> R) -> R {
        let _guard = CurrentChain::enter_shared(Arc::clone(&self.view));
        f()
    }
}

impl Default for Chain {
    fn default() -> Self {
        Self::root()
    }
}

impl AmbientStorage for Chain {
    fn chain_id(&self) -> ChainId {
        self.id()
    }

    fn get(&self, slot: SlotId) -> Option<Slot> {
        self.view.lock().get(slot).cloned()
    }

    fn set(&self, slot: SlotId, value: Slot) {
        let _replaced = self.view.lock().insert(slot, value);
    }

    fn remove(&self, slot: SlotId) {
        let _removed = self.view.lock().remove(slot);
    }

    fn contains(&self, slot: SlotId) -> bool {
        self.view.lock().contains(slot)
    }
}
