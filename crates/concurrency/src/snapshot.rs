//! Synchronous forks
//!
//! ```text
//! parent:  set(13) ──capture──┬── set(17) ── get() == 17
//!                             │
//! child:                      └── get() == 13 ── set(21) (never seen by parent)
//! ```

use flowcell_core::ChainId;
use flowcell_storage::{Chain, ChainView, CurrentChain};
use std::thread::{self, JoinHandle};
use tracing::debug;

/// A frozen copy of a chain, ready to start children from
///
/// Capturing is O(1). Each [`ChainSnapshot::run`] starts a new child chain,
/// so running the same snapshot twice gives two independent siblings.
#[derive(Debug, Clone)]
pub struct ChainSnapshot {
    view: ChainView,
}

impl ChainSnapshot {
    /// Snapshot the calling thread's current chain
    pub fn capture() -> Self {
        Self {
            view: CurrentChain::view(),
        }
    }

    /// A snapshot of nothing: children start as isolated roots
    pub fn empty() -> Self {
        Self {
            view: ChainView::root(),
        }
    }

    /// Snapshot an explicit chain
    pub fn of(chain: &Chain) -> Self {
        Self {
            view: chain.snapshot(),
        }
    }

    /// Id of the captured view
    pub fn chain_id(&self) -> ChainId {
        self.view.id()
    }

    /// A fresh child view of the snapshot
    pub fn child(&self) -> ChainView {
        self.view.fork()
    }

    /// Run `f` in a new child chain of this snapshot
    ///
    /// The caller's chain is restored when `f` returns or unwinds, and
    /// nothing `f` writes is visible afterwards.
    pub fn run<R>(&self, f: impl FnOnce() -> R) -> R {
        let child = self.child();
        debug!(chain = %child.id(), parent = ?child.parent(), "running in forked chain");
        let _guard = CurrentChain::enter(child);
        f()
    }
}

/// Run `f` as a nested call that inherits but never leaks writes back
pub fn fork<R>(f: impl FnOnce() -> R) -> R {
    ChainSnapshot::capture().run(f)
}

/// Run `f` in a brand-new root chain that shares nothing with the caller
pub fn isolate<R>(f: impl FnOnce() -> R) -> R {
    ChainSnapshot::empty().run(f)
}

/// Spawn an OS thread that starts in a child of the calling chain
pub fn spawn_thread<F, T>(f: F) -> JoinHandle<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let snapshot = ChainSnapshot::capture();
    thread::spawn(move || snapshot.run(f))
}
