//! The chain installed on the running thread
//!
//! Each OS thread carries at most one current [`ChainView`]. Code that never
//! entered a chain runs in a lazily created root chain of its own, so a raw
//! `std::thread::spawn` starts empty: inheritance is opt-in through the
//! propagation layer, which calls [`CurrentChain::enter`].
//!
//! A [`Chain`](crate::Chain) handle is installed by reference rather than by
//! copy: while it runs, the handle and the thread read and write one view.
//!
//! # Reentrancy
//!
//! The thread-local is only borrowed for map operations. Replaced or removed
//! wrappers are handed back out of the borrow before they are dropped, so a
//! value whose `Drop` touches another cell cannot trip the `RefCell`. A
//! shared view's lock is held for the same span and no longer.

use crate::view::ChainView;
use flowcell_core::{AmbientStorage, ChainId, Slot, SlotId};
use parking_lot::Mutex;
use std::cell::RefCell;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::trace;

/// View owned by a [`Chain`](crate::Chain) handle and installed by reference
pub(crate) type SharedView = Arc<Mutex<ChainView>>;

/// What a thread has installed as its current chain
enum Installed {
    /// A view the thread owns outright (forks, snapshots, flows)
    Owned(ChainView),
    /// The view behind a [`Chain`](crate::Chain) handle, shared with it
    Shared(SharedView),
}

impl Installed {
    fn with_view<R>(&mut self, f: impl FnOnce(&mut ChainView) -> R) -> R {
        match self {
            Installed::Owned(view) => f(view),
            Installed::Shared(shared) => {
                let mut view = shared.lock();
                f(&mut view)
            }
        }
    }

    fn id(&self) -> ChainId {
        match self {
            Installed::Owned(view) => view.id(),
            Installed::Shared(shared) => shared.lock().id(),
        }
    }

    fn into_view(self) -> ChainView {
        match self {
            Installed::Owned(view) => view,
            Installed::Shared(shared) => {
                let view = shared.lock().clone();
                view
            }
        }
    }
}

thread_local! {
    static CURRENT: RefCell<Option<Installed>> = const { RefCell::new(None) };
}

/// Ambient storage bound to whatever chain the calling thread is running
///
/// Zero-sized; every call resolves the chain at that instant.
#[derive(Debug, Clone, Copy, Default)]
pub struct CurrentChain;

impl CurrentChain {
    fn with<R>(f: impl FnOnce(&mut ChainView) -> R) -> R {
        CURRENT.with(|slot| {
            let mut slot = slot.borrow_mut();
            let installed = slot.get_or_insert_with(|| Installed::Owned(ChainView::root()));
            installed.with_view(f)
        })
    }

    /// Id of the running chain
    pub fn id() -> ChainId {
        Self::with(|view| view.id())
    }

    /// Snapshot of the running chain, as a fresh child view
    pub fn view() -> ChainView {
        Self::with(|view| view.fork())
    }

    /// Install `view` as this thread's chain until the guard goes away
    pub fn enter(view: ChainView) -> EnterGuard {
        trace!(chain = %view.id(), parent = ?view.parent(), "entering chain");
        Self::install(Installed::Owned(view))
    }

    /// Install a chain handle's own view, so both sides see the same entries
    pub(crate) fn enter_shared(shared: SharedView) -> EnterGuard {
        let installed = Installed::Shared(shared);
        trace!(chain = %installed.id(), "entering shared chain");
        Self::install(installed)
    }

    fn install(installed: Installed) -> EnterGuard {
        let entered = installed.id();
        let prev = CURRENT.with(|slot| slot.borrow_mut().replace(installed));
        EnterGuard {
            prev,
            entered,
            active: true,
            _not_send: PhantomData,
        }
    }
}

impl AmbientStorage for CurrentChain {
    fn chain_id(&self) -> ChainId {
        Self::id()
    }

    fn get(&self, slot: SlotId) -> Option<Slot> {
        Self::with(|view| view.get(slot).cloned())
    }

    fn set(&self, slot: SlotId, value: Slot) {
        let _replaced = Self::with(|view| view.insert(slot, value));
    }

    fn remove(&self, slot: SlotId) {
        // Cells may be dropped while thread-locals are being destroyed.
        let _removed = CURRENT.try_with(|current| {
            current
                .borrow_mut()
                .as_mut()
                .and_then(|installed| installed.with_view(|view| view.remove(slot)))
        });
    }

    fn contains(&self, slot: SlotId) -> bool {
        Self::with(|view| view.contains(slot))
    }
}

/// Restores the previously installed chain on drop
///
/// Guards nest: they must be released in the reverse order they were
/// created. Debug builds panic when a guard is released while some other
/// chain is installed.
///
/// Not `Send`: the guard must be dropped on the thread that entered.
#[must_use = "the chain is left as soon as the guard is dropped"]
pub struct EnterGuard {
    prev: Option<Installed>,
    entered: ChainId,
    active: bool,
    _not_send: PhantomData<*const ()>,
}

impl EnterGuard {
    /// Leave the chain and return its view, including writes made inside
    pub fn exit(mut self) -> ChainView {
        self.active = false;
        let view = self
            .restore()
            .map(Installed::into_view)
            .unwrap_or_default();
        trace!(chain = %view.id(), "left chain");
        view
    }

    fn restore(&mut self) -> Option<Installed> {
        let prev = self.prev.take();
        let entered = self.entered;
        CURRENT
            .try_with(|slot| {
                let mut slot = slot.borrow_mut();
                if !std::thread::panicking() {
                    debug_assert_eq!(
                        slot.as_ref().map(Installed::id),
                        Some(entered),
                        "chain guards released out of order"
                    );
                }
                std::mem::replace(&mut *slot, prev)
            })
            .ok()
            .flatten()
    }
}

impl Drop for EnterGuard {
    fn drop(&mut self) {
        if !self.active {
            return;
        }
        let _left = self.restore();
    }
}

impl std::fmt::Debug for EnterGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnterGuard")
            .field("prev", &self.prev.as_ref().map(Installed::id))
            .field("entered", &self.entered)
            .field("active", &self.active)
            .finish()
    }
}
