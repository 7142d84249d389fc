//! AsyncLocal primitive implementation
//!
//! Data that is local to a logical call chain: the async analogue of a
//! thread-local. A chain forked from the current one (a nested `fork`, a
//! spawned thread or task, a `Flow` future) inherits the value as of the
//! fork; whatever either side writes afterwards stays on that side.
//!
//! ## Design
//!
//! AsyncLocal is a stateless facade over ambient storage. It owns:
//! - a process-unique [`SlotId`], the key into every chain's view
//! - a default factory, evaluated lazily on the first read in a chain that
//!   has no value
//! - its [`CellConfig`]
//!
//! The value lives in the chains, never in the cell.
//!
//! ## Progressive Disclosure
//!
//! 1. **Simple** - current chain: `cell.set(13)`, `cell.get()`
//! 2. **Explicit chain** - any [`AmbientStorage`]: `cell.set_in(&chain, 13)`
//!
//! ## Immutability Requirement
//!
//! Forks share values by reference. `T` must be treated as immutable once
//! stored; use interior mutability only for data that is meant to be shared
//! across chains.
//!
//! ## Set vs Created
//!
//! Reading an unset cell materialises the default in the current chain, so
//! the factory runs at most once per chain. The stored wrapper is tagged as a
//! default: [`AsyncLocal::is_created`] turns true, [`AsyncLocal::is_set`]
//! stays false until a caller writes.

use crate::builder::{AsyncLocalBuilder, CellConfig};
use flowcell_core::{AmbientStorage, Error, Result, Slot, SlotId};
use flowcell_storage::CurrentChain;
use std::fmt;
use tracing::{error, trace};

type Factory<T> = Box<dyn Fn() -> T + Send + Sync>;

/// A variable scoped to the logical call chain
///
/// # Example
///
/// ```
/// use flowcell_primitives::AsyncLocal;
/// use flowcell_concurrency::fork;
///
/// let local = AsyncLocal::<i32>::new();
/// local.set(13);
///
/// fork(|| {
///     assert_eq!(local.get(), 13);
///     local.set(17);
/// });
///
/// assert_eq!(local.get(), 13);
/// ```
pub struct AsyncLocal<T> {
    id: SlotId,
    factory: Factory<T>,
    config: CellConfig,
}

impl<T: Clone + Default + Send + Sync + 'static> AsyncLocal<T> {
    /// Create a cell whose default is `T::default()`
    pub fn new() -> Self {
        Self::builder().build()
    }
}

impl<T: Clone + Default + Send + Sync + 'static> Default for AsyncLocal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + Sync + 'static> AsyncLocal<T> {
    /// Create a cell whose default is `value`
    pub fn with_default(value: T) -> Self {
        Self::builder().default_value(value)
    }

    /// Create a cell whose default comes from `factory`
    ///
    /// The factory runs lazily, at most once per chain that reads the cell
    /// without having a value. It must not read the same cell.
    pub fn with_factory(factory: impl Fn() -> T + Send + Sync + 'static) -> Self {
        Self::builder().factory(factory)
    }

    /// Configure a cell step by step
    pub fn builder() -> AsyncLocalBuilder<T> {
        AsyncLocalBuilder::new()
    }

    pub(crate) fn from_parts(config: CellConfig, factory: Factory<T>) -> Self {
        let cell = Self {
            id: SlotId::new(),
            factory,
            config,
        };
        trace!(cell = cell.label(), slot = %cell.id, "created async-local");
        cell
    }

    /// Identity of this cell in ambient storage
    pub fn id(&self) -> SlotId {
        self.id
    }

    /// Name given at construction, if any
    pub fn name(&self) -> Option<&str> {
        self.config.name.as_deref()
    }

    /// Settings of this cell
    pub fn config(&self) -> &CellConfig {
        &self.config
    }

    // ========================================================================
    // Current chain
    // ========================================================================

    /// Value in the current chain, materialising the default if needed
    ///
    /// # Panics
    ///
    /// Panics if the slot holds a value of another type, which means two
    /// cells share an identity.
    pub fn get(&self) -> T {
        self.get_in(&CurrentChain)
    }

    /// Like [`get`](Self::get), reporting a foreign slot as an error
    pub fn try_get(&self) -> Result<T> {
        self.try_get_in(&CurrentChain)
    }

    /// Borrow the value in the current chain without cloning it
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.with_in(&CurrentChain, f)
    }

    /// Set the value for the current chain
    pub fn set(&self, value: T) {
        self.set_in(&CurrentChain, value)
    }

    /// Set the value for the current chain, returning the one it replaced
    ///
    /// Never runs the factory: `None` means the chain had no entry.
    pub fn replace(&self, value: T) -> Option<T> {
        self.replace_in(&CurrentChain, value)
    }

    /// True if the current chain holds an explicitly written value
    pub fn is_set(&self) -> bool {
        self.is_set_in(&CurrentChain)
    }

    /// True if the current chain holds any value, including a materialised default
    pub fn is_created(&self) -> bool {
        self.is_created_in(&CurrentChain)
    }

    /// Forget the current chain's value; the next read runs the factory again
    pub fn clear(&self) {
        self.clear_in(&CurrentChain)
    }

    /// Release this cell's slot in the current chain and drop the cell
    ///
    /// Chains that already forked keep their copy until they end. Since the
    /// slot id is never reused and the cell is gone, nothing can address
    /// those copies any more.
    pub fn dispose(self) {
        self.dispose_in(&CurrentChain)
    }

    // ========================================================================
    // Explicit chain
    // ========================================================================

    /// Value in `storage`'s chain, materialising the default if needed
    ///
    /// # Panics
    ///
    /// Panics if the slot holds a value of another type.
    pub fn get_in<S: AmbientStorage + ?Sized>(&self, storage: &S) -> T {
        self.with_in(storage, T::clone)
    }

    /// Like [`get_in`](Self::get_in), reporting a foreign slot as an error
    pub fn try_get_in<S: AmbientStorage + ?Sized>(&self, storage: &S) -> Result<T> {
        self.try_with_in(storage, T::clone)
    }

    /// Borrow the value in `storage`'s chain without cloning it
    ///
    /// # Panics
    ///
    /// Panics if the slot holds a value of another type.
    pub fn with_in<S, R>(&self, storage: &S, f: impl FnOnce(&T) -> R) -> R
    where
        S: AmbientStorage + ?Sized,
    {
        match self.try_with_in(storage, f) {
            Ok(out) => out,
            Err(e) => self.fail(e),
        }
    }

    /// Borrow the value in `storage`'s chain, reporting a foreign slot as an error
    pub fn try_with_in<S, R>(&self, storage: &S, f: impl FnOnce(&T) -> R) -> Result<R>
    where
        S: AmbientStorage + ?Sized,
    {
        let slot = match storage.get(self.id) {
            Some(slot) => slot,
            None => self.materialize(storage),
        };
        match slot.downcast_ref::<T>() {
            Some(value) => Ok(f(value)),
            None => Err(self.mismatch(&slot)),
        }
    }

    /// Set the value for `storage`'s chain
    pub fn set_in<S: AmbientStorage + ?Sized>(&self, storage: &S, value: T) {
        trace!(cell = self.label(), slot = %self.id, chain = %storage.chain_id(), "set");
        storage.set(self.id, Slot::explicit(value));
    }

    /// Set the value for `storage`'s chain, returning the one it replaced
    ///
    /// # Panics
    ///
    /// Panics if the slot holds a value of another type.
    pub fn replace_in<S: AmbientStorage + ?Sized>(&self, storage: &S, value: T) -> Option<T> {
        let previous = match storage.get(self.id) {
            Some(slot) => match slot.downcast_ref::<T>() {
                Some(previous) => Some(previous.clone()),
                None => self.fail(self.mismatch(&slot)),
            },
            None => None,
        };
        self.set_in(storage, value);
        previous
    }

    /// True if `storage`'s chain holds an explicitly written value
    pub fn is_set_in<S: AmbientStorage + ?Sized>(&self, storage: &S) -> bool {
        storage
            .get(self.id)
            .map(|slot| slot.is_explicit())
            .unwrap_or(false)
    }

    /// True if `storage`'s chain holds any value, including a materialised default
    pub fn is_created_in<S: AmbientStorage + ?Sized>(&self, storage: &S) -> bool {
        storage.contains(self.id)
    }

    /// Forget `storage`'s chain value
    pub fn clear_in<S: AmbientStorage + ?Sized>(&self, storage: &S) {
        trace!(cell = self.label(), slot = %self.id, chain = %storage.chain_id(), "cleared");
        storage.remove(self.id);
    }

    /// Release this cell's slot in `storage`'s chain and drop the cell
    ///
    /// The drop that follows does not touch the thread's current chain.
    pub fn dispose_in<S: AmbientStorage + ?Sized>(mut self, storage: &S) {
        trace!(cell = self.label(), slot = %self.id, chain = %storage.chain_id(), "disposed");
        storage.free(self.id);
        self.config.release_on_drop = false;
    }

    fn materialize<S: AmbientStorage + ?Sized>(&self, storage: &S) -> Slot {
        let slot = Slot::materialized((self.factory)());
        trace!(cell = self.label(), slot = %self.id, chain = %storage.chain_id(), "materialized default");
        storage.set(self.id, slot.clone());
        slot
    }

    fn mismatch(&self, slot: &Slot) -> Error {
        Error::TypeMismatch {
            slot: self.id,
            expected: std::any::type_name::<T>(),
            found: slot.type_name(),
        }
    }
}

impl<T> AsyncLocal<T> {
    fn label(&self) -> &str {
        self.config.name.as_deref().unwrap_or("<unnamed>")
    }

    fn fail(&self, err: Error) -> ! {
        error!(cell = self.label(), slot = %self.id, error = %err, "async-local slot corrupted");
        panic!("{}", err)
    }
}

impl<T> Drop for AsyncLocal<T> {
    fn drop(&mut self) {
        if self.config.release_on_drop {
            CurrentChain.free(self.id);
        }
    }
}

impl<T> fmt::Debug for AsyncLocal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncLocal")
            .field("id", &self.id)
            .field("name", &self.config.name)
            .finish_non_exhaustive()
    }
}
