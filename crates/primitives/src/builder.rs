//! Cell construction and configuration
//!
//! # Example
//!
//! ```
//! use flowcell_primitives::AsyncLocal;
//!
//! let request_id = AsyncLocal::builder()
//!     .name("request-id")
//!     .default_value(0u64);
//!
//! assert_eq!(request_id.name(), Some("request-id"));
//! assert_eq!(request_id.get(), 0);
//! ```

use crate::async_local::AsyncLocal;
use std::marker::PhantomData;

/// Per-cell settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellConfig {
    /// Label used in tracing output and `Debug`
    pub name: Option<String>,
    /// Free the slot in the dropping thread's chain when the cell is dropped
    pub release_on_drop: bool,
}

impl Default for CellConfig {
    fn default() -> Self {
        Self {
            name: None,
            release_on_drop: true,
        }
    }
}

/// Builder for [`AsyncLocal`]
///
/// Settings first, then one of [`build`](Self::build),
/// [`default_value`](Self::default_value) or [`factory`](Self::factory) to
/// pick how the default is produced.
pub struct AsyncLocalBuilder<T> {
    config: CellConfig,
    _value: PhantomData<fn() -> T>,
}

impl<T> AsyncLocalBuilder<T> {
    /// Create a builder with default settings
    pub fn new() -> Self {
        Self {
            config: CellConfig::default(),
            _value: PhantomData,
        }
    }

    /// Name the cell
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = Some(name.into());
        self
    }

    /// Whether dropping the cell frees its slot in the current chain
    ///
    /// Turn this off for cells only ever used with explicit chains, where
    /// the thread's chain has nothing to free.
    pub fn release_on_drop(mut self, release: bool) -> Self {
        self.config.release_on_drop = release;
        self
    }

    /// Replace all settings at once
    pub fn config(mut self, config: CellConfig) -> Self {
        self.config = config;
        self
    }
}

impl<T: Clone + Send + Sync + 'static> AsyncLocalBuilder<T> {
    /// Build a cell whose default is `T::default()`
    pub fn build(self) -> AsyncLocal<T>
    where
        T: Default,
    {
        self.factory(T::default)
    }

    /// Build a cell whose default is a fixed value
    pub fn default_value(self, value: T) -> AsyncLocal<T> {
        self.factory(move || value.clone())
    }

    /// Build a cell whose default comes from `factory`
    pub fn factory(self, factory: impl Fn() -> T + Send + Sync + 'static) -> AsyncLocal<T> {
        AsyncLocal::from_parts(self.config, Box::new(factory))
    }
}

impl<T> Default for AsyncLocalBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for AsyncLocalBuilder<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncLocalBuilder")
            .field("config", &self.config)
            .finish()
    }
}
