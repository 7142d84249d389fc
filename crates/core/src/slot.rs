//! The wrapper stored in ambient storage
//!
//! A [`Slot`] boxes exactly one value. Storing the wrapper instead of the raw
//! value lets storage tell "never set" (no entry) apart from "set to the
//! type's zero value" (an entry holding `0`, `None`, `""`, ...).
//!
//! ## Origin tag
//!
//! Each slot also records how it came to exist:
//! - [`Origin::Default`]: materialised by the cell's factory on first read
//! - [`Origin::Explicit`]: written by a caller
//!
//! The tag is what lets a cell cache its default per chain while still
//! reporting "no value set".
//!
//! ## Sharing
//!
//! Cloning a slot clones an `Arc`, never the value. After a fork, parent and
//! child chains may point at the very same value, which is why stored values
//! must be treated as immutable.

use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// How a slot's value came to exist in a chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Origin {
    /// Produced lazily by the cell's default factory
    Default,
    /// Written explicitly by a caller
    Explicit,
}

/// Type-erased, immutable box around one value
#[derive(Clone)]
pub struct Slot {
    value: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
    origin: Origin,
}

impl Slot {
    /// Wrap a value with the given origin
    pub fn new<T: Send + Sync + 'static>(value: T, origin: Origin) -> Self {
        Self {
            value: Arc::new(value),
            type_name: std::any::type_name::<T>(),
            origin,
        }
    }

    /// Wrap a value written by a caller
    pub fn explicit<T: Send + Sync + 'static>(value: T) -> Self {
        Self::new(value, Origin::Explicit)
    }

    /// Wrap a value produced by a default factory
    pub fn materialized<T: Send + Sync + 'static>(value: T) -> Self {
        Self::new(value, Origin::Default)
    }

    /// How this value came to exist
    pub fn origin(&self) -> Origin {
        self.origin
    }

    /// True if the value was written explicitly
    pub fn is_explicit(&self) -> bool {
        self.origin == Origin::Explicit
    }

    /// Name of the wrapped type, for diagnostics
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Borrow the wrapped value if it is a `T`
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// True if both slots share the same allocation
    pub fn ptr_eq(&self, other: &Slot) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }
}

impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slot")
            .field("type", &self.type_name)
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}
