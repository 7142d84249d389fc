//! Convenient imports for Flowcell.
//!
//! ```
//! use flowcell::prelude::*;
//!
//! let local = AsyncLocal::with_default(13);
//! fork(|| local.set(17));
//! assert_eq!(local.get(), 13);
//! ```

// Cells
pub use crate::{async_local, AsyncLocal, CellConfig};

// Error handling
pub use crate::{Error, Result};

// Chains
pub use crate::{AmbientStorage, Chain, ChainSnapshot, CurrentChain};

// Forking
pub use crate::{flow, fork, isolate, spawn, spawn_blocking, spawn_thread, FlowExt};
