//! Chain Semantics Test Suite
//!
//! End-to-end checks of the fork/inherit/isolate behaviour through the
//! public `flowcell` facade.
//!
//! ## Key Verification Points
//!
//! 1. Set / created / clear state of a cell in one chain
//! 2. Values written before a fork are inherited, later writes are not
//! 3. The snapshot is taken when the child is created, not when it reads
//! 4. Isolated roots never share values
//! 5. Random fork/write/clear programs agree with a per-chain model
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test chain_semantics
//! cargo test --test chain_semantics async_flow::
//! ```

use std::sync::Once;

pub mod cell_state;
pub mod inheritance;
pub mod isolation;
pub mod platform;

// =============================================================================
// SHARED TEST UTILITIES
// =============================================================================

static TRACING: Once = Once::new();

/// Install a test-writer subscriber once per test binary
///
/// Everything down to TRACE goes to the captured test output.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_test_writer()
            .try_init();
    });
}
