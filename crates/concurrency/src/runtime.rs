//! Tokio entry points
//!
//! Thin wrappers around `tokio::spawn` and `tokio::task::spawn_blocking`
//! that fork the calling chain at spawn time. Tasks spawned with plain tokio
//! functions start in the worker thread's chain instead, which is not the
//! spawner's.

use crate::flow::Flow;
use crate::snapshot::ChainSnapshot;
use std::future::Future;
use tokio::task::JoinHandle;
use tracing::debug;

/// Spawn a task that runs in a child of the calling chain
///
/// Must be called from within a tokio runtime.
pub fn spawn<F>(future: F) -> JoinHandle<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    let flow = Flow::new(future);
    debug!(chain = ?flow.chain_id(), "spawning task in forked chain");
    tokio::spawn(flow)
}

/// Run a blocking closure on tokio's blocking pool in a child of the calling chain
pub fn spawn_blocking<F, R>(f: F) -> JoinHandle<R>
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    let snapshot = ChainSnapshot::capture();
    debug!(parent = %snapshot.chain_id(), "spawning blocking work in forked chain");
    tokio::task::spawn_blocking(move || snapshot.run(f))
}
