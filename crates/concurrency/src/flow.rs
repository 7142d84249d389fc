//! Futures that carry their own chain
//!
//! A [`Flow`] owns a [`ChainView`] captured when the wrapper is built. Around
//! every `poll` the view is installed as the polling thread's current chain
//! and taken back afterwards, so:
//!
//! - the future sees its parent's values as of creation, even if it first
//!   reads them much later
//! - writes made in one poll are visible in the next poll of the same
//!   future, whichever worker thread runs it
//! - nothing the future writes reaches the code that awaits or spawned it
//!
//! An unwrapped `async` block awaited inline behaves like a plain nested
//! call: it runs in the awaiting chain and its writes are visible there.

use crate::snapshot::ChainSnapshot;
use flowcell_core::ChainId;
use flowcell_storage::{ChainView, CurrentChain};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

/// A future running in its own logical chain
#[must_use = "futures do nothing unless polled"]
pub struct Flow<F> {
    inner: Pin<Box<F>>,
    view: Option<ChainView>,
}

impl<F: Future> Flow<F> {
    /// Wrap `future` in a child of the calling thread's current chain
    pub fn new(future: F) -> Self {
        Self::with_view(future, CurrentChain::view())
    }

    /// Wrap `future` in a child of `snapshot`
    pub fn with_snapshot(future: F, snapshot: &ChainSnapshot) -> Self {
        Self::with_view(future, snapshot.child())
    }

    fn with_view(future: F, view: ChainView) -> Self {
        Self {
            inner: Box::pin(future),
            view: Some(view),
        }
    }

    /// Id of the chain the future runs in
    ///
    /// `None` only after the inner future panicked mid-poll.
    pub fn chain_id(&self) -> Option<ChainId> {
        self.view.as_ref().map(ChainView::id)
    }
}

impl<F: Future> Future for Flow<F> {
    type Output = F::Output;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = &mut *self;
        let view = this.view.take().unwrap_or_default();
        let guard = CurrentChain::enter(view);
        let poll = this.inner.as_mut().poll(cx);
        this.view = Some(guard.exit());
        poll
    }
}

impl<F> std::fmt::Debug for Flow<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Flow")
            .field("chain", &self.view.as_ref().map(ChainView::id))
            .finish_non_exhaustive()
    }
}

/// Extension methods to run any future in a forked chain
pub trait FlowExt: Future + Sized {
    /// Fork the current chain now and run `self` in the child
    fn flow(self) -> Flow<Self> {
        Flow::new(self)
    }

    /// Run `self` in a child of `snapshot`
    fn flow_from(self, snapshot: &ChainSnapshot) -> Flow<Self> {
        Flow::with_snapshot(self, snapshot)
    }
}

impl<F: Future> FlowExt for F {}

/// Fork the current chain now and run `future` in the child
pub fn flow<F: Future>(future: F) -> Flow<F> {
    Flow::new(future)
}
