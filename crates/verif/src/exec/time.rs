//! Timed delays and bounded waits in simulated time.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use thiserror::Error;

use crate::exec::scheduler::SimCtx;

/// Completes at an absolute simulated deadline. Created by
/// [`SimCtx::delay`].
pub struct Delay {
    ctx: SimCtx,
    deadline: u64,
    registered: bool,
}

impl Delay {
    pub(crate) fn new(ctx: SimCtx, deadline: u64) -> Self {
        Self {
            ctx,
            deadline,
            registered: false,
        }
    }

    /// The absolute simulated deadline this delay completes at.
    pub fn deadline(&self) -> u64 {
        self.deadline
    }
}

impl Future for Delay {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let this = self.get_mut();
        if this.ctx.now() >= this.deadline {
            return Poll::Ready(());
        }
        if !this.registered {
            this.ctx.register_timer(this.deadline, cx.waker().clone());
            this.registered = true;
        }
        Poll::Pending
    }
}

impl fmt::Debug for Delay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Delay")
            .field("deadline", &self.deadline)
            .finish()
    }
}

/// A bounded wait expired before its inner future completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("timed out after {0} ns of simulated time")]
pub struct Elapsed(pub u64);

/// Bounds `future` to `ns` nanoseconds of simulated time.
///
/// The testbench has no cancellation primitive, so an edge that never
/// arrives would otherwise block its task until the run deadline abandons
/// it. Wrapping the wait makes the hang an explicit, testable outcome.
pub fn timeout<F>(ctx: &SimCtx, ns: u64, future: F) -> Timeout<F>
where
    F: Future,
{
    Timeout {
        future: Box::pin(future),
        delay: ctx.delay(ns),
        ns,
    }
}

/// Future returned by [`timeout`].
pub struct Timeout<F: Future> {
    future: Pin<Box<F>>,
    delay: Delay,
    ns: u64,
}

impl<F: Future> Future for Timeout<F> {
    type Output = Result<F::Output, Elapsed>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        if let Poll::Ready(value) = this.future.as_mut().poll(cx) {
            return Poll::Ready(Ok(value));
        }
        if Pin::new(&mut this.delay).poll(cx).is_ready() {
            return Poll::Ready(Err(Elapsed(this.ns)));
        }
        Poll::Pending
    }
}

impl<F: Future> fmt::Debug for Timeout<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timeout").field("ns", &self.ns).finish()
    }
}
