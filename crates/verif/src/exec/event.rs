//! Latched broadcast rendezvous events.
//!
//! The generator/scoreboard pair uses one event as a one-credit flow-control
//! gate: the generator may not enqueue transaction *k+1* until the
//! scoreboard has called [`set`](Event::set) for transaction *k*.

use std::cell::RefCell;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

struct State {
    signaled: bool,
    waiters: Vec<Waker>,
}

/// A latched broadcast event handle. Cloning shares the underlying event.
#[derive(Clone)]
pub struct Event {
    state: Rc<RefCell<State>>,
}

impl Default for Event {
    fn default() -> Self {
        Self::new()
    }
}

impl Event {
    /// A new event in the unsignaled state.
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(State {
                signaled: false,
                waiters: Vec::new(),
            })),
        }
    }

    /// `true` while the event is latched signaled.
    pub fn is_set(&self) -> bool {
        self.state.borrow().signaled
    }

    /// Latches the signaled state and wakes every current waiter.
    /// Idempotent: setting an already-signaled event is a no-op.
    pub fn set(&self) {
        let waiters = {
            let mut state = self.state.borrow_mut();
            state.signaled = true;
            std::mem::take(&mut state.waiters)
        };
        for waker in waiters {
            waker.wake();
        }
    }

    /// Resets to unsignaled. Idempotent; pending waiters are unaffected.
    pub fn clear(&self) {
        self.state.borrow_mut().signaled = false;
    }

    /// Suspends until the event is signaled; completes immediately if it
    /// already is.
    pub fn wait(&self) -> Wait {
        Wait {
            event: self.clone(),
        }
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("signaled", &self.is_set())
            .finish()
    }
}

/// Future returned by [`Event::wait`].
#[derive(Debug)]
pub struct Wait {
    event: Event,
}

impl Future for Wait {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let mut state = self.event.state.borrow_mut();
        if state.signaled {
            Poll::Ready(())
        } else {
            state.waiters.push(cx.waker().clone());
            Poll::Pending
        }
    }
}
