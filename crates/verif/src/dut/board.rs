//! The named-signal board.
//!
//! Signals live in a name-addressed store; writing a value that changes a
//! signal wakes every task waiting for the matching edge. Signals that were
//! never written read as 0 — outputs are legitimately sampled before reset
//! has propagated, and 0 mirrors a device coming out of reset.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

use crate::dut::signal::Edge;

struct EdgeWaiter {
    signal: String,
    edge: Edge,
    fired: Rc<Cell<bool>>,
    waker: Waker,
}

struct Board {
    signals: HashMap<String, u64>,
    waiters: Vec<EdgeWaiter>,
}

/// Handle to the device's signal board. Cloning shares the board.
#[derive(Clone)]
pub struct Dut {
    board: Rc<RefCell<Board>>,
}

impl Default for Dut {
    fn default() -> Self {
        Self::new()
    }
}

impl Dut {
    /// An empty board; signals appear on first write.
    pub fn new() -> Self {
        Self {
            board: Rc::new(RefCell::new(Board {
                signals: HashMap::new(),
                waiters: Vec::new(),
            })),
        }
    }

    /// Drives `name` to `value`.
    ///
    /// A change wakes every waiter registered for the matching edge; writing
    /// the current value is a no-op and wakes nothing.
    pub fn set(&self, name: &str, value: u64) {
        let mut board = self.board.borrow_mut();
        let old = board.signals.insert(name.to_string(), value).unwrap_or(0);
        if old == value {
            return;
        }
        board.waiters.retain(|w| {
            if w.signal == name && w.edge.matches(old, value) {
                w.fired.set(true);
                w.waker.wake_by_ref();
                false
            } else {
                true
            }
        });
    }

    /// Samples `name`; never-written signals read as 0.
    pub fn get(&self, name: &str) -> u64 {
        self.board.borrow().signals.get(name).copied().unwrap_or(0)
    }

    /// Suspends until `name` makes the given transition.
    ///
    /// The wait observes only transitions that happen after registration; a
    /// signal already at the target level does not complete it.
    pub fn wait_edge(&self, name: &str, edge: Edge) -> EdgeWait {
        EdgeWait {
            dut: self.clone(),
            signal: name.to_string(),
            edge,
            fired: Rc::new(Cell::new(false)),
            registered: false,
        }
    }

    /// Shorthand for a [`Edge::Rising`] wait.
    pub fn rising_edge(&self, name: &str) -> EdgeWait {
        self.wait_edge(name, Edge::Rising)
    }

    /// Shorthand for a [`Edge::Falling`] wait.
    pub fn falling_edge(&self, name: &str) -> EdgeWait {
        self.wait_edge(name, Edge::Falling)
    }

    /// Waits for `n` rising edges of `name`.
    pub async fn clock_cycles(&self, name: &str, n: u32) {
        for _ in 0..n {
            self.rising_edge(name).await;
        }
    }
}

impl fmt::Debug for Dut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let board = self.board.borrow();
        f.debug_struct("Dut")
            .field("signals", &board.signals.len())
            .field("waiters", &board.waiters.len())
            .finish()
    }
}

/// Future returned by [`Dut::wait_edge`].
///
/// Each scheduler poll carries an equivalent waker for the same task, so the
/// waker captured at registration stays valid across polls.
pub struct EdgeWait {
    dut: Dut,
    signal: String,
    edge: Edge,
    fired: Rc<Cell<bool>>,
    registered: bool,
}

impl Future for EdgeWait {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let this = self.get_mut();
        if this.fired.get() {
            return Poll::Ready(());
        }
        if !this.registered {
            this.dut.board.borrow_mut().waiters.push(EdgeWaiter {
                signal: this.signal.clone(),
                edge: this.edge,
                fired: Rc::clone(&this.fired),
                waker: cx.waker().clone(),
            });
            this.registered = true;
        }
        Poll::Pending
    }
}

impl fmt::Debug for EdgeWait {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EdgeWait")
            .field("signal", &self.signal)
            .field("edge", &self.edge)
            .finish()
    }
}
