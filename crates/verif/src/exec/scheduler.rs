//! Single-threaded cooperative scheduler with simulated time.
//!
//! Tasks are plain futures polled from a ready queue. A task's waker pushes
//! its id back onto that queue, so everything a component awaits (queues,
//! events, delays, device edges) is an ordinary future. Simulated time never
//! advances while any task is runnable; when the ready queue drains, the
//! scheduler jumps to the earliest pending timer deadline and wakes its
//! waiters. Time is therefore driven entirely by the clock source and timed
//! delays, never by the pipeline components themselves.

use std::cell::{Cell, RefCell};
use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, VecDeque};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll, Wake, Waker};

type LocalFuture = Pin<Box<dyn Future<Output = ()>>>;
type ReadyQueue = Arc<Mutex<VecDeque<usize>>>;

/// A timer waiting to fire. Ordered by `(deadline, seq)` so equal deadlines
/// fire in registration order.
struct TimerEntry {
    deadline: u64,
    seq: u64,
    waker: Waker,
}

impl PartialEq for TimerEntry {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline && self.seq == other.seq
    }
}

impl Eq for TimerEntry {}

impl PartialOrd for TimerEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimerEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.deadline, self.seq).cmp(&(other.deadline, other.seq))
    }
}

/// Shared scheduler state, reachable from both the run loop and the futures
/// it polls (via [`SimCtx`]).
struct Core {
    now: Cell<u64>,
    tasks: RefCell<Vec<Option<LocalFuture>>>,
    timers: RefCell<BinaryHeap<Reverse<TimerEntry>>>,
    timer_seq: Cell<u64>,
    ready: ReadyQueue,
}

impl Core {
    fn lock_ready(&self) -> MutexGuard<'_, VecDeque<usize>> {
        // Single-threaded; a poisoned lock can only come from a panicking
        // test, in which case the queue contents are still coherent.
        self.ready.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Waker for one task: re-queues the task id on the ready queue.
struct TaskWaker {
    id: usize,
    ready: ReadyQueue,
}

impl Wake for TaskWaker {
    fn wake(self: Arc<Self>) {
        self.ready
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(self.id);
    }
}

/// Cloneable handle into the scheduler, given to tasks so they can spawn
/// children, read the simulated clock, and register timed delays.
#[derive(Clone)]
pub struct SimCtx {
    core: Rc<Core>,
}

impl SimCtx {
    /// Current simulated time in nanoseconds.
    pub fn now(&self) -> u64 {
        self.core.now.get()
    }

    /// Spawns a task; it becomes runnable immediately.
    ///
    /// The returned handle observes the task's result; dropping it detaches
    /// the task without cancelling it.
    pub fn spawn<F>(&self, future: F) -> JoinHandle<F::Output>
    where
        F: Future + 'static,
        F::Output: 'static,
    {
        let slot = Rc::new(RefCell::new(None));
        let out = Rc::clone(&slot);
        let wrapped = async move {
            let value = future.await;
            *out.borrow_mut() = Some(value);
        };
        let id = {
            let mut tasks = self.core.tasks.borrow_mut();
            tasks.push(Some(Box::pin(wrapped)));
            tasks.len() - 1
        };
        self.core.lock_ready().push_back(id);
        JoinHandle { slot }
    }

    /// A future that completes `ns` nanoseconds of simulated time from now.
    pub fn delay(&self, ns: u64) -> super::time::Delay {
        super::time::Delay::new(self.clone(), self.now().saturating_add(ns))
    }

    /// Registers a waker to fire at an absolute simulated deadline.
    pub(crate) fn register_timer(&self, deadline: u64, waker: Waker) {
        let seq = self.core.timer_seq.get();
        self.core.timer_seq.set(seq + 1);
        self.core.timers.borrow_mut().push(Reverse(TimerEntry {
            deadline,
            seq,
            waker,
        }));
    }
}

impl fmt::Debug for SimCtx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimCtx").field("now", &self.now()).finish()
    }
}

/// Observes a spawned task's result.
pub struct JoinHandle<T> {
    slot: Rc<RefCell<Option<T>>>,
}

impl<T> JoinHandle<T> {
    /// `true` once the task has run to completion.
    pub fn is_finished(&self) -> bool {
        self.slot.borrow().is_some()
    }

    /// Takes the task's result if it has completed.
    pub fn try_take(&self) -> Option<T> {
        self.slot.borrow_mut().take()
    }
}

impl<T> fmt::Debug for JoinHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JoinHandle")
            .field("finished", &self.is_finished())
            .finish()
    }
}

/// The executor: owns the task table and drives simulated time.
pub struct Scheduler {
    core: Rc<Core>,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    /// Creates an empty scheduler at simulated time zero.
    pub fn new() -> Self {
        Self {
            core: Rc::new(Core {
                now: Cell::new(0),
                tasks: RefCell::new(Vec::new()),
                timers: RefCell::new(BinaryHeap::new()),
                timer_seq: Cell::new(0),
                ready: Arc::new(Mutex::new(VecDeque::new())),
            }),
        }
    }

    /// Handle for spawning tasks and creating delays.
    pub fn ctx(&self) -> SimCtx {
        SimCtx {
            core: Rc::clone(&self.core),
        }
    }

    /// Current simulated time in nanoseconds.
    pub fn now(&self) -> u64 {
        self.core.now.get()
    }

    /// Runs until no task is runnable and no timer is pending.
    ///
    /// Only useful for tests without a free-running clock; anything spawning
    /// a clock source never goes quiescent and must use
    /// [`run_until`](Self::run_until).
    pub fn run(&mut self) {
        loop {
            self.drain_ready();
            if !self.fire_next_timers(u64::MAX) {
                break;
            }
        }
    }

    /// Runs until simulated time reaches `deadline` (or nothing is left to
    /// do), then sets the clock to `deadline`.
    ///
    /// Tasks still suspended afterwards stay in the table; a later call
    /// resumes them. Tasks never resumed are abandoned when the scheduler is
    /// dropped.
    pub fn run_until(&mut self, deadline: u64) {
        loop {
            self.drain_ready();
            if !self.fire_next_timers(deadline) {
                break;
            }
        }
        if self.core.now.get() < deadline {
            self.core.now.set(deadline);
        }
    }

    /// Polls ready tasks until the ready queue is empty.
    fn drain_ready(&mut self) {
        loop {
            let next = self.core.lock_ready().pop_front();
            let Some(id) = next else { break };
            // The slot is vacated during the poll so the task can spawn
            // siblings (which grow the table) without overlapping borrows.
            let taken = self.core.tasks.borrow_mut()[id].take();
            let Some(mut future) = taken else { continue };
            let waker = Waker::from(Arc::new(TaskWaker {
                id,
                ready: Arc::clone(&self.core.ready),
            }));
            let mut cx = Context::from_waker(&waker);
            if future.as_mut().poll(&mut cx).is_pending() {
                self.core.tasks.borrow_mut()[id] = Some(future);
            }
        }
    }

    /// Advances time to the earliest pending timer at or before `limit` and
    /// wakes every timer due at that instant. Returns `false` when there is
    /// no such timer.
    fn fire_next_timers(&mut self, limit: u64) -> bool {
        let next = {
            let timers = self.core.timers.borrow();
            timers.peek().map(|Reverse(e)| e.deadline)
        };
        let Some(deadline) = next else { return false };
        if deadline > limit {
            return false;
        }
        self.core.now.set(deadline);
        let mut timers = self.core.timers.borrow_mut();
        while timers
            .peek()
            .is_some_and(|Reverse(e)| e.deadline <= deadline)
        {
            if let Some(Reverse(entry)) = timers.pop() {
                entry.waker.wake();
            }
        }
        true
    }
}

impl fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("now", &self.now())
            .field("tasks", &self.core.tasks.borrow().len())
            .finish()
    }
}
