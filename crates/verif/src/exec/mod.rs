//! Cooperative task execution with simulated time.
//!
//! This module implements the concurrency substrate of the testbench. It
//! provides:
//! 1. **Scheduler:** a single-threaded executor polling tasks from a ready
//!    queue; simulated time advances only when every runnable task has
//!    suspended ([`Scheduler`], [`SimCtx`]).
//! 2. **Queues:** FIFO inter-task channels, bounded or unbounded
//!    ([`Queue`]).
//! 3. **Events:** latched broadcast signal/wait/clear rendezvous
//!    ([`Event`]).
//! 4. **Time:** timed delays and a bounded-wait combinator
//!    ([`time::Delay`], [`time::timeout`]).
//!
//! Tasks run uninterrupted between suspension points (queue put/get, event
//! wait, delay, device edge wait), so queue and event mutations are atomic
//! relative to other tasks. There is no preemption and no cancellation: a
//! task still blocked when the environment's deadline passes is abandoned.

/// Latched broadcast rendezvous events.
pub mod event;
/// FIFO inter-task channels.
pub mod queue;
/// Single-threaded executor and simulated clock.
pub mod scheduler;
/// Delays and bounded waits in simulated time.
pub mod time;

pub use event::Event;
pub use queue::Queue;
pub use scheduler::{JoinHandle, Scheduler, SimCtx};
pub use time::{Delay, Elapsed, timeout};
