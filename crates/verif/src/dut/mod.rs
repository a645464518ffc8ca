//! Device-under-test signal interface.
//!
//! The simulated device is an external collaborator: pipeline components see
//! it only through the capability set `{set, get, wait_edge}`, addressed by
//! signal name. This module provides:
//! 1. **Signals:** value and edge definitions ([`signal::Edge`]).
//! 2. **The board:** a named-signal store with edge-wait futures
//!    ([`Dut`]).
//! 3. **The clock source:** a task toggling a clock signal at a fixed
//!    period ([`clock::Clock`]) — the only thing that advances simulated
//!    time during a run.
//!
//! Shared-resource discipline: each device input has exactly one writer (its
//! driver) and each sampled output one reader (its monitor). Concurrent
//! writers to the same signal are undefined.

/// The named-signal board and edge-wait futures.
pub mod board;
/// Clock-generation task.
pub mod clock;
/// Signal edge definitions.
pub mod signal;

pub use board::{Dut, EdgeWait};
pub use clock::Clock;
pub use signal::Edge;
