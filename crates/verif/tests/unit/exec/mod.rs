//! # Execution Substrate Tests
//!
//! This module aggregates tests for:
//! - Scheduler polling, simulated time, and deadlines.
//! - Queue ordering and backpressure.
//! - Event latching and broadcast.
//! - Delays and bounded waits.




/// Delay and timeout combinators.
pub mod time;
