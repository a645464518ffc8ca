//! # Framework Unit Tests
//!
//! This module organizes the fine-grained tests for each framework layer.

/// Configuration defaults and JSON deserialization.
pub mod config;



/// Execution substrate: scheduler, queues, events, and timed waits.
pub mod exec;


/// End-to-end runs of every bundled suite.
pub mod suites;

/// Pipeline components: generator flow control and the scoreboard.
pub mod tb;
