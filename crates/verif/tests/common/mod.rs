//! Shared test infrastructure.

/// Scheduler runner, canned configurations, and tracing setup.
pub mod harness;
