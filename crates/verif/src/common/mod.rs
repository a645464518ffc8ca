//! Shared types used across the testbench library.
//!
//! This module collects the pieces every other module depends on:
//! 1. **Errors:** the [`TbError`] enum covering schema validation, solver
//!    exhaustion, and protocol timeouts.

/// Error definitions for schema, solver, and protocol failures.
pub mod error;

pub use error::TbError;
