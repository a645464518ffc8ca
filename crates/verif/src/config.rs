//! Configuration system for the verification testbench.
//!
//! This module defines all configuration structures used to parameterize a
//! test run. It provides:
//! 1. **Defaults:** baseline constants (clock period, reset length, run
//!    deadline, solver retry budget).
//! 2. **Structures:** hierarchical config for the clock source, the test run,
//!    and the constraint solver.
//!
//! Configuration is supplied as JSON (deserialized with serde) or built with
//! `Config::default()`. Every section and field is optional; missing fields
//! fall back to the defaults below.

use serde::Deserialize;

/// Default configuration constants for the testbench.
mod defaults {
    /// Clock period in simulated nanoseconds (100 MHz).
    pub const CLOCK_PERIOD_NS: u64 = 10;

    /// Number of clock periods reset is held asserted during `Init`.
    pub const RESET_CYCLES: u64 = 5;

    /// Simulated-time deadline for a run, in nanoseconds.
    ///
    /// Tasks still blocked when the deadline passes are abandoned, not
    /// cancelled; the deadline is the only bound on a hung protocol wait.
    pub const RUN_NS: u64 = 20_000;

    /// Number of transactions the generator produces per run.
    pub const COUNT: u32 = 10;

    /// Seed for the randomization source. Runs are reproducible per seed.
    pub const SEED: u64 = 1;

    /// Per-stage retry budget for the constraint solver.
    ///
    /// The solver must terminate: a stage that cannot be satisfied within
    /// this many sampling rounds fails the whole resolution.
    pub const MAX_ATTEMPTS: u32 = 1000;
}

/// Root configuration for a testbench run.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Clock source configuration.
    pub clock: ClockConfig,
    /// Test run configuration (count, seed, deadline, reset).
    pub test: TestConfig,
    /// Constraint solver configuration.
    pub solver: SolverConfig,
}

/// Clock source configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Full clock period in simulated nanoseconds.
    pub period_ns: u64,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            period_ns: defaults::CLOCK_PERIOD_NS,
        }
    }
}

/// Test run configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TestConfig {
    /// Number of transactions to generate.
    pub count: u32,
    /// Randomization seed; identical seeds replay identical stimulus.
    pub seed: u64,
    /// Simulated-time deadline after reset deasserts, in nanoseconds.
    pub run_ns: u64,
    /// Clock periods to hold reset asserted before the pipeline starts.
    pub reset_cycles: u64,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            count: defaults::COUNT,
            seed: defaults::SEED,
            run_ns: defaults::RUN_NS,
            reset_cycles: defaults::RESET_CYCLES,
        }
    }
}

/// Constraint solver configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Per-stage sampling retry budget before the solver reports
    /// [`TbError::Unsatisfiable`](crate::common::TbError::Unsatisfiable).
    pub max_attempts: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_attempts: defaults::MAX_ATTEMPTS,
        }
    }
}
