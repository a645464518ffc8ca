//! Constrained-random, transaction-level hardware verification library.
//!
//! This crate implements a cooperative testbench framework in the UVM mold
//! with the following:
//! 1. **Crv:** declarative randomization — transactions, constraints,
//!    schemas, and a staged bounded-retry solver.
//! 2. **Exec:** a single-threaded cooperative scheduler over simulated
//!    nanoseconds, plus queues, rendezvous events, and bounded waits.
//! 3. **Dut:** the named-signal board, edge-wait futures, and the clock
//!    source.
//! 4. **Tb:** the generator/driver/monitor/scoreboard pipeline and the
//!    phased environment that runs it.
//! 5. **Suites:** five complete bundled testbenches (adder, D flip-flop,
//!    FIFO, memory, serial link).
//!
//! A run resolves schemas into transactions, drives them through a
//! protocol onto a behavioral device model, samples what the device did,
//! and scores it against a shadow model — all inside one deterministic,
//! seeded simulation.

/// Shared types: the [`TbError`] error enum.
pub mod common;
/// Hierarchical run configuration (clock, test, solver sections).
pub mod config;
/// Constrained-random value generation (transactions, schemas, solver).
pub mod crv;
/// Device-under-test signal board, edges, and clock source.
pub mod dut;
/// Cooperative scheduler, queues, events, and simulated-time waits.
pub mod exec;
/// Run statistics counters and reporting.
pub mod stats;
/// Bundled testbench suites.
pub mod suites;
/// The generator/driver/monitor/scoreboard pipeline and environment.
pub mod tb;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Error type shared across schema, solver, and protocol layers.
pub use crate::common::TbError;
/// Declarative randomization surface.
pub use crate::crv::{Constraint, Schema, Transaction, solve};
/// Named-signal device board and edge definitions.
pub use crate::dut::{Dut, Edge};
/// Execution substrate: scheduler handle, channels, rendezvous.
pub use crate::exec::{Event, Queue, Scheduler, SimCtx};
/// Run counters snapshot.
pub use crate::stats::{Stats, TbStats};
/// Bundled suite selector and runner.
pub use crate::suites::{SuiteKind, run_suite};
/// Pipeline components and the environment that phases them.
pub use crate::tb::{
    Driver, Environment, Generator, Monitor, Protocol, RefModel, RunReport, Scoreboard, Testbench,
    Verdict,
};
