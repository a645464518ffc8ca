//! The transaction-level verification pipeline.
//!
//! This module implements the component skeletons wired by every testbench:
//! 1. **Generator:** constrained-random stimulus production, rate-limited by
//!    a rendezvous event ([`Generator`]).
//! 2. **Driver:** applies transactions to device inputs and waits for the
//!    protocol's completion condition ([`Driver`]).
//! 3. **Monitor:** passively samples device outputs into fresh transactions
//!    ([`Monitor`]).
//! 4. **Scoreboard:** compares observed behavior against a shadow model
//!    ([`Scoreboard`]).
//! 5. **Environment:** wires and runs the above through the
//!    `Init -> Running -> Drain -> Done` phases ([`Environment`]).
//!
//! Protocol framing (which edges drive, where samples land, how serial bits
//! are shifted) lives behind the [`Protocol`] trait; the expected-behavior
//! model lives behind [`RefModel`]. A concrete testbench supplies both plus
//! a schema — see the `suites` module for complete examples.
//!
//! # Timing discipline
//!
//! Suites shipped here follow one convention to stay free of same-delta
//! read/write races: drivers change device inputs at *falling* clock edges,
//! sequential device models latch at *rising* edges, and monitors sample at
//! a falling edge plus a 1 ns offset, so a sample never lands in the same
//! delta as a driver write.

/// Driver component and the [`Protocol`] seam.
pub mod driver;
/// Environment, run phases, and run report.
pub mod env;
/// Constrained-random stimulus generator.
pub mod generator;
/// Passive output monitor.
pub mod monitor;
/// Scoreboard and the [`RefModel`] seam.
pub mod scoreboard;

pub use driver::{Driver, Protocol};
pub use env::{Environment, Phase, RunReport, Testbench};
pub use generator::Generator;
pub use monitor::Monitor;
pub use scoreboard::{RefModel, Scoreboard, Verdict};

use std::future::Future;

use crate::common::TbError;
use crate::exec::SimCtx;

/// Spawns a long-running pipeline component, logging any error that stops
/// it. Driver/monitor/scoreboard loops only return on error; nobody joins
/// them, so the error would otherwise vanish with the dropped handle.
pub(crate) fn spawn_component<F>(ctx: &SimCtx, name: &'static str, future: F)
where
    F: Future<Output = Result<(), TbError>> + 'static,
{
    let _ = ctx.spawn(async move {
        if let Err(error) = future.await {
            tracing::error!(component = name, %error, "component stopped");
        }
    });
}
