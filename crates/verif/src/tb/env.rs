//! Environment: wiring, run phases, and the run report.
//!
//! The environment owns the scheduler, the signal board, and the shared
//! counters side-by-side, and drives a run through its phases:
//!
//! - `Init` — spawn the clock source, hold reset asserted for a fixed
//!   number of cycles, deassert.
//! - `Running` — start the testbench's DUT model and pipeline tasks.
//! - `Drain` — entered when the generator finishes; everything else keeps
//!   running until the simulated-time deadline.
//! - `Done` — remaining tasks are abandoned (there is no cooperative
//!   shutdown handshake) and the aggregate counters are reported.

use serde::Serialize;

use crate::common::TbError;
use crate::config::Config;
use crate::dut::{Clock, Dut};
use crate::exec::{JoinHandle, Scheduler, SimCtx};
use crate::stats::{Stats, TbStats};

/// Run phase, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    /// Reset asserted; only the clock runs.
    Init,
    /// Pipeline active, generator still producing.
    Running,
    /// Generator finished; trailing pipeline activity continues.
    Drain,
    /// Deadline reached; report produced.
    Done,
}

/// A concrete testbench: schema, protocol, model, and wiring.
///
/// `start` is called at the `Init`/`Running` boundary with reset already
/// deasserted; it spawns the DUT model and pipeline tasks and hands back the
/// generator's join handle so the environment can track draining and surface
/// solver errors.
pub trait Testbench {
    /// The signal toggled by the environment's clock source.
    fn clock_signal(&self) -> &'static str {
        "clk"
    }

    /// The signal held high through `Init`.
    fn reset_signal(&self) -> &'static str {
        "rst"
    }

    /// Spawns the DUT model and pipeline; returns the generator's handle.
    ///
    /// # Errors
    ///
    /// Schema construction failures propagate out of
    /// [`Environment::run`] before anything is spawned.
    fn start(
        &mut self,
        ctx: &SimCtx,
        dut: &Dut,
        stats: &Stats,
        config: &Config,
    ) -> Result<JoinHandle<Result<(), TbError>>, TbError>;
}

/// End-of-run summary.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Aggregate counters at the deadline.
    pub stats: TbStats,
    /// Simulated time when the run ended, in nanoseconds.
    pub sim_time_ns: u64,
    /// Whether the generator finished before the deadline.
    pub drained: bool,
}

impl RunReport {
    /// `true` when the stimulus drained and nothing mismatched.
    pub fn is_pass(&self) -> bool {
        self.drained && self.stats.all_passed()
    }
}

/// Owns the scheduler, signal board, and counters for one run.
#[derive(Debug)]
pub struct Environment {
    config: Config,
    scheduler: Scheduler,
    dut: Dut,
    stats: Stats,
    phase: Phase,
}

impl Environment {
    /// A fresh environment at simulated time zero.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            scheduler: Scheduler::new(),
            dut: Dut::new(),
            stats: Stats::new(),
            phase: Phase::Init,
        }
    }

    /// The shared signal board.
    pub fn dut(&self) -> Dut {
        self.dut.clone()
    }

    /// The current run phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Runs `tb` through all four phases and reports.
    ///
    /// # Errors
    ///
    /// Schema errors from `start`, and a generator aborted by
    /// [`TbError::Unsatisfiable`] — mismatch counts are never errors.
    pub fn run<T: Testbench + ?Sized>(&mut self, tb: &mut T) -> Result<RunReport, TbError> {
        let ctx = self.scheduler.ctx();
        let period = self.config.clock.period_ns;

        self.phase = Phase::Init;
        tracing::info!(phase = ?self.phase, "reset asserted");
        let _ = ctx.spawn(Clock::new(&self.dut, tb.clock_signal(), period).start(ctx.clone()));
        self.dut.set(tb.reset_signal(), 1);
        self.scheduler
            .run_until(self.config.test.reset_cycles * period);
        self.dut.set(tb.reset_signal(), 0);

        self.phase = Phase::Running;
        tracing::info!(phase = ?self.phase, "reset released, pipeline started");
        let generator = tb.start(&ctx, &self.dut, &self.stats, &self.config)?;

        let deadline = self.scheduler.now() + self.config.test.run_ns;
        while self.scheduler.now() < deadline {
            let step_to = (self.scheduler.now() + period).min(deadline);
            self.scheduler.run_until(step_to);
            if self.phase == Phase::Running && generator.is_finished() {
                self.phase = Phase::Drain;
                tracing::info!(phase = ?self.phase, now_ns = self.scheduler.now(), "generator finished");
            }
        }

        self.phase = Phase::Done;
        let drained = match generator.try_take() {
            Some(Ok(())) => true,
            Some(Err(error)) => {
                tracing::error!(%error, "generation aborted");
                return Err(error);
            }
            None => {
                tracing::warn!("deadline reached with stimulus still pending");
                false
            }
        };

        let stats = self.stats.snapshot();
        stats.report();
        Ok(RunReport {
            stats,
            sim_time_ns: self.scheduler.now(),
            drained,
        })
    }
}
