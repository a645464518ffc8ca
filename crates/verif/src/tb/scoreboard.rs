//! Scoreboard and the reference-model seam.

use crate::common::TbError;
use crate::crv::Transaction;
use crate::exec::{Event, Queue};
use crate::stats::Stats;

/// Outcome of one expected-vs-observed comparison.
///
/// A mismatch is data, not an error: it is recorded and the pipeline keeps
/// running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Observed matched expected.
    Pass,
    /// Observed differed from expected.
    Fail {
        /// The output field that mismatched.
        field: String,
        /// Value the shadow model predicted.
        expected: u64,
        /// Value the monitor sampled.
        observed: u64,
    },
    /// The model could not judge this observation (e.g. reading an empty
    /// FIFO shadow); reported, not counted as pass or fail.
    Ignored,
}

/// A shadow model of expected device state.
///
/// The scoreboard owns exactly one instance per run and feeds it every
/// observed transaction in observation order — never ahead of or behind it —
/// so stateful models (FIFO occupancy, memory contents, previous-cycle
/// values) stay in lockstep with the device.
pub trait RefModel {
    /// Updates the shadow state from `txn` and judges the observed output.
    ///
    /// Must be a pure function of the transactions seen so far: no device
    /// access, no time.
    fn check(&mut self, txn: &Transaction) -> Result<Verdict, TbError>;
}

/// Compares observed transactions against a shadow model.
#[derive(Debug)]
pub struct Scoreboard<M: RefModel> {
    analysis: Queue<Transaction>,
    event: Event,
    model: M,
    stats: Stats,
}

impl<M: RefModel> Scoreboard<M> {
    /// Wires a scoreboard to its analysis queue, credit event, and model.
    pub fn new(analysis: Queue<Transaction>, event: Event, model: M, stats: Stats) -> Self {
        Self {
            analysis,
            event,
            model,
            stats,
        }
    }

    /// Compare loop: get, judge, record, release the generator's credit,
    /// repeat forever. Abandoned at the run deadline.
    pub async fn run(mut self) -> Result<(), TbError> {
        loop {
            let txn = self.analysis.get().await;
            match self.model.check(&txn)? {
                Verdict::Pass => {
                    tracing::info!(component = "SCO", %txn, "PASS");
                    self.stats.record_pass();
                }
                Verdict::Fail {
                    field,
                    expected,
                    observed,
                } => {
                    tracing::error!(
                        component = "SCO",
                        %txn,
                        field,
                        expected,
                        observed,
                        "FAIL"
                    );
                    self.stats.record_fail();
                }
                Verdict::Ignored => {
                    tracing::info!(component = "SCO", %txn, "ignored");
                    self.stats.record_ignored();
                }
            }
            self.event.set();
        }
    }
}
