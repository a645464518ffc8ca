//! Passive output monitor.

use crate::common::TbError;
use crate::crv::Transaction;
use crate::dut::Dut;
use crate::exec::Queue;
use crate::stats::Stats;
use crate::tb::driver::Protocol;

/// Samples device outputs into fresh transactions for analysis.
///
/// Strictly passive: it never writes a signal and never touches a
/// transaction after publishing it to the analysis queue.
#[derive(Debug)]
pub struct Monitor<P: Protocol> {
    dut: Dut,
    analysis: Queue<Transaction>,
    protocol: P,
    stats: Stats,
}

impl<P: Protocol> Monitor<P> {
    /// Wires a monitor to its device and analysis queue.
    pub fn new(dut: Dut, analysis: Queue<Transaction>, protocol: P, stats: Stats) -> Self {
        Self {
            dut,
            analysis,
            protocol,
            stats,
        }
    }

    /// Sample loop: await the sampling point, assemble, publish, repeat
    /// forever. Abandoned at the run deadline.
    pub async fn run(mut self) -> Result<(), TbError> {
        loop {
            let txn = self.protocol.sample(&self.dut).await?;
            tracing::info!(component = "MON", %txn, "observed");
            self.stats.record_observed();
            self.analysis.put(txn).await;
        }
    }
}
