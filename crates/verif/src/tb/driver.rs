//! Driver component and the protocol seam.

use crate::common::TbError;
use crate::crv::Transaction;
use crate::dut::Dut;
use crate::exec::Queue;
use crate::stats::Stats;

/// One side of a device protocol: how a transaction's fields map onto input
/// signals, and how output signals assemble back into a transaction.
///
/// The drive and sample state machines must agree exactly — for serial
/// links, both sides share the frame width and bit order, or the scoreboard
/// compares garbage. A testbench instantiates the protocol twice, once for
/// its driver and once for its monitor.
pub trait Protocol {
    /// Applies `txn` to the device inputs and waits for the protocol's
    /// completion condition (a fixed count of clock edges, an edge on a
    /// device-asserted done signal, or a full serial frame). Transient
    /// strobes must be deasserted before returning.
    async fn drive(&mut self, dut: &Dut, txn: &Transaction) -> Result<(), TbError>;

    /// Waits for the protocol's passive sampling point and assembles a fresh
    /// transaction from observed signal values.
    async fn sample(&mut self, dut: &Dut) -> Result<Transaction, TbError>;
}

/// Consumes stimulus transactions and applies them to the device.
#[derive(Debug)]
pub struct Driver<P: Protocol> {
    queue: Queue<Transaction>,
    dut: Dut,
    protocol: P,
    stats: Stats,
}

impl<P: Protocol> Driver<P> {
    /// Wires a driver to its stimulus queue and device.
    pub fn new(queue: Queue<Transaction>, dut: Dut, protocol: P, stats: Stats) -> Self {
        Self {
            queue,
            dut,
            protocol,
            stats,
        }
    }

    /// Drive loop: get, apply, await completion, repeat forever.
    ///
    /// Never returns normally; it is abandoned at the run deadline. An
    /// `Err` means the protocol hit a schema mismatch or a bounded wait
    /// expired.
    pub async fn run(mut self) -> Result<(), TbError> {
        loop {
            let txn = self.queue.get().await;
            tracing::info!(component = "DRV", %txn, "driving");
            self.protocol.drive(&self.dut, &txn).await?;
            self.stats.record_driven();
        }
    }
}
