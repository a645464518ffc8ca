//! Clock-generation task.

use crate::dut::Dut;
use crate::exec::SimCtx;

/// A free-running clock source for one signal.
///
/// Spawned by the environment during `Init`; it toggles forever and is
/// abandoned at the run deadline like every other task.
#[derive(Debug)]
pub struct Clock {
    dut: Dut,
    signal: String,
    period_ns: u64,
}

impl Clock {
    /// A clock on `signal` with the given full period.
    pub fn new(dut: &Dut, signal: &str, period_ns: u64) -> Self {
        Self {
            dut: dut.clone(),
            signal: signal.to_string(),
            period_ns: period_ns.max(2),
        }
    }

    /// Toggles the signal forever: high for half a period, low for half.
    pub async fn start(self, ctx: SimCtx) {
        let half = self.period_ns / 2;
        loop {
            self.dut.set(&self.signal, 1);
            ctx.delay(half).await;
            self.dut.set(&self.signal, 0);
            ctx.delay(self.period_ns - half).await;
        }
    }
}
