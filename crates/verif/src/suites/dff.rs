//! D flip-flop testbench.
//!
//! Single-cycle protocol: the driver updates `din` at each falling edge,
//! the device latches `dout` at each rising edge, and the monitor samples
//! both 1 ns after each falling edge. At that point `dout` still holds the
//! previously latched value, so the reference model tracks one transaction
//! of history.

use crate::common::TbError;
use crate::config::Config;
use crate::crv::{Constraint, Schema, Transaction};
use crate::dut::Dut;
use crate::exec::{Event, JoinHandle, Queue, SimCtx};
use crate::stats::Stats;
use crate::tb::{
    Driver, Generator, Monitor, Protocol, RefModel, Scoreboard, Testbench, Verdict,
    spawn_component,
};

/// Behavioral device: latches `din` into `dout` each rising edge; reset
/// holds the register at zero.
async fn dff_dut(dut: Dut) {
    loop {
        dut.rising_edge("clk").await;
        if dut.get("rst") & 1 == 1 {
            dut.set("dout", 0);
        } else {
            dut.set("dout", dut.get("din") & 1);
        }
    }
}

#[derive(Debug, Clone)]
struct DffProtocol {
    ctx: SimCtx,
}

impl Protocol for DffProtocol {
    async fn drive(&mut self, dut: &Dut, txn: &Transaction) -> Result<(), TbError> {
        dut.falling_edge("clk").await;
        dut.set("din", txn.field("din")? & 1);
        dut.rising_edge("clk").await;
        Ok(())
    }

    async fn sample(&mut self, dut: &Dut) -> Result<Transaction, TbError> {
        dut.falling_edge("clk").await;
        self.ctx.delay(1).await;
        Ok(Transaction::builder()
            .field("din", dut.get("din"))
            .field("dout", dut.get("dout"))
            .build())
    }
}

/// Previous-value shadow: `dout` must equal the `din` of the previous
/// observation. The register resets to zero, so the history starts at zero.
#[derive(Debug, Default)]
pub struct DffModel {
    last_din: u64,
}

impl RefModel for DffModel {
    fn check(&mut self, txn: &Transaction) -> Result<Verdict, TbError> {
        let expected = self.last_din;
        self.last_din = txn.field("din")?;
        let observed = txn.field("dout")?;
        if observed == expected {
            Ok(Verdict::Pass)
        } else {
            Ok(Verdict::Fail {
                field: "dout".to_string(),
                expected,
                observed,
            })
        }
    }
}

/// The D flip-flop suite.
#[derive(Debug, Default)]
pub struct DffTb;

impl DffTb {
    /// One data bit.
    pub fn schema() -> Result<Schema, TbError> {
        Schema::builder()
            .rand("din", 0..2)
            .constraint(Constraint::unary("din", |din| din < 2))
            .build()
    }
}

impl Testbench for DffTb {
    fn start(
        &mut self,
        ctx: &SimCtx,
        dut: &Dut,
        stats: &Stats,
        config: &Config,
    ) -> Result<JoinHandle<Result<(), TbError>>, TbError> {
        let stimulus = Queue::unbounded();
        let analysis = Queue::unbounded();
        let event = Event::new();

        let generator = Generator::new(
            Self::schema()?,
            stimulus.clone(),
            event.clone(),
            stats.clone(),
            config,
        );
        let driver = Driver::new(
            stimulus,
            dut.clone(),
            DffProtocol { ctx: ctx.clone() },
            stats.clone(),
        );
        let monitor = Monitor::new(
            dut.clone(),
            analysis.clone(),
            DffProtocol { ctx: ctx.clone() },
            stats.clone(),
        );
        let scoreboard = Scoreboard::new(analysis, event, DffModel::default(), stats.clone());

        let _ = ctx.spawn(dff_dut(dut.clone()));
        spawn_component(ctx, "DRV", driver.run());
        spawn_component(ctx, "MON", monitor.run());
        spawn_component(ctx, "SCO", scoreboard.run());
        Ok(ctx.spawn(generator.run()))
    }
}
