//! Registered adder testbench.
//!
//! Register protocol: the driver applies both operands at a falling clock
//! edge and holds them for two cycles; the device registers `y = a + b` at
//! every rising edge; the monitor samples operands and sum two falling
//! edges later, offset 1 ns past the edge.

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

/// Behavioral device: registers the sum of its operands each rising edge.
async fn adder_dut(dut: Dut) {
    loop {
        dut.rising_edge("clk").await;
        let sum = dut.get("a") + dut.get("b");
        dut.set("y", sum);
    }
}

#[derive(Debug, Clone)]
struct AdderProtocol {
    ctx: SimCtx,
}

impl Protocol for AdderProtocol {
    async fn drive(&mut self, dut: &Dut, txn: &Transaction) -> Result<(), TbError> {
        dut.falling_edge("clk").await;
        dut.set("a", txn.field("a")?);
        dut.set("b", txn.field("b")?);
        dut.clock_cycles("clk", 2).await;
        Ok(())
    }

    async fn sample(&mut self, dut: &Dut) -> Result<Transaction, TbError> {
        dut.falling_edge("clk").await;
        dut.falling_edge("clk").await;
        self.ctx.delay(1).await;
        Ok(Transaction::builder()
            .field("a", dut.get("a"))
            .field("b", dut.get("b"))
            .field("y", dut.get("y"))
            .build())
    }
}

/// Pure arithmetic shadow: expected sum from the observed operands.
#[derive(Debug, Default)]
pub struct AdderModel;

impl RefModel for AdderModel {
    fn check(&mut self, txn: &Transaction) -> Result<Verdict, TbError> {
        let expected = txn.field("a")? + txn.field("b")?;
        let observed = txn.field("y")?;
        if observed == expected {
            Ok(Verdict::Pass)
        } else {
            Ok(Verdict::Fail {
                field: "y".to_string(),
                expected,
                observed,
            })
        }
    }
}

/// The adder suite.
#[derive(Debug, Default)]
pub struct AdderTb;

impl AdderTb {
    /// Operands in `0..16`, each constrained below 10.
    pub fn schema() -> Result<Schema, TbError> {
        Schema::builder()
            .rand("a", 0..16)
            .rand("b", 0..16)
            .constraint(Constraint::unary("a", |a| a < 10))
            .constraint(Constraint::unary("b", |b| b < 10))
            .build()
    }
}

impl Testbench for AdderTb {
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
            AdderProtocol { ctx: ctx.clone() },
            stats.clone(),
        );
        let monitor = Monitor::new(
            dut.clone(),
            analysis.clone(),
            AdderProtocol { ctx: ctx.clone() },
            stats.clone(),
        );
        let scoreboard = Scoreboard::new(analysis, event, AdderModel, stats.clone());

        let _ = ctx.spawn(adder_dut(dut.clone()));
        spawn_component(ctx, "DRV", driver.run());
        spawn_component(ctx, "MON", monitor.run());
        spawn_component(ctx, "SCO", scoreboard.run());
        Ok(ctx.spawn(generator.run()))
    }
}
