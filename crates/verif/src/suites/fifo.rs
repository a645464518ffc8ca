//! Synchronous FIFO testbench.
//!
//! Each transaction is exactly one write or one read strobe. The driver
//! asserts `wr`/`rd` with `din` at a falling edge, holds through the rising
//! edge where the device acts, and deasserts at the next falling edge. The
//! monitor synchronizes on the strobes, so idle cycles between transactions
//! are never sampled.

use std::collections::VecDeque;

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

/// Storage depth of both the device and the shadow model.
const DEPTH: usize = 4;

/// Behavioral device: a fixed-depth queue. Writes are dropped when full,
/// reads leave `dout` untouched when empty.
async fn fifo_dut(dut: Dut) {
    let mut storage: VecDeque<u64> = VecDeque::with_capacity(DEPTH);
    loop {
        dut.rising_edge("clk").await;
        if dut.get("rst") & 1 == 1 {
            storage.clear();
            dut.set("dout", 0);
            continue;
        }
        if dut.get("wr") & 1 == 1 && storage.len() < DEPTH {
            storage.push_back(dut.get("din"));
        }
        if dut.get("rd") & 1 == 1 {
            if let Some(word) = storage.pop_front() {
                dut.set("dout", word);
            }
        }
    }
}

#[derive(Debug, Clone)]
struct FifoProtocol {
    ctx: SimCtx,
}

impl Protocol for FifoProtocol {
    async fn drive(&mut self, dut: &Dut, txn: &Transaction) -> Result<(), TbError> {
        dut.falling_edge("clk").await;
        dut.set("wr", txn.field("wr")?);
        dut.set("rd", txn.field("rd")?);
        dut.set("din", txn.field("din")?);
        dut.rising_edge("clk").await;
        dut.falling_edge("clk").await;
        dut.set("wr", 0);
        dut.set("rd", 0);
        Ok(())
    }

    async fn sample(&mut self, dut: &Dut) -> Result<Transaction, TbError> {
        // Spin until a strobe cycle; drain-phase idle edges carry neither.
        loop {
            dut.falling_edge("clk").await;
            self.ctx.delay(1).await;
            if dut.get("wr") & 1 == 1 || dut.get("rd") & 1 == 1 {
                break;
            }
        }
        let wr = dut.get("wr");
        let rd = dut.get("rd");
        let din = dut.get("din");
        // The device acts on the rising edge inside the strobe cycle; read
        // data is stable one falling edge later.
        dut.falling_edge("clk").await;
        self.ctx.delay(1).await;
        Ok(Transaction::builder()
            .field("wr", wr)
            .field("rd", rd)
            .field("din", din)
            .field("dout", dut.get("dout"))
            .build())
    }
}

/// Shadow queue mirroring the device. Writes into a full queue and reads
/// from an empty one are legal stimulus with no observable effect, so both
/// score as ignored.
#[derive(Debug, Default)]
pub struct FifoModel {
    shadow: VecDeque<u64>,
}

impl RefModel for FifoModel {
    fn check(&mut self, txn: &Transaction) -> Result<Verdict, TbError> {
        if txn.field("wr")? & 1 == 1 {
            if self.shadow.len() >= DEPTH {
                return Ok(Verdict::Ignored);
            }
            self.shadow.push_back(txn.field("din")?);
            return Ok(Verdict::Pass);
        }
        let Some(expected) = self.shadow.pop_front() else {
            return Ok(Verdict::Ignored);
        };
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

/// The FIFO suite.
#[derive(Debug, Default)]
pub struct FifoTb;

impl FifoTb {
    /// One strobe per transaction: `wr` and `rd` are single bits that must
    /// differ, `din` is a byte.
    pub fn schema() -> Result<Schema, TbError> {
        Schema::builder()
            .rand("wr", 0..2)
            .rand("rd", 0..2)
            .rand("din", 0..256)
            .constraint(Constraint::binary("wr", "rd", |wr, rd| wr != rd))
            .build()
    }
}

impl Testbench for FifoTb {
    fn start(
        &mut self,
        ctx: &SimCtx,
        dut: &Dut,
        stats: &Stats,
        config: &Config,
    ) -> Result<JoinHandle<Result<(), TbError>>, TbError> {
        let stimulus = Queue::bounded(2);
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
            FifoProtocol { ctx: ctx.clone() },
            stats.clone(),
        );
        let monitor = Monitor::new(
            dut.clone(),
            analysis.clone(),
            FifoProtocol { ctx: ctx.clone() },
            stats.clone(),
        );
        let scoreboard = Scoreboard::new(analysis, event, FifoModel::default(), stats.clone());

        let _ = ctx.spawn(fifo_dut(dut.clone()));
        spawn_component(ctx, "DRV", driver.run());
        spawn_component(ctx, "MON", monitor.run());
        spawn_component(ctx, "SCO", scoreboard.run());
        Ok(ctx.spawn(generator.run()))
    }
}
