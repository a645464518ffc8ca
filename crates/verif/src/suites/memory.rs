//! Single-port memory testbench.
//!
//! Same strobe cadence as the FIFO suite, but the schema is staged: the
//! command bits solve first, then the address and data. Uninitialized
//! locations read back as zero in both the device and the shadow.

use std::collections::HashMap;

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

/// Behavioral device: a sparse word store. Writes take effect on the
/// rising edge; reads register `dout` the same edge.
async fn memory_dut(dut: Dut) {
    let mut store: HashMap<u64, u64> = HashMap::new();
    loop {
        dut.rising_edge("clk").await;
        if dut.get("rst") & 1 == 1 {
            store.clear();
            dut.set("dout", 0);
            continue;
        }
        let addr = dut.get("addr");
        if dut.get("wr") & 1 == 1 {
            let _ = store.insert(addr, dut.get("din"));
        }
        if dut.get("rd") & 1 == 1 {
            dut.set("dout", store.get(&addr).copied().unwrap_or(0));
        }
    }
}

#[derive(Debug, Clone)]
struct MemoryProtocol {
    ctx: SimCtx,
}

impl Protocol for MemoryProtocol {
    async fn drive(&mut self, dut: &Dut, txn: &Transaction) -> Result<(), TbError> {
        dut.falling_edge("clk").await;
        dut.set("wr", txn.field("wr")?);
        dut.set("rd", txn.field("rd")?);
        dut.set("addr", txn.field("addr")?);
        dut.set("din", txn.field("din")?);
        dut.rising_edge("clk").await;
        dut.falling_edge("clk").await;
        dut.set("wr", 0);
        dut.set("rd", 0);
        Ok(())
    }

    async fn sample(&mut self, dut: &Dut) -> Result<Transaction, TbError> {
        loop {
            dut.falling_edge("clk").await;
            self.ctx.delay(1).await;
            if dut.get("wr") & 1 == 1 || dut.get("rd") & 1 == 1 {
                break;
            }
        }
        let wr = dut.get("wr");
        let rd = dut.get("rd");
        let addr = dut.get("addr");
        let din = dut.get("din");
        dut.falling_edge("clk").await;
        self.ctx.delay(1).await;
        Ok(Transaction::builder()
            .field("wr", wr)
            .field("rd", rd)
            .field("addr", addr)
            .field("din", din)
            .field("dout", dut.get("dout"))
            .build())
    }
}

/// Sparse shadow of the word store. Reads of never-written addresses
/// expect zero.
#[derive(Debug, Default)]
pub struct MemoryModel {
    shadow: HashMap<u64, u64>,
}

impl RefModel for MemoryModel {
    fn check(&mut self, txn: &Transaction) -> Result<Verdict, TbError> {
        let addr = txn.field("addr")?;
        if txn.field("wr")? & 1 == 1 {
            let _ = self.shadow.insert(addr, txn.field("din")?);
            return Ok(Verdict::Pass);
        }
        let expected = self.shadow.get(&addr).copied().unwrap_or(0);
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

/// The memory suite.
#[derive(Debug, Default)]
pub struct MemoryTb;

impl MemoryTb {
    /// Stage 0 picks the command, stage 1 picks address and data. `din`
    /// is left unconstrained: the shadow only consumes it on writes, and
    /// pinning it on reads would just waste solver attempts.
    pub fn schema() -> Result<Schema, TbError> {
        Schema::builder()
            .rand_staged("wr", 0..2, 0)
            .rand_staged("rd", 0..2, 0)
            .rand_staged("addr", 0..16, 1)
            .rand_staged("din", 0..256, 1)
            .constraint(Constraint::binary("wr", "rd", |wr, rd| wr != rd))
            .build()
    }
}

impl Testbench for MemoryTb {
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
            MemoryProtocol { ctx: ctx.clone() },
            stats.clone(),
        );
        let monitor = Monitor::new(
            dut.clone(),
            analysis.clone(),
            MemoryProtocol { ctx: ctx.clone() },
            stats.clone(),
        );
        let scoreboard = Scoreboard::new(analysis, event, MemoryModel::default(), stats.clone());

        let _ = ctx.spawn(memory_dut(dut.clone()));
        spawn_component(ctx, "DRV", driver.run());
        spawn_component(ctx, "MON", monitor.run());
        spawn_component(ctx, "SCO", scoreboard.run());
        Ok(ctx.spawn(generator.run()))
    }
}
