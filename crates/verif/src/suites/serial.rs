//! Bit-serial link testbench.
//!
//! The driver loads a parallel word with a one-cycle `newd` strobe. The
//! device pulls `cs` low, shifts the word out on `mosi` one bit per clock,
//! then raises `cs`. The monitor reconstructs the word in wire order
//! (first bit most significant), so an LSB-first device shows up as a
//! bit-reversed word and the reference model reverses its expectation.
//!
//! The frame-end wait is bounded: a device that never raises `cs` turns
//! into a [`TbError::EdgeTimeout`] instead of a silent hang.

use crate::common::TbError;
use crate::config::Config;
use crate::crv::{Schema, Transaction};
use crate::dut::Dut;
use crate::exec::{Event, JoinHandle, Queue, SimCtx, timeout};
use crate::stats::Stats;
use crate::tb::{
    Driver, Generator, Monitor, Protocol, RefModel, Scoreboard, Testbench, Verdict,
    spawn_component,
};

/// Shift direction of the serial frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitOrder {
    /// Most significant bit leaves the device first.
    MsbFirst,
    /// Least significant bit leaves the device first.
    LsbFirst,
}

/// Reverses the low `width` bits of `value`.
const fn reverse_low_bits(value: u64, width: u32) -> u64 {
    value.reverse_bits() >> (64 - width)
}

/// Behavioral serializer. Idle with `cs` high; a `newd` strobe latches
/// `data` and starts a `width`-bit frame, one bit per rising edge.
async fn serial_dut(dut: Dut, width: u32, order: BitOrder) {
    let mut shreg: u64 = 0;
    let mut remaining: u32 = 0;
    dut.set("cs", 1);
    loop {
        dut.rising_edge("clk").await;
        if dut.get("rst") & 1 == 1 {
            dut.set("cs", 1);
            remaining = 0;
            continue;
        }
        if remaining > 0 {
            let bit = match order {
                BitOrder::MsbFirst => (shreg >> (remaining - 1)) & 1,
                BitOrder::LsbFirst => {
                    let bit = shreg & 1;
                    shreg >>= 1;
                    bit
                }
            };
            dut.set("mosi", bit);
            remaining -= 1;
        } else if dut.get("cs") == 0 {
            // Last bit held through the previous cycle; frame is over.
            dut.set("cs", 1);
        } else if dut.get("newd") & 1 == 1 {
            shreg = dut.get("data");
            remaining = width;
            dut.set("cs", 0);
        }
    }
}

#[derive(Debug, Clone)]
struct SerialProtocol {
    ctx: SimCtx,
    width: u32,
    period_ns: u64,
}

impl Protocol for SerialProtocol {
    async fn drive(&mut self, dut: &Dut, txn: &Transaction) -> Result<(), TbError> {
        dut.falling_edge("clk").await;
        dut.set("data", txn.field("data")?);
        dut.set("newd", 1);
        dut.rising_edge("clk").await;
        dut.falling_edge("clk").await;
        dut.set("newd", 0);
        let waited_ns = u64::from(self.width + 8) * self.period_ns;
        timeout(&self.ctx, waited_ns, dut.rising_edge("cs"))
            .await
            .map_err(|_| TbError::EdgeTimeout {
                signal: "cs".to_string(),
                waited_ns,
            })
    }

    async fn sample(&mut self, dut: &Dut) -> Result<Transaction, TbError> {
        dut.falling_edge("cs").await;
        let data = dut.get("data");
        let mut word: u64 = 0;
        for _ in 0..self.width {
            dut.rising_edge("clk").await;
            dut.falling_edge("clk").await;
            self.ctx.delay(1).await;
            word = (word << 1) | (dut.get("mosi") & 1);
        }
        Ok(Transaction::builder()
            .field("data", data)
            .field("rx", word)
            .build())
    }
}

/// Expects the shifted-out word to match the loaded one, bit-reversed for
/// LSB-first devices.
#[derive(Debug)]
struct SerialModel {
    width: u32,
    order: BitOrder,
}

impl RefModel for SerialModel {
    fn check(&mut self, txn: &Transaction) -> Result<Verdict, TbError> {
        let data = txn.field("data")?;
        let expected = match self.order {
            BitOrder::MsbFirst => data,
            BitOrder::LsbFirst => reverse_low_bits(data, self.width),
        };
        let observed = txn.field("rx")?;
        if observed == expected {
            Ok(Verdict::Pass)
        } else {
            Ok(Verdict::Fail {
                field: "rx".to_string(),
                expected,
                observed,
            })
        }
    }
}

/// The serial link suite, parameterized over frame width and shift order.
#[derive(Debug, Clone, Copy)]
pub struct SerialTb {
    width: u32,
    order: BitOrder,
}

impl SerialTb {
    /// A 12-bit MSB-first frame, the SPI-style default.
    pub const fn spi() -> Self {
        Self {
            width: 12,
            order: BitOrder::MsbFirst,
        }
    }

    /// An 8-bit LSB-first frame, UART-style.
    pub const fn uart() -> Self {
        Self {
            width: 8,
            order: BitOrder::LsbFirst,
        }
    }

    /// One word spanning the full frame width.
    pub fn schema(&self) -> Result<Schema, TbError> {
        Schema::builder()
            .rand("data", 0..(1u64 << self.width))
            .build()
    }
}

impl Testbench for SerialTb {
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

        let protocol = SerialProtocol {
            ctx: ctx.clone(),
            width: self.width,
            period_ns: config.clock.period_ns,
        };
        let generator = Generator::new(
            self.schema()?,
            stimulus.clone(),
            event.clone(),
            stats.clone(),
            config,
        );
        let driver = Driver::new(stimulus, dut.clone(), protocol.clone(), stats.clone());
        let monitor = Monitor::new(dut.clone(), analysis.clone(), protocol, stats.clone());
        let scoreboard = Scoreboard::new(
            analysis,
            event,
            SerialModel {
                width: self.width,
                order: self.order,
            },
            stats.clone(),
        );

        let _ = ctx.spawn(serial_dut(dut.clone(), self.width, self.order));
        spawn_component(ctx, "DRV", driver.run());
        spawn_component(ctx, "MON", monitor.run());
        spawn_component(ctx, "SCO", scoreboard.run());
        Ok(ctx.spawn(generator.run()))
    }
}
