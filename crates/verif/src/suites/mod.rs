//! Bundled testbench suites.
//!
//! Five complete environments, one per device family the framework is
//! exercised against:
//! 1. **Adder:** registered two-input adder; arithmetic reference model.
//! 2. **Dff:** D flip-flop; previous-value reference model.
//! 3. **Fifo:** synchronous FIFO with read/write strobes; ordered-list
//!    shadow model.
//! 4. **Memory:** word-addressed register file; map shadow model with a
//!    defined read-before-write default.
//! 5. **Serial:** bit-serial link with a `newd` strobe and chip-select
//!    framing; MSB-first or LSB-first shift reconstruction.
//!
//! Each suite bundles a schema, a [`Protocol`](crate::tb::Protocol)
//! implementation shared by its driver and monitor, a
//! [`RefModel`](crate::tb::RefModel), and a behavioral device model task.

use std::fmt;
use std::str::FromStr;

use crate::common::TbError;
use crate::config::Config;
use crate::tb::{Environment, RunReport};

/// Registered adder testbench.
pub mod adder;
/// D flip-flop testbench.
pub mod dff;
/// Synchronous FIFO testbench.
pub mod fifo;
/// Register-file memory testbench.
pub mod memory;
/// Bit-serial link testbench.
pub mod serial;

pub use adder::AdderTb;
pub use dff::DffTb;
pub use fifo::FifoTb;
pub use memory::MemoryTb;
pub use serial::{BitOrder, SerialTb};

/// Selects one of the bundled suites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuiteKind {
    /// Registered adder.
    Adder,
    /// D flip-flop.
    Dff,
    /// Synchronous FIFO.
    Fifo,
    /// Register-file memory.
    Memory,
    /// Bit-serial link (12-bit, MSB-first).
    Serial,
}

impl SuiteKind {
    /// Every bundled suite, in reporting order.
    pub const ALL: [Self; 5] = [
        Self::Adder,
        Self::Dff,
        Self::Fifo,
        Self::Memory,
        Self::Serial,
    ];

    /// The suite's name as accepted on the command line.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Adder => "adder",
            Self::Dff => "dff",
            Self::Fifo => "fifo",
            Self::Memory => "memory",
            Self::Serial => "serial",
        }
    }
}

impl fmt::Display for SuiteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SuiteKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| format!("unknown suite `{s}` (expected adder|dff|fifo|memory|serial)"))
    }
}

/// Builds a fresh environment and runs the selected suite to completion.
///
/// # Errors
///
/// Schema and solver errors from the suite's generator.
pub fn run_suite(kind: SuiteKind, config: &Config) -> Result<RunReport, TbError> {
    let mut env = Environment::new(config.clone());
    match kind {
        SuiteKind::Adder => env.run(&mut AdderTb),
        SuiteKind::Dff => env.run(&mut DffTb),
        SuiteKind::Fifo => env.run(&mut FifoTb),
        SuiteKind::Memory => env.run(&mut MemoryTb),
        SuiteKind::Serial => env.run(&mut SerialTb::spi()),
    }
}
