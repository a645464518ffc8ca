//! Run statistics collection and reporting.
//!
//! This module tracks aggregate counters for a testbench run. It provides:
//! 1. **Counters:** transactions generated, driven, observed, and the
//!    scoreboard's pass/fail/ignored comparison outcomes.
//! 2. **Sharing:** a cheap cloneable [`Stats`] handle each pipeline
//!    component bumps as it works.
//! 3. **Reporting:** an end-of-run summary logged at the appropriate level.

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;

/// Aggregate counters for one run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TbStats {
    /// Transactions produced by the generator.
    pub generated: u64,
    /// Transactions applied to the device by the driver.
    pub driven: u64,
    /// Transactions assembled by the monitor.
    pub observed: u64,
    /// Comparisons where observed matched expected.
    pub passed: u64,
    /// Comparisons where observed differed from expected.
    pub failed: u64,
    /// Observations the reference model could not judge (e.g. a read from
    /// an empty FIFO shadow).
    pub ignored: u64,
}

impl TbStats {
    /// Total comparisons the scoreboard performed.
    pub fn compared(&self) -> u64 {
        self.passed + self.failed + self.ignored
    }

    /// `true` when no comparison failed.
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Logs the end-of-run summary; failures log at error level.
    pub fn report(&self) {
        if self.failed == 0 {
            tracing::info!(
                generated = self.generated,
                driven = self.driven,
                observed = self.observed,
                passed = self.passed,
                ignored = self.ignored,
                "run complete: all comparisons passed"
            );
        } else {
            tracing::error!(
                generated = self.generated,
                driven = self.driven,
                observed = self.observed,
                passed = self.passed,
                failed = self.failed,
                ignored = self.ignored,
                "run complete: comparisons FAILED"
            );
        }
    }
}

/// A shared handle to one run's counters.
#[derive(Debug, Clone, Default)]
pub struct Stats {
    inner: Rc<RefCell<TbStats>>,
}

impl Stats {
    /// Fresh counters, all zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one generated transaction.
    pub fn record_generated(&self) {
        self.inner.borrow_mut().generated += 1;
    }

    /// Records one driven transaction.
    pub fn record_driven(&self) {
        self.inner.borrow_mut().driven += 1;
    }

    /// Records one observed transaction.
    pub fn record_observed(&self) {
        self.inner.borrow_mut().observed += 1;
    }

    /// Records a passing comparison.
    pub fn record_pass(&self) {
        self.inner.borrow_mut().passed += 1;
    }

    /// Records a failing comparison.
    pub fn record_fail(&self) {
        self.inner.borrow_mut().failed += 1;
    }

    /// Records a comparison the model could not judge.
    pub fn record_ignored(&self) {
        self.inner.borrow_mut().ignored += 1;
    }

    /// A copy of the counters as they stand now.
    pub fn snapshot(&self) -> TbStats {
        self.inner.borrow().clone()
    }
}
