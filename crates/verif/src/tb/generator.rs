//! Constrained-random stimulus generator.

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::common::TbError;
use crate::config::Config;
use crate::crv::{Schema, Transaction, solve_with};
use crate::exec::{Event, Queue};
use crate::stats::Stats;

/// Produces `count` randomized transactions, one credit at a time.
///
/// After each `put` the generator waits for the paired consumer (the
/// scoreboard) to signal the rendezvous event, then clears it — so at most
/// one unacknowledged transaction is ever in flight.
#[derive(Debug)]
pub struct Generator {
    schema: Schema,
    queue: Queue<Transaction>,
    event: Event,
    stats: Stats,
    count: u32,
    max_attempts: u32,
    rng: StdRng,
}

impl Generator {
    /// Wires a generator to its stimulus queue and credit event.
    ///
    /// The event is cleared here so a latched signal from a previous run
    /// cannot hand out a free credit.
    pub fn new(
        schema: Schema,
        queue: Queue<Transaction>,
        event: Event,
        stats: Stats,
        config: &Config,
    ) -> Self {
        event.clear();
        Self {
            schema,
            queue,
            event,
            stats,
            count: config.test.count,
            max_attempts: config.solver.max_attempts,
            rng: StdRng::seed_from_u64(config.test.seed),
        }
    }

    /// Generation loop: solve, enqueue, wait for credit, repeat.
    ///
    /// # Errors
    ///
    /// An unsatisfiable schema aborts the loop immediately; the error
    /// surfaces through this task's join handle to the environment.
    pub async fn run(mut self) -> Result<(), TbError> {
        for index in 0..self.count {
            let txn = solve_with(&self.schema, &mut self.rng, self.max_attempts)?;
            tracing::info!(component = "GEN", index, %txn, "generated");
            self.stats.record_generated();
            self.queue.put(txn).await;
            self.event.wait().await;
            self.event.clear();
        }
        tracing::info!(component = "GEN", count = self.count, "generation complete");
        Ok(())
    }
}
