//! Test harness utilities.

use std::future::Future;

use veritb_core::config::Config;
use veritb_core::exec::Scheduler;

/// Initializes tracing for a test; repeated calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("info")
        .with_test_writer()
        .try_init();
}

/// Runs a future to completion on a fresh scheduler and returns its output.
///
/// Only suitable for futures that actually finish: anything that spawns a
/// free-running clock never goes quiescent.
pub fn block_on<T, F>(future: F) -> T
where
    T: 'static,
    F: Future<Output = T> + 'static,
{
    let mut scheduler = Scheduler::new();
    let handle = scheduler.ctx().spawn(future);
    scheduler.run();
    handle.try_take().expect("future did not run to completion")
}

/// A small, fast configuration for end-to-end suite runs.
pub fn test_config(seed: u64) -> Config {
    let mut config = Config::default();
    config.test.seed = seed;
    config.test.count = 20;
    config.test.run_ns = 50_000;
    config
}
