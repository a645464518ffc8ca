//! Testbench suite runner CLI.
//!
//! This binary is the entry point for the bundled verification suites. It
//! performs:
//! 1. **Run:** execute one suite (or all of them) against a configuration
//!    assembled from defaults, an optional JSON file, and flag overrides.
//! 2. **List:** print the bundled suite names.
//!
//! Exit code is 0 only when every selected suite drained cleanly with zero
//! failed comparisons.

use std::collections::BTreeMap;
use std::str::FromStr;
use std::{fs, process};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use veritb_core::config::Config;
use veritb_core::suites::{SuiteKind, run_suite};
use veritb_core::tb::RunReport;

#[derive(Parser, Debug)]
#[command(
    name = "veritb",
    author,
    version,
    about = "Constrained-random testbench runner",
    long_about = "Run the bundled transaction-level verification suites.\n\nExamples:\n  veritb run adder\n  veritb run all --seed 7 --count 100\n  veritb run fifo --config bench.json --json"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run one bundled suite, or `all`.
    Run {
        /// Suite name: adder, dff, fifo, memory, serial, or all.
        #[arg(default_value = "all")]
        suite: String,

        /// JSON configuration file; flags below override its values.
        #[arg(short, long)]
        config: Option<String>,

        /// Random seed for the stimulus generator.
        #[arg(long)]
        seed: Option<u64>,

        /// Transactions to generate per suite.
        #[arg(long)]
        count: Option<u32>,

        /// Simulated-time budget in nanoseconds.
        #[arg(long)]
        run_ns: Option<u64>,

        /// Emit the run reports as a JSON object on stdout.
        #[arg(long)]
        json: bool,
    },

    /// List the bundled suite names.
    List,
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            suite,
            config,
            seed,
            count,
            run_ns,
            json,
        } => cmd_run(&suite, config.as_deref(), seed, count, run_ns, json),
        Commands::List => {
            for kind in SuiteKind::ALL {
                println!("{kind}");
            }
        }
    }
}

/// Runs the selected suites and exits non-zero on any failure.
fn cmd_run(
    suite: &str,
    config_path: Option<&str>,
    seed: Option<u64>,
    count: Option<u32>,
    run_ns: Option<u64>,
    json: bool,
) {
    let mut config = load_config(config_path);
    if let Some(seed) = seed {
        config.test.seed = seed;
    }
    if let Some(count) = count {
        config.test.count = count;
    }
    if let Some(run_ns) = run_ns {
        config.test.run_ns = run_ns;
    }

    let kinds: Vec<SuiteKind> = if suite == "all" {
        SuiteKind::ALL.to_vec()
    } else {
        match SuiteKind::from_str(suite) {
            Ok(kind) => vec![kind],
            Err(message) => {
                eprintln!("Error: {message}");
                process::exit(2);
            }
        }
    };

    let mut reports: BTreeMap<&'static str, RunReport> = BTreeMap::new();
    let mut all_pass = true;
    for kind in kinds {
        tracing::info!(suite = %kind, seed = config.test.seed, "starting suite");
        match run_suite(kind, &config) {
            Ok(report) => {
                all_pass &= report.is_pass();
                let _ = reports.insert(kind.name(), report);
            }
            Err(error) => {
                tracing::error!(suite = %kind, %error, "suite aborted");
                all_pass = false;
            }
        }
    }

    if json {
        match serde_json::to_string_pretty(&reports) {
            Ok(out) => println!("{out}"),
            Err(error) => {
                eprintln!("Error serializing reports: {error}");
                process::exit(1);
            }
        }
    } else {
        for (name, report) in &reports {
            let verdict = if report.is_pass() { "PASS" } else { "FAIL" };
            println!(
                "{name:<8} {verdict}  {} generated, {} passed, {} failed, {} ignored, {} ns",
                report.stats.generated,
                report.stats.passed,
                report.stats.failed,
                report.stats.ignored,
                report.sim_time_ns
            );
        }
    }

    if !all_pass {
        process::exit(1);
    }
}

/// Builds the run configuration: defaults, then the JSON file if given.
fn load_config(path: Option<&str>) -> Config {
    let Some(path) = path else {
        return Config::default();
    };
    let text = fs::read_to_string(path).unwrap_or_else(|error| {
        eprintln!("Error reading config {path}: {error}");
        process::exit(2);
    });
    serde_json::from_str(&text).unwrap_or_else(|error| {
        eprintln!("Error parsing config {path}: {error}");
        process::exit(2);
    })
}
