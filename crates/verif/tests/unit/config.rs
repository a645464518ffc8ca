//! # Configuration Tests
//!
//! Defaults, partial JSON deserialization, and flag-style overrides.

use pretty_assertions::assert_eq;
use veritb_core::config::Config;

#[test]
fn default_values() {
    let config = Config::default();
    assert_eq!(config.clock.period_ns, 10);
    assert_eq!(config.test.count, 10);
    assert_eq!(config.test.seed, 1);
    assert_eq!(config.test.run_ns, 20_000);
    assert_eq!(config.test.reset_cycles, 5);
    assert_eq!(config.solver.max_attempts, 1000);
}

#[test]
fn empty_json_is_all_defaults() {
    let config: Config = serde_json::from_str("{}").unwrap();
    assert_eq!(config.clock.period_ns, 10);
    assert_eq!(config.test.count, 10);
    assert_eq!(config.solver.max_attempts, 1000);
}

#[test]
fn partial_section_keeps_sibling_defaults() {
    let config: Config = serde_json::from_str(r#"{ "test": { "seed": 42 } }"#).unwrap();
    assert_eq!(config.test.seed, 42);
    assert_eq!(config.test.count, 10);
    assert_eq!(config.test.run_ns, 20_000);
    assert_eq!(config.clock.period_ns, 10);
}

#[test]
fn full_document_round_trip() {
    let text = r#"{
        "clock":  { "period_ns": 4 },
        "test":   { "count": 100, "seed": 7, "run_ns": 80000, "reset_cycles": 2 },
        "solver": { "max_attempts": 50 }
    }"#;
    let config: Config = serde_json::from_str(text).unwrap();
    assert_eq!(config.clock.period_ns, 4);
    assert_eq!(config.test.count, 100);
    assert_eq!(config.test.seed, 7);
    assert_eq!(config.test.run_ns, 80_000);
    assert_eq!(config.test.reset_cycles, 2);
    assert_eq!(config.solver.max_attempts, 50);
}
