//! Solver resolution tests.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use veritb_core::common::TbError;
use veritb_core::crv::{Constraint, Schema, solve, solve_with};

#[test]
fn inequality_holds_over_many_resolutions() {
    let schema = Schema::builder()
        .rand("a", 0..16)
        .rand("b", 0..16)
        .constraint(Constraint::binary("a", "b", |a, b| a != b))
        .build()
        .unwrap();
    let mut rng = StdRng::seed_from_u64(0xA5);
    for _ in 0..1000 {
        let txn = solve(&schema, &mut rng).unwrap();
        let (a, b) = (txn.get("a").unwrap(), txn.get("b").unwrap());
        assert!(a < 16 && b < 16);
        assert_ne!(a, b);
    }
}

#[test]
fn sampling_is_roughly_uniform() {
    let schema = Schema::builder().rand("v", 0..10).build().unwrap();
    let mut rng = StdRng::seed_from_u64(7);
    let mut buckets = [0u32; 10];
    let total = 2000;
    for _ in 0..total {
        let v = solve(&schema, &mut rng).unwrap().get("v").unwrap();
        buckets[usize::try_from(v).unwrap()] += 1;
    }
    // Each value should land near 10% of draws; 5-point tolerance.
    for (value, count) in buckets.iter().enumerate() {
        let percent = f64::from(*count) * 100.0 / f64::from(total);
        assert!(
            (5.0..=15.0).contains(&percent),
            "value {value} drawn {percent:.1}% of the time"
        );
    }
}

#[test]
fn later_stage_sees_committed_earlier_stage() {
    let schema = Schema::builder()
        .rand_staged("hi", 0..2, 0)
        .rand_staged("val", 0..100, 1)
        .constraint(Constraint::binary("hi", "val", |hi, val| {
            if hi == 1 { val >= 50 } else { val < 50 }
        }))
        .build()
        .unwrap();
    let mut rng = StdRng::seed_from_u64(11);
    let (mut saw_hi, mut saw_lo) = (false, false);
    for _ in 0..200 {
        let txn = solve(&schema, &mut rng).unwrap();
        let (hi, val) = (txn.get("hi").unwrap(), txn.get("val").unwrap());
        if hi == 1 {
            assert!(val >= 50);
            saw_hi = true;
        } else {
            assert!(val < 50);
            saw_lo = true;
        }
    }
    assert!(saw_hi && saw_lo, "both halves of the split should occur");
}

#[test]
fn staged_range_selection_splits_ten_eighty_ten() {
    // Stage 0 picks a selector uniformly from ten values; stage 1 maps it
    // onto a low / middle / high range. The resolved `b` should land in
    // those ranges about 10% / 80% / 10% of the time.
    let schema = Schema::builder()
        .rand_staged("a", 0..10, 0)
        .rand_staged("b", 0..100, 1)
        .constraint(Constraint::binary("a", "b", |a, b| match a {
            0 => b < 10,
            9 => b >= 90,
            _ => (10..90).contains(&b),
        }))
        .build()
        .unwrap();
    let mut rng = StdRng::seed_from_u64(17);
    let (mut low, mut mid, mut high) = (0u32, 0u32, 0u32);
    let total = 2000;
    for _ in 0..total {
        let b = solve(&schema, &mut rng).unwrap().get("b").unwrap();
        match b {
            0..=9 => low += 1,
            10..=89 => mid += 1,
            _ => high += 1,
        }
    }
    let percent = |count: u32| f64::from(count) * 100.0 / f64::from(total);
    assert!((5.0..=15.0).contains(&percent(low)), "low {}%", percent(low));
    assert!(
        (75.0..=85.0).contains(&percent(mid)),
        "mid {}%",
        percent(mid)
    );
    assert!(
        (5.0..=15.0).contains(&percent(high)),
        "high {}%",
        percent(high)
    );
}

#[test]
fn cross_stage_constraint_waits_for_its_last_field() {
    // The constraint references a stage-1 field, so a stage-0 round must
    // commit without evaluating it.
    let schema = Schema::builder()
        .rand_staged("cmd", 0..2, 0)
        .rand_staged("data", 0..4, 1)
        .constraint(Constraint::binary("cmd", "data", |cmd, data| {
            cmd == 1 || data == 0
        }))
        .build()
        .unwrap();
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..200 {
        let txn = solve(&schema, &mut rng).unwrap();
        let (cmd, data) = (txn.get("cmd").unwrap(), txn.get("data").unwrap());
        assert!(cmd == 1 || data == 0);
    }
}

#[test]
fn unsatisfiable_reports_stage_and_budget() {
    let schema = Schema::builder()
        .rand("a", 0..4)
        .constraint(Constraint::unary("a", |a| a > 10))
        .build()
        .unwrap();
    let mut rng = StdRng::seed_from_u64(1);
    match solve_with(&schema, &mut rng, 25) {
        Err(TbError::Unsatisfiable { stage, attempts }) => {
            assert_eq!(stage, 0);
            assert_eq!(attempts, 25);
        }
        other => panic!("expected Unsatisfiable, got {other:?}"),
    }
}

#[test]
fn unsatisfiable_later_stage_identified() {
    let schema = Schema::builder()
        .rand_staged("a", [1], 0)
        .rand_staged("b", 0..4, 2)
        .constraint(Constraint::binary("a", "b", |a, b| b > 10 + a))
        .build()
        .unwrap();
    let mut rng = StdRng::seed_from_u64(1);
    match solve_with(&schema, &mut rng, 10) {
        Err(TbError::Unsatisfiable { stage, .. }) => assert_eq!(stage, 2),
        other => panic!("expected Unsatisfiable, got {other:?}"),
    }
}

#[test]
fn same_seed_replays_same_stimulus() {
    let build = || {
        Schema::builder()
            .rand("a", 0..256)
            .rand("b", 0..256)
            .constraint(Constraint::binary("a", "b", |a, b| a != b))
            .build()
            .unwrap()
    };
    let (schema_x, schema_y) = (build(), build());
    let mut rng_x = StdRng::seed_from_u64(99);
    let mut rng_y = StdRng::seed_from_u64(99);
    for _ in 0..50 {
        let x = solve(&schema_x, &mut rng_x).unwrap();
        let y = solve(&schema_y, &mut rng_y).unwrap();
        assert_eq!(x, y);
    }
}

#[test]
fn single_value_domain_resolves_immediately() {
    let schema = Schema::builder().rand("k", [42]).build().unwrap();
    let mut rng = StdRng::seed_from_u64(0);
    let txn = solve_with(&schema, &mut rng, 1).unwrap();
    assert_eq!(txn.get("k"), Some(42));
}

proptest! {
    #[test]
    fn resolved_values_stay_in_domain(seed in any::<u64>()) {
        let schema = Schema::builder()
            .rand("a", 0..16)
            .rand_staged("b", [3, 9, 27], 1)
            .build()
            .unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        let txn = solve(&schema, &mut rng).unwrap();
        prop_assert!(txn.get("a").unwrap() < 16);
        prop_assert!([3, 9, 27].contains(&txn.get("b").unwrap()));
    }
}
