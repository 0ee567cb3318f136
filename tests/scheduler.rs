//! Crate-level scenario tests (S1–S6), exercised through the public
//! `Schedule` API rather than individual module internals — the
//! integration-test counterpart to the in-module unit tests.

use std::collections::HashMap;
use std::sync::Arc;

use tdpos_scheduler::testutil::FakeLedger;
use tdpos_scheduler::{schedule, Address, ScheduleConfig, Schedule};

fn cfg() -> ScheduleConfig {
    ScheduleConfig::new(3000, 10, 2, 1000, 60000, 0, true).unwrap()
}

fn seed_ballots(ledger: &FakeLedger, candidates: &[(&str, i64)]) -> i64 {
    let mut nominate = serde_json::Map::new();
    let mut updates = Vec::new();
    for (addr, ballots) in candidates {
        nominate.insert(addr.to_string(), serde_json::json!({}));
        let votes: HashMap<&str, i64> = [("voter", *ballots)].into_iter().collect();
        updates.push(("tdpos", format!("vote_{addr}").into_bytes(), serde_json::to_vec(&votes).unwrap()));
    }
    updates.push(("tdpos", b"nominate".to_vec(), serde_json::to_vec(&nominate).unwrap()));
    ledger.push_block_with_state(Vec::<u8>::new(), updates)
}

#[test]
fn s1_time_math_boundary() {
    let config = ScheduleConfig::new(3000, 10, 4, 1000, 60000, 0, true).unwrap();
    assert_eq!(schedule(&config, 0).term, 1);
    assert_eq!(schedule(&config, 0).pos, 0);
    assert_eq!(schedule(&config, 0).block_pos, 1);
    assert_eq!(schedule(&config, 27_999).block_pos, 10);
    assert_eq!(schedule(&config, 28_000).pos, 1);
    assert_eq!(schedule(&config, 171_000).term, 2);
}

#[test]
fn s2_bootstrap_before_any_cache_entry() {
    let ledger = Arc::new(FakeLedger::new());
    let schedule = Schedule::new(cfg(), ledger, Address::from("self"), vec![Address::from("a"), Address::from("b")]);

    assert_eq!(schedule.get_validators(3), Some(vec![Address::from("a"), Address::from("b")]));
}

#[test]
fn s3_latency_window_then_rotation() {
    let ledger = Arc::new(FakeLedger::new());
    let schedule = Schedule::new(
        cfg(),
        ledger.clone(),
        Address::from("self"),
        vec![Address::from("old1"), Address::from("old2")],
    );

    while ledger.tip_height() < 47 {
        ledger.push_block(Vec::<u8>::new());
    }
    seed_ballots(&ledger, &[("new1", 10), ("new2", 5)]);
    while ledger.tip_height() < 50 {
        ledger.push_block(Vec::<u8>::new());
    }

    assert_eq!(
        schedule.get_validators(49),
        Some(vec![Address::from("old1"), Address::from("old2")])
    );
    assert_eq!(
        schedule.get_validators(51),
        Some(vec![Address::from("new1"), Address::from("new2")])
    );
}

#[test]
fn s4_top_k_tie_break_is_deterministic() {
    let ledger = FakeLedger::new();
    let commit_height = seed_ballots(&ledger, &[("dave", 10), ("alice", 10), ("bob", 5), ("carl", 5)]);
    let schedule = Schedule::new(cfg(), Arc::new(ledger), Address::from("self"), Vec::new());

    assert_eq!(
        schedule.get_validators(commit_height + 3),
        Some(vec![Address::from("alice"), Address::from("dave")])
    );
}

#[test]
fn s5_cache_eviction_via_repeated_queries() {
    let ledger = FakeLedger::new();
    for h in 0..160i64 {
        let _ = seed_ballots(&ledger, &[("a", (h % 7) + 1), ("b", (h % 5) + 1)]);
    }
    let schedule = Schedule::new(cfg(), Arc::new(ledger), Address::from("self"), Vec::new());

    for round in 4..160 {
        assert!(schedule.get_validators(round).is_some());
    }
}

#[test]
fn s6_historical_leader_ignores_wall_clock() {
    let ledger = FakeLedger::new();
    ledger.push_block(Address::from("block-1-proposer"));
    ledger.push_block(Address::from("block-2-proposer"));
    let schedule =
        Schedule::new(cfg(), Arc::new(ledger), Address::from("self"), vec![Address::from("a"), Address::from("b")]);

    assert_eq!(schedule.get_leader(1), Some(Address::from("block-1-proposer")));
    assert_eq!(schedule.get_leader(2), Some(Address::from("block-2-proposer")));
}
