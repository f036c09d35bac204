//! Replacement Policy Tests.
//!
//! Verifies the PLRU tree walk and update, the per-set PLRU policy, and the
//! free-running LFSR policy. Each policy implements `ReplacementPolicy` with
//! `update(set, way)` and `get_victim(set) -> usize`.

use proptest::prelude::*;
use rstest::rstest;
use rvsim_tlb::core::units::cache::policies::{
    Lfsr, LfsrPolicy, Plru, PlruPolicy, ReplacementPolicy, lfsr::LFSR_POLY_24,
};

// ══════════════════════════════════════════════════════════
// 1. PLRU tree
// ══════════════════════════════════════════════════════════

#[rstest]
#[case(0)]
#[case(3)]
#[case(128)]
fn plru_rejects_bad_associativity(#[case] ways: usize) {
    assert!(Plru::new(ways).is_err());
}

#[test]
fn plru_reset_tree_points_at_way_zero() {
    let tree = Plru::new(8).unwrap();
    assert_eq!(tree.lru(), 0);
    assert_eq!(tree.tree_bits(), 0);
    assert_eq!(tree.ways(), 8);
}

/// Filling from reset visits 0, 2, 1, 3: each access flips the root away.
#[test]
fn plru_four_way_fill_order() {
    let mut tree = Plru::new(4).unwrap();
    let mut order = Vec::new();
    for _ in 0..4 {
        let victim = tree.lru();
        order.push(victim);
        tree.access(victim);
    }
    assert_eq!(order, vec![0, 2, 1, 3]);
    // After a full sweep the tree is back to pointing at way 0.
    assert_eq!(tree.lru(), 0);
}

#[test]
fn plru_access_sets_complement_of_path() {
    let mut tree = Plru::new(4).unwrap();
    // Way 3 = path "11": root and node 2 are cleared (point at the 0 side).
    tree.access(0);
    tree.access(3);
    assert_eq!(tree.tree_bits() & 0b001, 0);
    assert_eq!(tree.tree_bits() & 0b100, 0);
    // Node 1 still remembers the access to way 0.
    assert_eq!(tree.tree_bits() & 0b010, 0b010);
    assert_eq!(tree.lru(), 1);
}

#[test]
fn plru_two_way_is_true_lru() {
    let mut tree = Plru::new(2).unwrap();
    tree.access(1);
    assert_eq!(tree.lru(), 0);
    tree.access(0);
    assert_eq!(tree.lru(), 1);
    tree.access(0);
    assert_eq!(tree.lru(), 1);
}

#[test]
fn plru_evaluate_reports_lru_before_update() {
    let mut tree = Plru::new(4).unwrap();
    assert_eq!(tree.evaluate(0, true), 0);
    assert_eq!(tree.evaluate(0, false), 2);
    assert_eq!(tree.lru(), 2);
}

#[test]
fn plru_single_way_always_zero() {
    let mut tree = Plru::new(1).unwrap();
    tree.access(0);
    assert_eq!(tree.lru(), 0);
}

proptest! {
    /// After any access history, the way just accessed is never the LRU.
    #[test]
    fn plru_last_access_is_never_lru(
        log_ways in 1u32..=6,
        history in prop::collection::vec(any::<usize>(), 1..64),
    ) {
        let ways = 1usize << log_ways;
        let mut tree = Plru::new(ways).unwrap();
        for way in history {
            let way = way % ways;
            tree.access(way);
            prop_assert_ne!(tree.lru(), way);
            prop_assert!(tree.lru() < ways);
        }
    }

    /// From reset, filling victims visits every way before any repeats.
    #[test]
    fn plru_fill_sweep_is_a_permutation(log_ways in 0u32..=6) {
        let ways = 1usize << log_ways;
        let mut tree = Plru::new(ways).unwrap();
        let mut seen = vec![false; ways];
        for _ in 0..ways {
            let victim = tree.lru();
            prop_assert!(!seen[victim]);
            seen[victim] = true;
            tree.access(victim);
        }
    }
}

// ══════════════════════════════════════════════════════════
// 2. PLRU policy
// ══════════════════════════════════════════════════════════

#[test]
fn plru_policy_sets_are_independent() {
    let mut policy = PlruPolicy::new(2, 4).unwrap();
    policy.update(0, 0);
    assert_eq!(policy.get_victim(0), 2);
    assert_eq!(policy.get_victim(1), 0);
    assert_eq!(policy.tree(1).unwrap().tree_bits(), 0);
    assert!(policy.tree(2).is_none());
}

#[test]
fn plru_policy_reset_clears_all_trees() {
    let mut policy = PlruPolicy::new(4, 4).unwrap();
    for set in 0..4 {
        policy.update(set, 1);
    }
    policy.reset();
    for set in 0..4 {
        assert_eq!(policy.get_victim(set), 0);
    }
}

// ══════════════════════════════════════════════════════════
// 3. LFSR
// ══════════════════════════════════════════════════════════

#[test]
fn lfsr_default_polynomial_is_24_bits() {
    let lfsr = Lfsr::new(LFSR_POLY_24).unwrap();
    assert_eq!(lfsr.width(), 24);
    assert_eq!(lfsr.state(), 1);
}

#[test]
fn lfsr_rejects_empty_polynomial() {
    assert!(Lfsr::new(&[]).is_err());
    assert!(Lfsr::new(&[65]).is_err());
}

#[test]
fn lfsr_shifts_feedback_into_bit_zero() {
    let mut lfsr = Lfsr::new(LFSR_POLY_24).unwrap();
    // Seed 1: only bit 0 is set, no tap reads it, so the register shifts.
    lfsr.advance();
    assert_eq!(lfsr.state(), 0b10);
    for _ in 0..15 {
        lfsr.advance();
    }
    // Bit 16 is now set: tap 17 feeds back a one.
    assert_eq!(lfsr.state(), 1 << 16);
    lfsr.advance();
    assert_eq!(lfsr.state(), (1 << 17) | 1);
}

#[test]
fn lfsr_policy_ignores_access_history() {
    let mut policy = LfsrPolicy::new(4).unwrap();
    let before = policy.get_victim(0);
    policy.update(0, before);
    assert_eq!(policy.get_victim(0), before);
    assert_eq!(policy.get_victim(3), before);
}

#[test]
fn lfsr_policy_advances_per_tick_and_resets_to_seed() {
    let mut policy = LfsrPolicy::new(4).unwrap();
    assert_eq!(policy.get_victim(0), 1);
    policy.tick();
    assert_eq!(policy.get_victim(0), 2);
    policy.tick();
    assert_eq!(policy.get_victim(0), 0);
    policy.reset();
    assert_eq!(policy.lfsr().state(), 1);
}

proptest! {
    #[test]
    fn lfsr_victim_always_in_range(ticks in 0usize..2000, log_ways in 0u32..=6) {
        let ways = 1usize << log_ways;
        let mut policy = LfsrPolicy::new(ways).unwrap();
        for _ in 0..ticks {
            policy.tick();
        }
        prop_assert!(policy.get_victim(0) < ways);
        prop_assert_ne!(policy.lfsr().state(), 0);
    }
}
