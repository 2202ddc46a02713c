// Property-based tests for connection resolution invariants.
//
// 1. Reconciliation: disjoint sets union exactly, agreeing overlaps merge,
//    disagreeing overlaps always conflict
// 2. Ownership: the owner is the longest common segment prefix, and grouping
//    does not depend on insertion order or parallel scheduling
//
// Uses proptest with explicit configuration to keep case counts bounded.

use proptest::prelude::*;
use wiring_core::namespace::NamespacePath;
use wiring_core::wiring::{assign_owners, assign_owners_parallel, reconcile, ConnectionMap};
use wiring_core::WiringError;

// ── Generators ──────────────────────────────────────────────────────────────

/// Paths of 1-4 segments drawn from a tiny alphabet, so prefixes collide often.
fn arb_path() -> impl Strategy<Value = String> {
    prop::collection::vec(prop_oneof![Just("A"), Just("B"), Just("C"), Just("x")], 1..=4)
        .prop_map(|segs| segs.join(":"))
}

fn arb_connections() -> impl Strategy<Value = ConnectionMap> {
    prop::collection::btree_map(arb_path(), arb_path(), 0..24)
}

fn config() -> ProptestConfig {
    ProptestConfig { cases: 128, ..ProptestConfig::default() }
}

// ── Reconciliation ──────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(config())]

    #[test]
    fn disjoint_sets_reconcile_to_their_union(all in arb_connections(), split in 0usize..24) {
        let mut explicit = ConnectionMap::new();
        let mut implicit = ConnectionMap::new();
        for (i, (t, s)) in all.iter().enumerate() {
            if i < split { explicit.insert(t.clone(), s.clone()); } else { implicit.insert(t.clone(), s.clone()); }
        }
        prop_assert_eq!(reconcile(&explicit, &implicit).unwrap(), all);
    }

    #[test]
    fn agreeing_overlap_merges(conns in arb_connections()) {
        prop_assert_eq!(reconcile(&conns, &conns).unwrap(), conns);
    }

    #[test]
    fn disagreeing_overlap_conflicts(target in arb_path(), a in arb_path(), b in arb_path()) {
        prop_assume!(a != b);
        let explicit: ConnectionMap = [(target.clone(), a.clone())].into_iter().collect();
        let implicit: ConnectionMap = [(target.clone(), b.clone())].into_iter().collect();
        let err = reconcile(&explicit, &implicit).unwrap_err();
        prop_assert_eq!(err, WiringError::Conflict { target, explicit: a, implicit: b });
    }
}

// ── Ownership ───────────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(config())]

    #[test]
    fn owner_is_longest_common_prefix(conns in arb_connections()) {
        let owners = assign_owners(&conns, ':');
        for (target, source) in &conns {
            let owner = NamespacePath::parse(owners.owner_of(target).unwrap(), ':');
            let tgt = NamespacePath::parse(target, ':');
            let src = NamespacePath::parse(source, ':');
            let n = owner.depth();
            prop_assert_eq!(&tgt.segments()[..n], owner.segments());
            prop_assert_eq!(&src.segments()[..n], owner.segments());
            // The next segment diverges, or one path has ended.
            prop_assert!(tgt.segments().get(n).is_none()
                || src.segments().get(n).is_none()
                || tgt.segments()[n] != src.segments()[n]);
        }
    }

    #[test]
    fn every_target_owned_exactly_once(conns in arb_connections()) {
        let owners = assign_owners(&conns, ':');
        let total: usize = owners.iter().map(|(_, targets)| targets.len()).sum();
        prop_assert_eq!(total, conns.len());
    }

    #[test]
    fn grouping_ignores_insertion_order_and_scheduling(conns in arb_connections()) {
        let reversed: ConnectionMap = conns.iter().rev().map(|(t, s)| (t.clone(), s.clone())).collect();
        let sequential = assign_owners(&conns, ':');
        prop_assert_eq!(&assign_owners(&reversed, ':'), &sequential);
        prop_assert_eq!(&assign_owners_parallel(&conns, ':'), &sequential);
    }
}
