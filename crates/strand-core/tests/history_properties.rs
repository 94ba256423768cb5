// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
use proptest::prelude::*;
use strand_core::{at_time, decompose, materialize, Store};

mod common;
use common::{rows_for, run_store, snapshot_sequences, union};

proptest! {
    #![proptest_config(ProptestConfig { cases: 128, ..ProptestConfig::default() })]

    #[test]
    fn materialized_history_round_trips(snapshots in snapshot_sequences()) {
        let history = materialize(snapshots.clone());
        for (ix, expected) in snapshots.iter().enumerate() {
            let t = ix as u64 + 1;
            prop_assert_eq!(&at_time(&history, t), expected, "t = {}", t);
        }
    }

    #[test]
    fn observation_and_slices_union_to_full_history(snapshots in snapshot_sequences()) {
        let history = materialize(snapshots.clone());
        let (store, slices) = run_store(&snapshots);
        prop_assert!(union(&store.observation(), &slices).set_eq(&history));
    }

    #[test]
    fn incremental_queries_match_full_history(snapshots in snapshot_sequences()) {
        let history = materialize(snapshots.clone());
        let (store, slices) = run_store(&snapshots);
        let observation = store.observation();
        for t in 1..=store.time() {
            let incremental = at_time(rows_for(&observation, &slices, t), t);
            prop_assert_eq!(incremental, history.snapshot_at(t), "t = {}", t);
        }
    }

    #[test]
    fn query_ignores_slice_order(snapshots in snapshot_sequences(), t_seed in any::<u64>()) {
        let (store, slices) = run_store(&snapshots);
        let observation = store.observation();
        let t = t_seed % store.time() + 1;
        let mut rows = rows_for(&observation, &slices, t);
        let forward = at_time(rows.iter().copied(), t);
        rows.reverse();
        prop_assert_eq!(at_time(rows, t), forward);
    }

    #[test]
    fn slices_only_hold_touched_ids(snapshots in snapshot_sequences()) {
        let (_, slices) = run_store(&snapshots);
        for slice in &slices {
            let k = slice.time();
            let ix = usize::try_from(k - 1).unwrap();
            let current = &snapshots[ix];
            for row in slice.rows() {
                prop_assert_eq!(row.to, Some(k));
                let previous = if ix == 0 { None } else { snapshots[ix - 1].get(&row.id) };
                prop_assert_eq!(previous, Some(&row.payload));
                prop_assert_ne!(current.get(&row.id), Some(&row.payload));
            }
        }
    }

    #[test]
    fn repeating_a_snapshot_changes_nothing(snapshots in snapshot_sequences()) {
        let (mut store, _) = run_store(&snapshots);
        let before = store.observation();
        let last = snapshots.last().cloned().unwrap_or_default();
        let slice = store.advance_snapshot(&last);
        let after = store.observation();
        prop_assert!(slice.is_empty());
        prop_assert_eq!(&*after, &*before);
    }

    #[test]
    fn bootstrap_matches_incremental_store(snapshots in snapshot_sequences()) {
        let history = materialize(snapshots.clone());
        let (store, slices) = run_store(&snapshots);
        let (rebuilt, rebuilt_slices) = Store::bootstrap(&history, store.time()).unwrap();
        let (expected, actual) = (store.observation(), rebuilt.observation());
        prop_assert_eq!(&*actual, &*expected);
        prop_assert_eq!(rebuilt_slices, slices);
    }

    #[test]
    fn decompose_inverts_union(snapshots in snapshot_sequences()) {
        let history = materialize(snapshots.clone());
        let time = snapshots.len() as u64;
        let (observation, slices) = decompose(&history, time).unwrap();
        prop_assert!(union(&observation, &slices).set_eq(&history));
        prop_assert_eq!(observation.snapshot(), snapshots[snapshots.len() - 1].clone());
    }
}
