// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(dead_code)]

use std::collections::BTreeMap;

use proptest::prelude::*;
use strand_core::{
    DifferenceSlice, HistoryRow, HistoryTable, Key, Observation, Payload, Snapshot, Store,
};

/// Run a fresh store over `snapshots`, returning it with every emitted slice.
pub fn run_store<K: Key, V: Payload>(
    snapshots: &[Snapshot<K, V>],
) -> (Store<K, V>, Vec<DifferenceSlice<K, V>>) {
    let mut store = Store::new();
    let slices = snapshots
        .iter()
        .map(|snapshot| store.advance_snapshot(snapshot))
        .collect();
    (store, slices)
}

/// `Observation ∪ D_k` for every slice in `slices`, as a history table.
pub fn union<K: Key, V: Payload>(
    observation: &Observation<K, V>,
    slices: &[DifferenceSlice<K, V>],
) -> HistoryTable<K, V> {
    observation
        .rows()
        .chain(slices.iter().flat_map(|slice| slice.rows()))
        .cloned()
        .collect()
}

/// Rows needed to answer a query at `t`: the observation plus `D_{t+1}..`.
pub fn rows_for<'a, K: Key, V: Payload>(
    observation: &'a Observation<K, V>,
    slices: &'a [DifferenceSlice<K, V>],
    t: u64,
) -> Vec<&'a HistoryRow<K, V>> {
    observation
        .rows()
        .chain(
            slices
                .iter()
                .filter(|slice| slice.time() > t)
                .flat_map(|slice| slice.rows()),
        )
        .collect()
}

/// Snapshot sequences over a small id/payload space so ids churn, vanish,
/// come back, and revert to earlier payloads.
pub fn snapshot_sequences() -> impl Strategy<Value = Vec<Snapshot<u8, u8>>> {
    prop::collection::vec(
        prop::collection::btree_map(0u8..12, 0u8..4, 0..10),
        1..16,
    )
    .prop_map(|steps: Vec<BTreeMap<u8, u8>>| {
        steps
            .into_iter()
            .map(|rows| rows.into_iter().collect())
            .collect()
    })
}
