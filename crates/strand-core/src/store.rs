// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Incremental observation/difference compressor.
//!
//! [`Store`] owns the current time and the observation table. Each
//! [`advance`](Store::advance) diffs the incoming snapshot against the
//! observation, moves the rows of every touched id into a new
//! [`DifferenceSlice`] (closed at the new time), and installs open rows for
//! added or changed ids. Untouched rows are left as they were, which is what
//! keeps their original `from`.
//!
//! The store does not retain the slices it emits; its footprint is bounded by
//! the size of the current table.
//!
//! # Concurrency
//!
//! `advance` takes `&mut self`, so calls are serialized by construction. The
//! observation table is published as an `Arc`; `advance` mutates through
//! [`Arc::make_mut`], so a reader holding an earlier
//! [`observation`](Store::observation) keeps seeing the pre-advance table
//! rather than a partially updated one.

use std::sync::Arc;

use tracing::debug;

use crate::diff::diff_sorted;
use crate::error::HistoryError;
use crate::materialize::decompose;
use crate::model::{
    DifferenceSlice, HistoryRow, HistoryTable, Key, Observation, Payload, Record, Snapshot, Time,
};

/// Owns the observation table and advances it one time step per snapshot.
#[derive(Clone, Debug)]
pub struct Store<K: Ord, V> {
    time: Time,
    observation: Arc<Observation<K, V>>,
}

impl<K: Ord, V> Default for Store<K, V> {
    fn default() -> Self {
        Self {
            time: 0,
            observation: Arc::new(Observation::default()),
        }
    }
}

impl<K: Key, V: Payload> Store<K, V> {
    /// Creates a store at time 0 with an empty observation table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a store at `time` from a full history table.
    ///
    /// Returns the store together with the slices `D_1 … D_time`, which the
    /// caller is free to retain or drop.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::InvalidHistory`] if `history` is not a valid
    /// history table covering `1..=time`.
    pub fn bootstrap(
        history: &HistoryTable<K, V>,
        time: Time,
    ) -> Result<(Self, Vec<DifferenceSlice<K, V>>), HistoryError> {
        let (observation, slices) = decompose(history, time)?;
        debug!(
            time,
            rows = observation.len(),
            slices = slices.len(),
            "bootstrapped store from history"
        );
        let store = Self {
            time,
            observation: Arc::new(observation),
        };
        Ok((store, slices))
    }

    /// The latest applied time step (0 before the first advance).
    pub fn time(&self) -> Time {
        self.time
    }

    /// Shared handle to the current observation table.
    pub fn observation(&self) -> Arc<Observation<K, V>> {
        Arc::clone(&self.observation)
    }

    /// The current snapshot, projected from the observation table.
    pub fn snapshot(&self) -> Snapshot<K, V> {
        self.observation.snapshot()
    }

    /// Advances to the next time step with the given records.
    ///
    /// The records are validated as a whole before any state changes.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::MalformedSnapshot`] if an id occurs twice; the
    /// store stays at its prior time.
    pub fn advance<I>(&mut self, records: I) -> Result<DifferenceSlice<K, V>, HistoryError>
    where
        I: IntoIterator<Item = Record<K, V>>,
    {
        let snapshot = Snapshot::try_from_records(records)?;
        Ok(self.advance_snapshot(&snapshot))
    }

    /// Advances to the next time step with an already validated snapshot.
    ///
    /// Always returns a slice, possibly empty, so slices stay indexable by time.
    pub fn advance_snapshot(&mut self, snapshot: &Snapshot<K, V>) -> DifferenceSlice<K, V> {
        let t = self.time + 1;
        let diff = diff_sorted(self.observation.entries(), snapshot.iter());
        let stats = diff.stats();
        let (added_or_changed, removed) = diff.into_parts();

        let observation = Arc::make_mut(&mut self.observation);
        let mut closed = Vec::with_capacity(stats.changed + stats.removed);
        for id in &removed {
            if let Some(mut row) = observation.remove(id) {
                row.to = Some(t);
                closed.push(row);
            }
        }
        for Record { id, payload } in added_or_changed {
            if let Some(mut prior) = observation.insert(HistoryRow::open(t, id, payload)) {
                prior.to = Some(t);
                closed.push(prior);
            }
        }
        closed.sort_by(|a, b| a.id.cmp(&b.id));

        self.time = t;
        debug!(
            time = t,
            added = stats.added,
            changed = stats.changed,
            removed = stats.removed,
            rows = observation.len(),
            "advanced store"
        );
        DifferenceSlice::new(t, closed)
    }
}
