// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Append-only chain of difference slices, indexed by time.
//!
//! The chain is where an application keeps the slices a [`Store`](crate::Store)
//! emits. It enforces contiguity on append, knows which query times its
//! retained slices can answer for, and prunes according to a
//! [`RetentionPolicy`].
//!
//! # Invariant
//!
//! Retained slices are exactly `D_{pruned_through + 1} … D_latest`, in order.

use std::collections::VecDeque;
use std::sync::Arc;

use tracing::debug;

use crate::error::HistoryError;
use crate::model::{
    DifferenceSlice, HistoryRow, HistoryTable, Key, Observation, Payload, Snapshot, Time,
};
use crate::query::at_time;
use crate::retention::RetentionPolicy;

/// Ordered, contiguous run of difference slices.
#[derive(Clone, Debug)]
pub struct DifferenceChain<K, V> {
    slices: VecDeque<Arc<DifferenceSlice<K, V>>>,
    pruned_through: Time,
}

impl<K, V> Default for DifferenceChain<K, V> {
    fn default() -> Self {
        Self {
            slices: VecDeque::new(),
            pruned_through: 0,
        }
    }
}

impl<K: Key, V: Payload> DifferenceChain<K, V> {
    /// Creates an empty chain expecting `D_1` next.
    pub fn new() -> Self {
        Self::default()
    }

    /// Time of the newest slice appended (0 if none).
    pub fn latest(&self) -> Time {
        self.pruned_through + self.slices.len() as Time
    }

    /// Earliest query time the retained slices can answer for.
    pub fn earliest_queryable(&self) -> Time {
        self.pruned_through.max(1)
    }

    /// Number of retained slices.
    pub fn len(&self) -> usize {
        self.slices.len()
    }

    /// Returns `true` if no slices are retained.
    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    /// Appends the slice for the next time step.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::ChainGap`] if `slice.time()` is not
    /// `latest() + 1`; the chain is unchanged.
    pub fn push(&mut self, slice: DifferenceSlice<K, V>) -> Result<(), HistoryError> {
        let expected = self.latest() + 1;
        if slice.time() != expected {
            return Err(HistoryError::ChainGap {
                expected,
                got: slice.time(),
            });
        }
        debug!(time = expected, rows = slice.len(), "appended difference slice");
        self.slices.push_back(Arc::new(slice));
        Ok(())
    }

    /// Returns the retained slice produced at `t`.
    pub fn get(&self, t: Time) -> Option<&Arc<DifferenceSlice<K, V>>> {
        let offset = t.checked_sub(self.pruned_through + 1)?;
        self.slices.get(usize::try_from(offset).ok()?)
    }

    /// Retained slices newer than `t`: exactly those a query at `t` needs.
    pub fn slices_since(&self, t: Time) -> impl Iterator<Item = &DifferenceSlice<K, V>> + '_ {
        self.slices
            .iter()
            .map(|slice| &**slice)
            .skip_while(move |slice| slice.time() <= t)
    }

    /// Reconstructs the snapshot at `t` from `observation` and the retained slices.
    ///
    /// `observation` must be the table of the store that produced this chain,
    /// taken at time [`latest`](Self::latest).
    ///
    /// # Errors
    ///
    /// - [`HistoryError::TimeOutOfRange`] if a slice needed for `t` was pruned
    ///   (or `t` is 0).
    /// - [`HistoryError::FutureTime`] if `t` is beyond [`latest`](Self::latest).
    pub fn snapshot_at(
        &self,
        observation: &Observation<K, V>,
        t: Time,
    ) -> Result<Snapshot<K, V>, HistoryError> {
        if t > self.latest() {
            return Err(HistoryError::FutureTime {
                requested: t,
                current: self.latest(),
            });
        }
        if t < self.earliest_queryable() {
            return Err(HistoryError::TimeOutOfRange {
                requested: t,
                earliest: self.earliest_queryable(),
            });
        }
        Ok(self.snapshot_at_unchecked(observation, t))
    }

    /// Reconstructs the snapshot at `t` without checking coverage.
    pub fn snapshot_at_unchecked(
        &self,
        observation: &Observation<K, V>,
        t: Time,
    ) -> Snapshot<K, V> {
        let newer = self.slices_since(t).flat_map(DifferenceSlice::rows);
        at_time(observation.rows().chain(newer), t)
    }

    /// Union of `observation` and every retained slice.
    ///
    /// With nothing pruned this is the full history table.
    pub fn history(&self, observation: &Observation<K, V>) -> HistoryTable<K, V> {
        observation.rows().chain(self.rows()).cloned().collect()
    }

    /// Drops every slice `D_k` with `k <= t`, returning how many were dropped.
    pub fn prune_through(&mut self, t: Time) -> usize {
        let mut dropped = 0;
        while self.slices.front().is_some_and(|slice| slice.time() <= t) {
            self.slices.pop_front();
            dropped += 1;
        }
        if dropped > 0 {
            self.pruned_through += dropped as Time;
            debug!(
                pruned_through = self.pruned_through,
                dropped, "pruned difference chain"
            );
        }
        dropped
    }

    /// Applies `policy` against the current [`latest`](Self::latest) time.
    pub fn apply_retention(&mut self, policy: RetentionPolicy) -> usize {
        policy
            .prune_through(self.latest())
            .map_or(0, |boundary| self.prune_through(boundary))
    }

    /// Rows of every retained slice, oldest slice first.
    pub fn rows(&self) -> impl Iterator<Item = &HistoryRow<K, V>> + '_ {
        self.slices.iter().flat_map(|slice| slice.rows())
    }
}
