// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Row, snapshot and table model.
//!
//! Rows are opaque keyed records: the engine only ever looks an id up and
//! compares payloads for equality. Every map is id-ordered so iteration order
//! is deterministic and independent of insertion order.
//!
//! # Key Types
//!
//! - [`Snapshot`]: the full state of the tracked table at one time step.
//! - [`HistoryRow`]: a payload together with its validity interval `[from, to)`.
//! - [`HistoryTable`]: an unordered multiset of history rows.
//! - [`Observation`]: the open rows of the current state.
//! - [`DifferenceSlice`]: the intervals closed by one time step.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::hash::Hash;

use crate::error::HistoryError;
use crate::query::at_time;

/// A discrete time step. Step `0` is the implicit empty baseline snapshot.
pub type Time = u64;

/// Row identity: totally ordered and hashable.
pub trait Key: Ord + Hash + Clone + Debug {}

impl<T: Ord + Hash + Clone + Debug> Key for T {}

/// Row payload: only ever cloned and compared for equality.
pub trait Payload: Clone + Eq + Debug {}

impl<T: Clone + Eq + Debug> Payload for T {}

/// One keyed record of the tracked table.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Record<K, V> {
    /// Unique id within a snapshot.
    pub id: K,
    /// Opaque payload.
    pub payload: V,
}

impl<K, V> Record<K, V> {
    /// Creates a record.
    pub fn new(id: K, payload: V) -> Self {
        Self { id, payload }
    }
}

/// Full state of the tracked table at one time step.
///
/// Ids are unique by construction. Use [`Snapshot::try_from_records`] to
/// build one from untrusted input; the [`FromIterator`] impl keeps the last
/// payload seen for a repeated id.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Snapshot<K: Ord, V> {
    rows: BTreeMap<K, V>,
}

impl<K: Ord, V> Default for Snapshot<K, V> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
        }
    }
}

impl<K: Key, V: Payload> Snapshot<K, V> {
    /// Creates an empty snapshot (the implicit snapshot at time 0).
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a snapshot from records, rejecting duplicate ids.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::MalformedSnapshot`] naming the first id that
    /// occurs more than once.
    pub fn try_from_records<I>(records: I) -> Result<Self, HistoryError>
    where
        I: IntoIterator<Item = Record<K, V>>,
    {
        let mut rows = BTreeMap::new();
        for record in records {
            match rows.entry(record.id) {
                Entry::Vacant(slot) => {
                    slot.insert(record.payload);
                }
                Entry::Occupied(slot) => {
                    return Err(HistoryError::MalformedSnapshot {
                        id: format!("{:?}", slot.key()),
                    });
                }
            }
        }
        Ok(Self { rows })
    }

    /// Inserts or replaces the payload for `id`, returning the previous one.
    pub fn insert(&mut self, id: K, payload: V) -> Option<V> {
        self.rows.insert(id, payload)
    }

    /// Removes `id`, returning its payload.
    pub fn remove(&mut self, id: &K) -> Option<V> {
        self.rows.remove(id)
    }

    /// Returns the payload for `id`, if present.
    pub fn get(&self, id: &K) -> Option<&V> {
        self.rows.get(id)
    }

    /// Returns `true` if `id` is present.
    pub fn contains(&self, id: &K) -> bool {
        self.rows.contains_key(id)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the snapshot has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterates `(id, payload)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.rows.iter()
    }

    /// Iterates owned records in id order.
    pub fn records(&self) -> impl Iterator<Item = Record<K, V>> + '_ {
        self.rows
            .iter()
            .map(|(id, payload)| Record::new(id.clone(), payload.clone()))
    }
}

impl<K: Key, V: Payload> FromIterator<(K, V)> for Snapshot<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

/// A payload together with its validity interval `[from, to)`.
///
/// `to == None` means the row is open: valid from `from` through the present.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HistoryRow<K, V> {
    /// First time step at which the payload is valid.
    pub from: Time,
    /// First time step at which the payload is no longer valid.
    pub to: Option<Time>,
    /// Row id.
    pub id: K,
    /// Payload valid over the interval.
    pub payload: V,
}

impl<K, V> HistoryRow<K, V> {
    /// Creates an open row valid from `from` onwards.
    pub fn open(from: Time, id: K, payload: V) -> Self {
        Self {
            from,
            to: None,
            id,
            payload,
        }
    }

    /// Creates a row valid over `[from, to)`.
    pub fn closed(from: Time, to: Time, id: K, payload: V) -> Self {
        Self {
            from,
            to: Some(to),
            id,
            payload,
        }
    }

    /// Returns `true` if the row is valid through the present.
    pub fn is_open(&self) -> bool {
        self.to.is_none()
    }

    /// Returns `true` if `from <= t` and the row has not been closed by `t`.
    pub fn is_valid_at(&self, t: Time) -> bool {
        self.from <= t && self.to.is_none_or(|to| to > t)
    }
}

/// Unordered multiset of history rows.
///
/// A materialized history table, or the union of an observation table with
/// any number of difference slices.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HistoryTable<K, V> {
    rows: Vec<HistoryRow<K, V>>,
}

impl<K, V> Default for HistoryTable<K, V> {
    fn default() -> Self {
        Self { rows: Vec::new() }
    }
}

impl<K: Key, V: Payload> HistoryTable<K, V> {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing row vector.
    pub fn from_rows(rows: Vec<HistoryRow<K, V>>) -> Self {
        Self { rows }
    }

    /// Appends a row.
    pub fn push(&mut self, row: HistoryRow<K, V>) {
        self.rows.push(row);
    }

    /// Rows in insertion order.
    pub fn rows(&self) -> &[HistoryRow<K, V>] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows sorted by `(id, from, to)` with exact duplicates removed.
    ///
    /// Two valid history tables hold the same set of rows iff their canonical
    /// forms are equal. Payloads are not part of the sort key, so rows sharing
    /// `(id, from, to)` with different payloads keep their input order and
    /// [`set_eq`](Self::set_eq) may report a false negative for them. A valid
    /// table never contains such rows.
    pub fn canonical(&self) -> Vec<HistoryRow<K, V>> {
        let mut rows = self.rows.clone();
        rows.sort_by(|a, b| {
            a.id.cmp(&b.id)
                .then(a.from.cmp(&b.from))
                .then(a.to.cmp(&b.to))
        });
        rows.dedup();
        rows
    }

    /// Set equality, ignoring row order and exact duplicates.
    pub fn set_eq(&self, other: &Self) -> bool {
        self.canonical() == other.canonical()
    }

    /// Reconstructs the snapshot valid at `t`.
    pub fn snapshot_at(&self, t: Time) -> Snapshot<K, V> {
        at_time(&self.rows, t)
    }
}

impl<K, V> Extend<HistoryRow<K, V>> for HistoryTable<K, V> {
    fn extend<I: IntoIterator<Item = HistoryRow<K, V>>>(&mut self, iter: I) {
        self.rows.extend(iter);
    }
}

impl<K, V> FromIterator<HistoryRow<K, V>> for HistoryTable<K, V> {
    fn from_iter<I: IntoIterator<Item = HistoryRow<K, V>>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

impl<'a, K, V> IntoIterator for &'a HistoryTable<K, V> {
    type Item = &'a HistoryRow<K, V>;
    type IntoIter = std::slice::Iter<'a, HistoryRow<K, V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// The current state annotated with validity start times.
///
/// Holds exactly one open row per id of the latest snapshot; `from` is the
/// step at which that id's current payload was last set, so unchanged rows
/// keep their original start.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Observation<K: Ord, V> {
    rows: BTreeMap<K, HistoryRow<K, V>>,
}

impl<K: Ord, V> Default for Observation<K, V> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
        }
    }
}

impl<K: Key, V: Payload> Observation<K, V> {
    /// Creates an empty observation table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the open row for `id`, if present.
    pub fn get(&self, id: &K) -> Option<&HistoryRow<K, V>> {
        self.rows.get(id)
    }

    /// Returns `true` if `id` is present in the current state.
    pub fn contains(&self, id: &K) -> bool {
        self.rows.contains_key(id)
    }

    /// Open rows in id order.
    pub fn rows(&self) -> impl Iterator<Item = &HistoryRow<K, V>> + '_ {
        self.rows.values()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the current state is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Projects the observation onto `(id, payload)`: the current snapshot.
    pub fn snapshot(&self) -> Snapshot<K, V> {
        self.entries()
            .map(|(id, payload)| (id.clone(), payload.clone()))
            .collect()
    }

    /// Copies the open rows into a history table.
    pub fn to_history(&self) -> HistoryTable<K, V> {
        self.rows().cloned().collect()
    }

    pub(crate) fn entries(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.rows.iter().map(|(id, row)| (id, &row.payload))
    }

    /// Installs an open row, returning the row it replaced.
    pub(crate) fn insert(&mut self, row: HistoryRow<K, V>) -> Option<HistoryRow<K, V>> {
        debug_assert!(row.is_open());
        self.rows.insert(row.id.clone(), row)
    }

    pub(crate) fn remove(&mut self, id: &K) -> Option<HistoryRow<K, V>> {
        self.rows.remove(id)
    }
}

/// The intervals closed when advancing to [`time`](DifferenceSlice::time).
///
/// Holds one row per id whose payload changed or was removed at that step,
/// each with `to == time`. Ids that did not change never appear. Immutable
/// once produced.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DifferenceSlice<K, V> {
    time: Time,
    rows: Vec<HistoryRow<K, V>>,
}

impl<K: Key, V: Payload> DifferenceSlice<K, V> {
    /// `rows` must be sorted by id, unique by id, and closed at `time`.
    pub(crate) fn new(time: Time, rows: Vec<HistoryRow<K, V>>) -> Self {
        debug_assert!(rows.windows(2).all(|w| w[0].id < w[1].id));
        debug_assert!(rows.iter().all(|row| row.to == Some(time)));
        Self { time, rows }
    }

    /// The time step that produced this slice.
    pub fn time(&self) -> Time {
        self.time
    }

    /// Closed rows in id order.
    pub fn rows(&self) -> &[HistoryRow<K, V>] {
        &self.rows
    }

    /// Returns the closed row for `id`, if that id changed at this step.
    pub fn get(&self, id: &K) -> Option<&HistoryRow<K, V>> {
        self.rows
            .binary_search_by(|row| row.id.cmp(id))
            .ok()
            .map(|ix| &self.rows[ix])
    }

    /// Number of closed rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if nothing changed at this step.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
