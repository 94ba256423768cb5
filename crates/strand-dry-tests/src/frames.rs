// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Snapshot and record builders for tests.

use strand_core::{Key, Payload, Record, Snapshot};

/// Build a snapshot from `(id, payload)` pairs.
///
/// Later pairs overwrite earlier ones with the same id; use
/// [`records`] with [`Snapshot::try_from_records`] to exercise duplicate
/// rejection instead.
pub fn snapshot<K: Key, V: Payload>(rows: &[(K, V)]) -> Snapshot<K, V> {
    rows.iter().cloned().collect()
}

/// Build a record list (duplicates preserved) from `(id, payload)` pairs.
pub fn records<K: Key, V: Payload>(rows: &[(K, V)]) -> Vec<Record<K, V>> {
    rows.iter()
        .cloned()
        .map(|(id, payload)| Record::new(id, payload))
        .collect()
}

/// Builder for creating [`Snapshot`] instances in tests.
///
/// # Example
///
/// ```
/// use strand_dry_tests::SnapshotBuilder;
///
/// let snap = SnapshotBuilder::new()
///     .with_row(1_u32, "a")
///     .with_row(2, "b")
///     .without(1)
///     .build();
///
/// assert_eq!(snap.len(), 1);
/// assert_eq!(snap.get(&2), Some(&"b"));
/// ```
pub struct SnapshotBuilder<K: Ord, V> {
    snapshot: Snapshot<K, V>,
}

impl<K: Key, V: Payload> Default for SnapshotBuilder<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Key, V: Payload> SnapshotBuilder<K, V> {
    /// Create a builder for an empty snapshot.
    pub fn new() -> Self {
        Self {
            snapshot: Snapshot::new(),
        }
    }

    /// Start from an existing snapshot (e.g. to derive the next step).
    pub fn from_snapshot(snapshot: &Snapshot<K, V>) -> Self {
        Self {
            snapshot: snapshot.clone(),
        }
    }

    /// Insert or replace a row.
    pub fn with_row(mut self, id: K, payload: V) -> Self {
        self.snapshot.insert(id, payload);
        self
    }

    /// Drop a row if present.
    pub fn without(mut self, id: K) -> Self {
        self.snapshot.remove(&id);
        self
    }

    /// Build the snapshot.
    pub fn build(self) -> Snapshot<K, V> {
        self.snapshot
    }
}
