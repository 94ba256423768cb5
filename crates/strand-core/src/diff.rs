// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Snapshot diffing.
//!
//! [`compute_diff`] walks two id-ordered snapshots side by side, so a diff
//! costs `O(|old| + |new|)` and every list it produces is already id-sorted.

use std::cmp::Ordering;

use crate::model::{Key, Payload, Record, Snapshot};

/// Per-kind counts for a [`Diff`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DiffStats {
    /// Ids absent from the old snapshot.
    pub added: usize,
    /// Ids present in both snapshots with different payloads.
    pub changed: usize,
    /// Ids absent from the new snapshot.
    pub removed: usize,
}

/// Difference between two snapshots.
///
/// `added_or_changed` and `removed` are disjoint in id space and both sorted
/// by id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diff<K, V> {
    added_or_changed: Vec<Record<K, V>>,
    removed: Vec<K>,
    changed: usize,
}

impl<K: Key, V: Payload> Diff<K, V> {
    /// Records of the new snapshot whose `(id, payload)` pair is not in the old one.
    pub fn added_or_changed(&self) -> &[Record<K, V>] {
        &self.added_or_changed
    }

    /// Ids of the old snapshot that are absent from the new one.
    pub fn removed(&self) -> &[K] {
        &self.removed
    }

    /// Every id that needs an interval boundary, in id order.
    pub fn touched(&self) -> Vec<&K> {
        let mut out = Vec::with_capacity(self.added_or_changed.len() + self.removed.len());
        let mut changed = self.added_or_changed.iter().map(|r| &r.id).peekable();
        let mut removed = self.removed.iter().peekable();
        loop {
            let next = match (changed.peek().copied(), removed.peek().copied()) {
                (Some(a), Some(b)) if a < b => changed.next(),
                (Some(_), Some(_)) | (None, Some(_)) => removed.next(),
                (Some(_), None) => changed.next(),
                (None, None) => break,
            };
            out.extend(next);
        }
        out
    }

    /// Returns `true` if the snapshots were identical.
    pub fn is_empty(&self) -> bool {
        self.added_or_changed.is_empty() && self.removed.is_empty()
    }

    /// Counts added, changed and removed ids.
    pub fn stats(&self) -> DiffStats {
        DiffStats {
            added: self.added_or_changed.len() - self.changed,
            changed: self.changed,
            removed: self.removed.len(),
        }
    }

    pub(crate) fn into_parts(self) -> (Vec<Record<K, V>>, Vec<K>) {
        (self.added_or_changed, self.removed)
    }
}

/// Computes the added/changed records and the removed ids between two snapshots.
///
/// Payloads are compared by value. Identical snapshots yield an empty diff.
pub fn compute_diff<K: Key, V: Payload>(old: &Snapshot<K, V>, new: &Snapshot<K, V>) -> Diff<K, V> {
    diff_sorted(old.iter(), new.iter())
}

/// Merge walk over two id-ascending `(id, payload)` sequences.
pub(crate) fn diff_sorted<'a, K, V, O, N>(old: O, new: N) -> Diff<K, V>
where
    K: Key + 'a,
    V: Payload + 'a,
    O: Iterator<Item = (&'a K, &'a V)>,
    N: Iterator<Item = (&'a K, &'a V)>,
{
    let mut old = old.peekable();
    let mut new = new.peekable();
    let mut added_or_changed = Vec::new();
    let mut removed = Vec::new();
    let mut changed = 0;

    loop {
        match (old.peek().copied(), new.peek().copied()) {
            (None, None) => break,
            (Some((id, _)), None) => {
                removed.push(id.clone());
                old.next();
            }
            (None, Some((id, payload))) => {
                added_or_changed.push(Record::new(id.clone(), payload.clone()));
                new.next();
            }
            (Some((old_id, old_payload)), Some((new_id, new_payload))) => {
                match old_id.cmp(new_id) {
                    Ordering::Less => {
                        removed.push(old_id.clone());
                        old.next();
                    }
                    Ordering::Greater => {
                        added_or_changed.push(Record::new(new_id.clone(), new_payload.clone()));
                        new.next();
                    }
                    Ordering::Equal => {
                        if old_payload != new_payload {
                            changed += 1;
                            added_or_changed
                                .push(Record::new(new_id.clone(), new_payload.clone()));
                        }
                        old.next();
                        new.next();
                    }
                }
            }
        }
    }

    Diff {
        added_or_changed,
        removed,
        changed,
    }
}
