// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Conversions between snapshot sequences, full history tables and the
//! compressed observation/difference form.
//!
//! [`materialize`] is the reference oracle: it closes intervals directly
//! without going through a [`Store`](crate::Store), so tests can compare the
//! two. [`decompose`] goes the other way and is what
//! [`Store::bootstrap`](crate::Store::bootstrap) uses to migrate an existing
//! full history into the compressed form.

use std::collections::BTreeMap;

use crate::diff::compute_diff;
use crate::error::HistoryError;
use crate::model::{
    DifferenceSlice, HistoryRow, HistoryTable, Key, Observation, Payload, Snapshot, Time,
};

/// Builds the full history table for snapshots `V_1 … V_n`.
///
/// The first snapshot is diffed against the empty snapshot at time 0. An id
/// whose payload does not change keeps a single row, so consecutive rows for
/// the same id always differ in payload.
pub fn materialize<K, V, I>(snapshots: I) -> HistoryTable<K, V>
where
    K: Key,
    V: Payload,
    I: IntoIterator<Item = Snapshot<K, V>>,
{
    let mut open: BTreeMap<K, HistoryRow<K, V>> = BTreeMap::new();
    let mut table = HistoryTable::new();
    let mut previous = Snapshot::new();
    let mut t: Time = 0;

    for snapshot in snapshots {
        t += 1;
        let diff = compute_diff(&previous, &snapshot);
        for id in diff.removed() {
            if let Some(mut row) = open.remove(id) {
                row.to = Some(t);
                table.push(row);
            }
        }
        for record in diff.added_or_changed() {
            let row = HistoryRow::open(t, record.id.clone(), record.payload.clone());
            if let Some(mut prior) = open.insert(record.id.clone(), row) {
                prior.to = Some(t);
                table.push(prior);
            }
        }
        previous = snapshot;
    }

    table.extend(open.into_values());
    table
}

/// Splits a history table covering steps `1..=time` into an observation
/// table and the slices `D_1 … D_time`.
///
/// Open rows become the observation; closed rows are grouped by `to`. Steps
/// where nothing closed still get an (empty) slice so the result is indexable
/// by time.
///
/// # Errors
///
/// Returns [`HistoryError::InvalidHistory`] if a row starts outside
/// `1..=time`, ends after `time` or has an empty interval, or if the rows of
/// one id overlap (including two open rows, or two rows closing at the same
/// step).
pub fn decompose<K, V>(
    history: &HistoryTable<K, V>,
    time: Time,
) -> Result<(Observation<K, V>, Vec<DifferenceSlice<K, V>>), HistoryError>
where
    K: Key,
    V: Payload,
{
    let mut observation = Observation::new();
    let mut closed: BTreeMap<Time, Vec<HistoryRow<K, V>>> = BTreeMap::new();
    let mut spans: BTreeMap<&K, Vec<(Time, Option<Time>)>> = BTreeMap::new();

    for row in history.rows() {
        if row.from == 0 || row.from > time {
            return Err(invalid(format!(
                "row for id {:?} starts at {} outside 1..={time}",
                row.id, row.from
            )));
        }
        match row.to {
            None => {
                if observation.insert(row.clone()).is_some() {
                    return Err(invalid(format!("id {:?} has more than one open row", row.id)));
                }
            }
            Some(to) if to <= row.from => {
                return Err(invalid(format!(
                    "row for id {:?} has empty interval [{}, {to})",
                    row.id, row.from
                )));
            }
            Some(to) if to > time => {
                return Err(invalid(format!(
                    "row for id {:?} closes at {to}, after time {time}",
                    row.id
                )));
            }
            Some(to) => closed.entry(to).or_default().push(row.clone()),
        }
        spans.entry(&row.id).or_default().push((row.from, row.to));
    }

    // An open row extends to infinity, so it overlaps anything starting later.
    for (id, intervals) in &mut spans {
        intervals.sort_unstable();
        if let Some(pair) = intervals
            .windows(2)
            .find(|pair| pair[0].1.is_none_or(|to| to > pair[1].0))
        {
            return Err(invalid(format!(
                "id {id:?} has overlapping rows starting at {} and {}",
                pair[0].0, pair[1].0
            )));
        }
    }

    let mut slices = Vec::new();
    for t in 1..=time {
        let mut rows = closed.remove(&t).unwrap_or_default();
        rows.sort_by(|a, b| a.id.cmp(&b.id));
        slices.push(DifferenceSlice::new(t, rows));
    }

    Ok((observation, slices))
}

fn invalid(reason: String) -> HistoryError {
    HistoryError::InvalidHistory { reason }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn snap(rows: &[(u8, char)]) -> Snapshot<u8, char> {
        rows.iter().copied().collect()
    }

    #[test]
    fn unchanged_rows_keep_a_single_interval() {
        let history = materialize([snap(&[(1, 'a')]), snap(&[(1, 'a')]), snap(&[(1, 'a')])]);
        assert_eq!(history.rows(), &[HistoryRow::open(1, 1, 'a')]);
    }

    #[test]
    fn removal_and_reinsertion_produce_disjoint_intervals() {
        let history = materialize([snap(&[(1, 'a')]), snap(&[]), snap(&[(1, 'a')])]);
        assert_eq!(
            history.canonical(),
            vec![HistoryRow::closed(1, 2, 1, 'a'), HistoryRow::open(3, 1, 'a')]
        );
    }

    #[test]
    fn decompose_rejects_two_open_rows() {
        let history = HistoryTable::from_rows(vec![
            HistoryRow::open(1, 1, 'a'),
            HistoryRow::open(2, 1, 'b'),
        ]);
        assert!(matches!(
            decompose(&history, 2),
            Err(HistoryError::InvalidHistory { .. })
        ));
    }

    #[test]
    fn decompose_rejects_overlapping_intervals() {
        let history = HistoryTable::from_rows(vec![
            HistoryRow::closed(1, 4, 1, 'a'),
            HistoryRow::open(2, 1, 'b'),
        ]);
        assert!(matches!(
            decompose(&history, 4),
            Err(HistoryError::InvalidHistory { .. })
        ));

        let closed_only = HistoryTable::from_rows(vec![
            HistoryRow::closed(1, 3, 1, 'a'),
            HistoryRow::closed(2, 4, 1, 'b'),
        ]);
        assert!(decompose(&closed_only, 4).is_err());
    }

    #[test]
    fn decompose_accepts_adjacent_intervals() {
        let history = HistoryTable::from_rows(vec![
            HistoryRow::open(3, 1, 'c'),
            HistoryRow::closed(1, 3, 1, 'a'),
        ]);
        let (observation, slices) = decompose(&history, 3).unwrap();
        assert!(observation.contains(&1));
        assert_eq!(slices[2].rows(), &[HistoryRow::closed(1, 3, 1, 'a')]);
    }

    #[test]
    fn decompose_rejects_two_rows_closing_at_same_step() {
        let history = HistoryTable::from_rows(vec![
            HistoryRow::closed(1, 3, 1, 'a'),
            HistoryRow::closed(2, 3, 1, 'b'),
        ]);
        assert!(matches!(
            decompose(&history, 3),
            Err(HistoryError::InvalidHistory { .. })
        ));
    }

    #[test]
    fn decompose_rejects_empty_interval() {
        let history = HistoryTable::from_rows(vec![HistoryRow::closed(2, 2, 1, 'a')]);
        assert!(matches!(
            decompose(&history, 3),
            Err(HistoryError::InvalidHistory { .. })
        ));
        let backwards = HistoryTable::from_rows(vec![HistoryRow::closed(3, 2, 1, 'a')]);
        assert!(decompose(&backwards, 3).is_err());
    }

    #[test]
    fn decompose_rejects_rows_starting_at_zero() {
        let history = HistoryTable::from_rows(vec![HistoryRow::open(0, 1, 'a')]);
        assert!(matches!(
            decompose(&history, 3),
            Err(HistoryError::InvalidHistory { .. })
        ));
    }

    #[test]
    fn decompose_rejects_rows_beyond_time() {
        let history = HistoryTable::from_rows(vec![HistoryRow::closed(1, 4, 1, 'a')]);
        assert!(matches!(
            decompose(&history, 3),
            Err(HistoryError::InvalidHistory { .. })
        ));
        let history = HistoryTable::from_rows(vec![HistoryRow::open(5, 1, 'a')]);
        assert!(decompose(&history, 3).is_err());
    }

    #[test]
    fn decompose_emits_one_slice_per_step() {
        let history = materialize([snap(&[(1, 'a')]), snap(&[(1, 'b')]), snap(&[(1, 'b')])]);
        let (observation, slices) = decompose(&history, 3).unwrap();
        assert_eq!(slices.len(), 3);
        assert!(slices[0].is_empty());
        assert_eq!(slices[1].rows(), &[HistoryRow::closed(1, 2, 1, 'a')]);
        assert!(slices[2].is_empty());
        assert_eq!(observation.get(&1), Some(&HistoryRow::open(2, 1, 'b')));
    }
}
