// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Point-in-time reconstruction.
//!
//! A query is one pass over whatever rows the caller gathered: an observation
//! table plus the difference slices newer than the queried time, or a fully
//! materialized history table. Rows valid at the queried time are grouped by
//! id and the row with the latest `from` wins. On an exact `from` tie the
//! first row encountered wins, so the result is a deterministic function of
//! input order.
//!
//! # Caller contract
//!
//! Correctness requires every slice `D_k` with `queried_time < k <= now`.
//! A missing slice yields a stale or incomplete snapshot, not an error: the
//! engine cannot know which slices exist. [`at_time_checked`] only rejects
//! times that precede every row it was given.

use rustc_hash::FxHashMap;

use crate::error::HistoryError;
use crate::model::{HistoryRow, Key, Payload, Snapshot, Time};

/// Reconstructs the snapshot valid at `t` from an arbitrary union of rows.
pub fn at_time<'a, K, V, I>(rows: I, t: Time) -> Snapshot<K, V>
where
    K: Key + 'a,
    V: Payload + 'a,
    I: IntoIterator<Item = &'a HistoryRow<K, V>>,
{
    let (winners, _) = select(rows, t);
    collect(winners)
}

/// Like [`at_time`], but rejects times the supplied rows cannot answer for.
///
/// # Errors
///
/// Returns [`HistoryError::TimeOutOfRange`] when `t` is `0` or precedes the
/// smallest `from` among `rows`. An empty `rows` yields an empty snapshot.
pub fn at_time_checked<'a, K, V, I>(rows: I, t: Time) -> Result<Snapshot<K, V>, HistoryError>
where
    K: Key + 'a,
    V: Payload + 'a,
    I: IntoIterator<Item = &'a HistoryRow<K, V>>,
{
    let (winners, earliest) = select(rows, t);
    match earliest {
        Some(earliest) if t == 0 || t < earliest => Err(HistoryError::TimeOutOfRange {
            requested: t,
            earliest: earliest.max(1),
        }),
        _ => Ok(collect(winners)),
    }
}

type Winners<'a, K, V> = FxHashMap<&'a K, &'a HistoryRow<K, V>>;

// Filters rows valid at `t`, keeps the latest `from` per id, and reports the
// minimum `from` seen across all rows.
fn select<'a, K, V, I>(rows: I, t: Time) -> (Winners<'a, K, V>, Option<Time>)
where
    K: Key + 'a,
    V: Payload + 'a,
    I: IntoIterator<Item = &'a HistoryRow<K, V>>,
{
    let mut winners: Winners<'a, K, V> = FxHashMap::default();
    let mut earliest: Option<Time> = None;
    for row in rows {
        earliest = Some(earliest.map_or(row.from, |e| e.min(row.from)));
        if !row.is_valid_at(t) {
            continue;
        }
        winners
            .entry(&row.id)
            .and_modify(|current| {
                if row.from > current.from {
                    *current = row;
                }
            })
            .or_insert(row);
    }
    (winners, earliest)
}

fn collect<K: Key, V: Payload>(winners: Winners<'_, K, V>) -> Snapshot<K, V> {
    winners
        .into_values()
        .map(|row| (row.id.clone(), row.payload.clone()))
        .collect()
}
