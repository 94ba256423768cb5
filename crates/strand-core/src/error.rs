// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Errors raised by the store, the query engine and the chain helpers.

use thiserror::Error;

use crate::model::Time;

/// Errors that can occur while ingesting snapshots or reconstructing history.
///
/// Keys are rendered with their `Debug` form so the error stays non-generic
/// and can cross crate boundaries without dragging the key type along.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryError {
    /// A snapshot contained the same id more than once.
    ///
    /// Raised before any state is touched; the rejected update leaves the
    /// store at its prior time.
    #[error("malformed snapshot: duplicate id {id}")]
    MalformedSnapshot {
        /// `Debug` rendering of the duplicated id.
        id: String,
    },

    /// The requested time cannot be reconstructed from the supplied rows.
    #[error("time {requested} is out of range (earliest reconstructable time is {earliest})")]
    TimeOutOfRange {
        /// The time that was queried.
        requested: Time,
        /// The earliest time the supplied rows can answer for.
        earliest: Time,
    },

    /// The requested time lies beyond the latest ingested step.
    #[error("time {requested} is in the future (current time is {current})")]
    FutureTime {
        /// The time that was queried.
        requested: Time,
        /// The latest ingested time step.
        current: Time,
    },

    /// A slice was appended out of sequence.
    ///
    /// Chains are append-only and indexed by time; a slice must carry exactly
    /// the next time step.
    #[error("chain gap: expected slice for time {expected}, got {got}")]
    ChainGap {
        /// The time step the chain expected next.
        expected: Time,
        /// The time step carried by the rejected slice.
        got: Time,
    },

    /// A history table violates the interval invariants and cannot be decomposed.
    #[error("invalid history: {reason}")]
    InvalidHistory {
        /// Human-readable description of the violation.
        reason: String,
    },
}
