// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Retention policies for difference chains.
//!
//! A [`Store`](crate::Store) never keeps old slices itself; how many to retain
//! is the embedding application's call. [`RetentionPolicy`] names the two
//! common choices so a [`DifferenceChain`](crate::DifferenceChain) can apply
//! them:
//!
//! - [`RetentionPolicy::KeepAll`] - Keep every slice; any past step stays
//!   reconstructable.
//! - [`RetentionPolicy::KeepRecent`] - Keep a sliding window of slices; steps
//!   older than the window are no longer reconstructable from the chain.
//!
//! Dropped slices can always be regenerated from a materialized history via
//! [`decompose`](crate::decompose).

use crate::model::Time;

/// Retention policy for difference slices.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum RetentionPolicy {
    /// Keep every slice indefinitely.
    #[default]
    KeepAll,

    /// Keep only the slices needed to reconstruct the last `window` steps.
    KeepRecent {
        /// Number of past steps that remain reconstructable.
        window: u64,
    },
}

impl RetentionPolicy {
    /// Returns the step through which slices may be dropped when the chain
    /// has reached `current`, or `None` if nothing should be pruned.
    ///
    /// A query at step `s` needs slices `D_{s+1} … D_current`, so keeping the
    /// last `window` steps reconstructable allows dropping `D_k` for
    /// `k <= current - window`.
    pub fn prune_through(&self, current: Time) -> Option<Time> {
        match *self {
            Self::KeepAll => None,
            Self::KeepRecent { window } => match current.saturating_sub(window) {
                0 => None,
                boundary => Some(boundary),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keep_all_never_prunes() {
        assert_eq!(RetentionPolicy::KeepAll.prune_through(1_000), None);
    }

    #[test]
    fn keep_recent_prunes_outside_window() {
        let policy = RetentionPolicy::KeepRecent { window: 3 };
        assert_eq!(policy.prune_through(2), None);
        assert_eq!(policy.prune_through(3), None);
        assert_eq!(policy.prune_through(4), Some(1));
        assert_eq!(policy.prune_through(10), Some(7));
    }

    #[test]
    fn zero_window_drops_every_slice() {
        let policy = RetentionPolicy::KeepRecent { window: 0 };
        assert_eq!(policy.prune_through(5), Some(5));
    }
}
