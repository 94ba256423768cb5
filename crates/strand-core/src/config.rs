// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Tunables for [`Timeline`](crate::Timeline).

use crate::retention::RetentionPolicy;

/// Configuration for a [`Timeline`](crate::Timeline).
///
/// Persisted by the application layer under a single config key; missing
/// fields fall back to their defaults when deserialized.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct HistoryConfig {
    /// How many difference slices the timeline retains.
    pub retention: RetentionPolicy,
    /// Reject queries the retained slices cannot answer instead of returning
    /// a partial snapshot.
    pub validate_queries: bool,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            retention: RetentionPolicy::KeepAll,
            validate_queries: true,
        }
    }
}

impl HistoryConfig {
    /// Returns a copy with the given retention policy.
    pub fn with_retention(mut self, retention: RetentionPolicy) -> Self {
        self.retention = retention;
        self
    }

    /// Returns a copy with query validation switched on or off.
    pub fn with_validation(mut self, validate_queries: bool) -> Self {
        self.validate_queries = validate_queries;
        self
    }
}
