// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! A [`Store`] paired with the [`DifferenceChain`] of the slices it emitted.
//!
//! This is the composition most applications want: ingest snapshots, keep the
//! slices the configured [`RetentionPolicy`](crate::RetentionPolicy) allows,
//! and answer point-in-time queries over whatever is retained.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::chain::DifferenceChain;
use crate::config::HistoryConfig;
use crate::error::HistoryError;
use crate::model::{HistoryTable, Key, Observation, Payload, Record, Snapshot, Time};
use crate::store::Store;

/// Store plus retained slices, driven by a [`HistoryConfig`].
#[derive(Clone, Debug)]
pub struct Timeline<K: Ord, V> {
    store: Store<K, V>,
    chain: DifferenceChain<K, V>,
    config: HistoryConfig,
}

impl<K: Key, V: Payload> Default for Timeline<K, V> {
    fn default() -> Self {
        Self::new(HistoryConfig::default())
    }
}

impl<K: Key, V: Payload> Timeline<K, V> {
    /// Creates an empty timeline at time 0.
    pub fn new(config: HistoryConfig) -> Self {
        Self {
            store: Store::new(),
            chain: DifferenceChain::new(),
            config,
        }
    }

    /// Rebuilds a timeline at `time` from a full history table, then applies
    /// the configured retention.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::InvalidHistory`] if `history` cannot be
    /// decomposed.
    pub fn bootstrap(
        history: &HistoryTable<K, V>,
        time: Time,
        config: HistoryConfig,
    ) -> Result<Self, HistoryError> {
        let (store, slices) = Store::bootstrap(history, time)?;
        let mut chain = DifferenceChain::new();
        for slice in slices {
            chain.push(slice)?;
        }
        chain.apply_retention(config.retention);
        Ok(Self {
            store,
            chain,
            config,
        })
    }

    /// Active configuration.
    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    /// Latest ingested time step.
    pub fn time(&self) -> Time {
        self.store.time()
    }

    /// Shared handle to the current observation table.
    pub fn observation(&self) -> Arc<Observation<K, V>> {
        self.store.observation()
    }

    /// Retained slices.
    pub fn chain(&self) -> &DifferenceChain<K, V> {
        &self.chain
    }

    /// Ingests the next snapshot, returning its time step.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::MalformedSnapshot`] on duplicate ids; nothing
    /// is ingested.
    #[instrument(level = "debug", skip_all)]
    pub fn ingest<I>(&mut self, records: I) -> Result<Time, HistoryError>
    where
        I: IntoIterator<Item = Record<K, V>>,
    {
        let slice = self.store.advance(records)?;
        self.chain.push(slice)?;
        let pruned = self.chain.apply_retention(self.config.retention);
        debug!(time = self.store.time(), pruned, "ingested snapshot");
        Ok(self.store.time())
    }

    /// Reconstructs the snapshot at `t`.
    ///
    /// With `validate_queries` set, times the retained slices cannot answer
    /// for are rejected; otherwise a possibly partial snapshot is returned.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::TimeOutOfRange`] or [`HistoryError::FutureTime`]
    /// when validation is enabled and `t` is not covered.
    pub fn snapshot_at(&self, t: Time) -> Result<Snapshot<K, V>, HistoryError> {
        let observation = self.store.observation();
        if self.config.validate_queries {
            self.chain.snapshot_at(&observation, t)
        } else {
            Ok(self.chain.snapshot_at_unchecked(&observation, t))
        }
    }

    /// The current snapshot.
    pub fn current(&self) -> Snapshot<K, V> {
        self.store.snapshot()
    }

    /// Observation rows plus every retained slice.
    pub fn history(&self) -> HistoryTable<K, V> {
        self.chain.history(&self.store.observation())
    }
}
