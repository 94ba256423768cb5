// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Persisted [`HistoryConfig`] for timelines.

pub use strand_core::{HistoryConfig, RetentionPolicy};

use crate::config::{ConfigError, ConfigService, ConfigStore};

/// Config key the history settings are stored under.
pub const HISTORY_CONFIG_KEY: &str = "history";

/// Load the history settings, falling back to [`HistoryConfig::default`] when none are stored.
pub fn load_history_config<S: ConfigStore>(
    service: &ConfigService<S>,
) -> Result<HistoryConfig, ConfigError> {
    service.load_or_default(HISTORY_CONFIG_KEY)
}

/// Persist the history settings.
pub fn save_history_config<S: ConfigStore>(
    service: &ConfigService<S>,
    config: &HistoryConfig,
) -> Result<(), ConfigError> {
    service.save(HISTORY_CONFIG_KEY, config)
}
