// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared application services for Strand hosts (config storage, history settings).
//! Keeps persistence adapters thin and independent of the history engine.

pub mod config;
pub mod settings;

pub use config::{ConfigError, ConfigService, ConfigStore};
pub use settings::{load_history_config, save_history_config, HISTORY_CONFIG_KEY};
