// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Persistence port for history settings.
//!
//! Hosts plug a [`ConfigStore`] (filesystem, in-memory) into a
//! [`ConfigService`], which owns the JSON encoding. Blobs are addressed by a
//! logical key such as [`HISTORY_CONFIG_KEY`](crate::HISTORY_CONFIG_KEY).

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// Byte-level storage backend, keyed by logical name.
pub trait ConfigStore {
    /// Reads the blob stored under `key`.
    ///
    /// Returns [`ConfigError::NotFound`] when nothing was ever saved there.
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError>;

    /// Replaces the blob stored under `key`.
    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError>;
}

/// Failures while loading or saving settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Nothing is stored under `key`.
    #[error("no config stored under {key:?}")]
    NotFound {
        /// The key that was looked up.
        key: String,
    },
    /// The backing store failed to read or write.
    #[error("config store i/o failed: {0}")]
    Io(#[from] std::io::Error),
    /// The blob under `key` does not decode as the requested type.
    #[error("config under {key:?} is corrupt: {source}")]
    Corrupt {
        /// The key whose blob failed to decode.
        key: String,
        /// Decoder error.
        source: serde_json::Error,
    },
    /// A value could not be encoded.
    #[error("failed to encode config: {0}")]
    Encode(#[source] serde_json::Error),
    /// Store-specific failure.
    #[error("config store failed: {0}")]
    Other(String),
}

/// Typed JSON view over a [`ConfigStore`].
pub struct ConfigService<S> {
    store: S,
}

impl<S: ConfigStore> ConfigService<S> {
    /// Wraps `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Loads the value stored under `key`.
    ///
    /// A missing key or a blank blob yields `Ok(None)`; a blob that does not
    /// decode as `T` is [`ConfigError::Corrupt`].
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, ConfigError> {
        let bytes = match self.store.load_raw(key) {
            Ok(bytes) => bytes,
            Err(ConfigError::NotFound { .. }) => return Ok(None),
            Err(err) => return Err(err),
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| ConfigError::Corrupt {
                key: key.to_owned(),
                source,
            })
    }

    /// Like [`load`](Self::load), but falls back to `T::default()` when
    /// nothing is stored.
    pub fn load_or_default<T>(&self, key: &str) -> Result<T, ConfigError>
    where
        T: DeserializeOwned + Default,
    {
        Ok(self.load(key)?.unwrap_or_default())
    }

    /// Encodes `value` as pretty JSON and stores it under `key`.
    pub fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), ConfigError> {
        let data = serde_json::to_vec_pretty(value).map_err(ConfigError::Encode)?;
        self.store.save_raw(key, &data)
    }
}
