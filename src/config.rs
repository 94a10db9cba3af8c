//! Tracker configuration parsed from TOML.
//!
//! Every field has a default, so an empty file (or no file at all) yields a
//! working configuration.

use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::task::domain::EffectKind;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config '{path}': {source}")]
    Read {
        /// Path that was read.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// The configuration is not valid TOML for [`TrackerConfig`].
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Durations of the view effects, in milliseconds.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct EffectDurations {
    /// Pending to progress.
    #[serde(default = "default_swipe_ms")]
    pub advance_ms: u64,
    /// Progress to completed.
    #[serde(default = "default_swipe_ms")]
    pub complete_ms: u64,
    /// Removal.
    #[serde(default = "default_remove_ms")]
    pub remove_ms: u64,
}

const fn default_swipe_ms() -> u64 {
    950
}

const fn default_remove_ms() -> u64 {
    750
}

impl Default for EffectDurations {
    fn default() -> Self {
        Self {
            advance_ms: default_swipe_ms(),
            complete_ms: default_swipe_ms(),
            remove_ms: default_remove_ms(),
        }
    }
}

impl EffectDurations {
    /// Durations that resolve immediately.
    #[must_use]
    pub const fn instant() -> Self {
        Self {
            advance_ms: 0,
            complete_ms: 0,
            remove_ms: 0,
        }
    }

    /// Returns the duration of `kind`.
    #[must_use]
    pub const fn for_kind(&self, kind: EffectKind) -> Duration {
        let millis = match kind {
            EffectKind::Advance => self.advance_ms,
            EffectKind::Complete => self.complete_ms,
            EffectKind::Remove => self.remove_ms,
        };
        Duration::from_millis(millis)
    }
}

fn default_storage_dir() -> Utf8PathBuf {
    Utf8PathBuf::from(".taskboard")
}

const fn default_true() -> bool {
    true
}

/// Top-level tracker configuration.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct TrackerConfig {
    /// Directory holding one JSON document per task.
    #[serde(default = "default_storage_dir")]
    pub storage_dir: Utf8PathBuf,
    /// Create the demonstration tasks when storage is empty.
    #[serde(default = "default_true")]
    pub seed_defaults: bool,
    /// View effect durations.
    #[serde(default)]
    pub effects: EffectDurations,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            storage_dir: default_storage_dir(),
            seed_defaults: true,
            effects: EffectDurations::default(),
        }
    }
}

impl TrackerConfig {
    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the text is not valid TOML or a
    /// field has the wrong type.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Reads and parses a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] when the file cannot be read and
    /// [`ConfigError::Parse`] when its contents are invalid.
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }
}
