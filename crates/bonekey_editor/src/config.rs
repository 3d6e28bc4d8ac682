// SPDX-License-Identifier: MIT OR Apache-2.0
//! Settings for the keyframe-all-bones command.
//!
//! Stored by the host in RON alongside its other editor settings; every
//! field has a default so partial files load.

use crate::history::MAX_HISTORY;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Could not read the settings file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings text is not valid RON
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Settings could not be written as RON
    #[error("Serialization error: {0}")]
    Serialize(#[from] ron::Error),
}

/// Command settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InserterConfig {
    /// Label of the undo entry
    pub undo_label: String,
    /// How long result notices stay visible, in milliseconds
    pub message_duration_ms: u64,
    /// Add touched keyframes to the timeline selection
    pub select_keyframes: bool,
    /// New keyframes copy the current pose instead of the identity value
    pub force_duplicate: bool,
    /// Undo steps kept by the session history
    pub history_depth: usize,
}

impl Default for InserterConfig {
    fn default() -> Self {
        Self {
            undo_label: "Add keyframes to all visible bones".to_string(),
            message_duration_ms: 2000,
            select_keyframes: true,
            force_duplicate: true,
            history_depth: MAX_HISTORY,
        }
    }
}

impl InserterConfig {
    /// Notice duration as a `Duration`
    pub fn message_duration(&self) -> Duration {
        Duration::from_millis(self.message_duration_ms)
    }

    /// Parse settings from RON text
    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(text)?)
    }

    /// Serialize settings as pretty RON
    pub fn to_ron(&self) -> Result<String, ConfigError> {
        let config = ron::ser::PrettyConfig::default().struct_names(true);
        Ok(ron::ser::to_string_pretty(self, config)?)
    }

    /// Load settings from a RON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_ron(&content)?;
        tracing::debug!("loaded inserter settings from {}", path.display());
        Ok(config)
    }
}
