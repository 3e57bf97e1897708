//! Recorder configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::RecorderError;
use crate::RecorderResult;

/// Configuration for a recording run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecorderConfig {
    /// Time between two captures in milliseconds (default: 1000).
    pub interval_ms: u64,

    /// Directory receiving the numbered PNG files.
    pub output_dir: PathBuf,

    /// Number given to the first frame.
    pub first_index: u64,

    /// Stop after this many frames (None records until stopped).
    pub frame_limit: Option<u64>,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            interval_ms: 1000,
            output_dir: PathBuf::from("."),
            first_index: 0,
            frame_limit: None,
        }
    }
}

impl RecorderConfig {
    /// Load a JSON configuration; omitted fields keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> RecorderResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| RecorderError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;

        debug!(?config, "Loaded recorder configuration");
        Ok(config)
    }

    /// Reject values the recorder cannot run with.
    pub fn validate(&self) -> RecorderResult<()> {
        if self.interval_ms == 0 {
            return Err(RecorderError::InvalidConfig(
                "interval_ms must be greater than zero".to_string(),
            ));
        }
        if self.frame_limit == Some(0) {
            return Err(RecorderError::InvalidConfig(
                "frame_limit must be greater than zero when set".to_string(),
            ));
        }
        Ok(())
    }

    /// Capture interval.
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}
