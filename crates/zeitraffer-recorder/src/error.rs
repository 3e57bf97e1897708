//! Error types for the recorder module.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while configuring or writing a recording.
#[derive(Debug, Error)]
pub enum RecorderError {
    /// Filesystem error.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Image encoding error.
    #[error("Failed to encode {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Configuration file could not be parsed.
    #[error("Invalid configuration file: {0}")]
    Config(#[from] serde_json::Error),

    /// Configuration parsed but holds unusable values.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
