//! Errors raised by the log sensors.
//!
//! Noisy or unrecognised log text is never an error; only missing input,
//! I/O failures and a broken pattern catalogue are.

use std::path::PathBuf;

/// Errors that can occur while reading logs or loading a catalogue.
#[derive(Debug, thiserror::Error)]
pub enum SensorError {
    #[error("Failed to open log {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Category '{tag}' has an invalid pattern `{pattern}`: {source}")]
    Pattern {
        tag: String,
        pattern: String,
        source: regex::Error,
    },

    #[error("Invalid failure catalogue: {0}")]
    Catalogue(String),

    #[error("Failed to parse failure catalogue: {0}")]
    CatalogueParse(#[from] toml::de::Error),

    #[error("Failed to write status cache {path}: {source}")]
    Cache {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Result alias used throughout the library.
pub type Result<T, E = SensorError> = std::result::Result<T, E>;

impl SensorError {
    pub(crate) fn open(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SensorError::Open {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SensorError::Read {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SensorError::Write {
            path: path.into(),
            source,
        }
    }

    /// True when the error means the input log does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            SensorError::Open { source, .. } if source.kind() == std::io::ErrorKind::NotFound
        )
    }
}
