//! Configuration type definitions and defaults

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::reader::DEFAULT_CHUNK_SIZE;
use crate::status::DEFAULT_HANG_TEST_SUFFIX;

/// Upper bound for `batch.workers`.
pub const MAX_WORKERS: usize = 256;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub reader: ReaderConfig,
    #[serde(default)]
    pub status: StatusConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub batch: BatchConfig,
}

/// Log traversal configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReaderConfig {
    /// Bytes read per step when walking a log backwards
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

pub fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
        }
    }
}

/// Test status extraction configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusConfig {
    /// Suffix of test names derived from a hung result file
    #[serde(default = "default_hang_test_suffix")]
    pub hang_test_suffix: String,
    /// Keep a `<log>.test_status.cache.json` next to each log
    #[serde(default)]
    pub cache: bool,
}

pub fn default_hang_test_suffix() -> String {
    DEFAULT_HANG_TEST_SUFFIX.to_string()
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            hang_test_suffix: default_hang_test_suffix(),
            cache: false,
        }
    }
}

/// Failure classification configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Catalogue file replacing the built-in signatures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalogue: Option<PathBuf>,
}

/// Batch processing configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Worker threads; one per core when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workers: Option<usize>,
}

impl Config {
    pub fn validate(&self) -> Result<(), String> {
        if self.reader.chunk_size == 0 {
            return Err("reader.chunk_size must be > 0".to_string());
        }
        if self.status.hang_test_suffix.is_empty() {
            return Err("status.hang_test_suffix must not be empty".to_string());
        }
        if let Some(0) = self.batch.workers {
            return Err("batch.workers must be > 0".to_string());
        }
        if let Some(w) = self.batch.workers {
            if w > MAX_WORKERS {
                return Err(format!(
                    "batch.workers {} exceeds maximum ({})",
                    w, MAX_WORKERS
                ));
            }
        }
        Ok(())
    }
}
