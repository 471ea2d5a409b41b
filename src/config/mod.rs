//! Configuration management for multivac

mod io;
mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::classifier::{Catalogue, Classifier};
use crate::status::StatusOptions;

impl Config {
    /// Get the config file path (~/.config/multivac/config.toml)
    pub fn config_path() -> Result<PathBuf> {
        io::config_path()
    }

    /// Get the config directory path (~/.config/multivac)
    pub fn config_dir() -> Result<PathBuf> {
        io::config_dir()
    }

    /// Load configuration from the default location, or return defaults if not found
    pub fn load() -> Result<Self> {
        io::load_from(&io::config_path()?)
    }

    /// Load configuration from an explicit file, or return defaults if not found
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        io::load_from(path.as_ref())
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        io::save_to(self, &io::config_path()?)
    }

    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        io::save_to(self, path.as_ref())
    }

    /// Configuration rendered as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    /// Status extraction options; `use_cache` overrides `status.cache` when set
    pub fn status_options(&self, use_cache: Option<bool>) -> StatusOptions {
        StatusOptions {
            hang_test_suffix: self.status.hang_test_suffix.clone(),
            use_cache: use_cache.unwrap_or(self.status.cache),
        }
    }

    /// Build a classifier from `catalogue`, `classifier.catalogue` or the
    /// built-in signatures, in that order of preference
    pub fn classifier(&self, catalogue: Option<&Path>) -> Result<Classifier> {
        let catalogue = match catalogue.or(self.classifier.catalogue.as_deref()) {
            Some(path) => Catalogue::load(path)
                .with_context(|| format!("Failed to load catalogue: {:?}", path))?,
            None => Catalogue::builtin().context("Built-in catalogue is invalid")?,
        };
        Ok(Classifier::new(catalogue).with_chunk_size(self.reader.chunk_size))
    }
}
