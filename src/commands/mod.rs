//! Command handlers for the multivac CLI.
//!
//! Each submodule handles a specific CLI command or command group.
//! The main dispatch logic remains in main.rs.

pub mod batch;
pub mod catalogue;
pub mod classify;
pub mod config;
pub mod status;

use anyhow::Result;
use std::path::Path;

use multivac::Config;

/// Load the configuration from `path`, or from the default location.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}
