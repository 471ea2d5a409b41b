//! Config subcommands handler

use anyhow::Result;
use std::path::Path;

use multivac::Config;

/// Show the effective configuration as TOML.
pub fn handle_show(config: &Config) -> Result<()> {
    print!("{}", config.to_toml()?);
    Ok(())
}

/// Write the effective configuration so it can be edited.
pub fn handle_init(config: &Config, path: Option<&Path>) -> Result<()> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => Config::config_path()?,
    };
    config.save_to(&path)?;
    println!("Wrote {}", path.display());
    Ok(())
}
