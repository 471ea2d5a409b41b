//! Catalogue command handler

use anyhow::Result;
use std::path::Path;

use multivac::Config;

/// Print Markdown documentation of the effective catalogue.
pub fn handle(config: &Config, catalogue: Option<&Path>) -> Result<()> {
    let classifier = config.classifier(catalogue)?;
    print!("{}", classifier.catalogue().render_markdown());
    Ok(())
}
