//! Classify command handler

use anyhow::{Context, Result};
use std::path::Path;

use multivac::Config;

/// Print the failure category of one log and the line that decided it.
pub fn handle(config: &Config, log: &Path, catalogue: Option<&Path>, json: bool) -> Result<()> {
    let classifier = config.classifier(catalogue)?;
    let classification = classifier
        .classify(log)
        .with_context(|| format!("Failed to classify {}", log.display()))?;

    if json {
        println!("{}", serde_json::to_string(&classification)?);
        return Ok(());
    }

    println!("category: {}", classification.category);
    if let Some(line) = &classification.matched_line {
        println!("line: {}", line);
    }
    Ok(())
}
