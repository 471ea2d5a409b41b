//! Status command handler

use anyhow::{Context, Result};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use multivac::status::{self, StatusEvent};
use multivac::Config;

/// Print the test statuses of one log.
pub fn handle(
    config: &Config,
    log: &Path,
    raw: bool,
    json: bool,
    use_cache: Option<bool>,
) -> Result<()> {
    let options = config.status_options(use_cache);
    let events = if raw {
        status::raw_statuses(log, &options)
    } else {
        status::test_statuses(log, &options)
    }
    .with_context(|| format!("Failed to read test statuses from {}", log.display()))?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    write_events(&mut out, &events, json)?;
    out.flush()?;
    Ok(())
}

pub fn write_events(out: &mut impl Write, events: &[StatusEvent], json: bool) -> Result<()> {
    for event in events {
        if json {
            serde_json::to_writer(&mut *out, event)?;
            writeln!(out)?;
        } else {
            writeln!(out, "{}", event.to_line())?;
        }
    }
    Ok(())
}
