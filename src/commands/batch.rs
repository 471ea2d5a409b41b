//! Batch command handler

use anyhow::{bail, Context, Result};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use multivac::batch::{discover_logs, BatchRunner, FailureStats, JobOutcome};
use multivac::Config;

pub struct BatchArgs {
    pub inputs: Vec<PathBuf>,
    pub catalogue: Option<PathBuf>,
    pub workers: Option<usize>,
    pub failure_stats: bool,
    pub watch_failure: Option<String>,
    pub use_cache: Option<bool>,
}

/// Build reports for every input log and print them, or a summary of them.
pub fn handle(config: &Config, args: BatchArgs) -> Result<()> {
    let classifier = config.classifier(args.catalogue.as_deref())?;
    let paths = expand_inputs(&args.inputs)?;

    let outcomes = BatchRunner::new(&classifier, config.status_options(args.use_cache))
        .with_workers(args.workers.or(config.batch.workers))
        .run(paths);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    if args.failure_stats {
        write_stats(&mut out, &FailureStats::from_outcomes(&outcomes))?;
    } else if let Some(tag) = &args.watch_failure {
        write_watched(&mut out, &outcomes, tag)?;
    } else {
        write_reports(&mut out, &outcomes)?;
    }
    out.flush()?;

    let failed = outcomes.iter().filter(|o| o.report.is_err()).count();
    if failed > 0 {
        bail!("{} of {} logs could not be processed", failed, outcomes.len());
    }
    Ok(())
}

fn expand_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let logs = discover_logs(input)
                .with_context(|| format!("Failed to list logs in {}", input.display()))?;
            paths.extend(logs);
        } else {
            paths.push(input.clone());
        }
    }
    Ok(paths)
}

fn write_reports(out: &mut impl Write, outcomes: &[JobOutcome]) -> Result<()> {
    for outcome in outcomes {
        match &outcome.report {
            Ok(report) => {
                serde_json::to_writer(&mut *out, report)?;
                writeln!(out)?;
            }
            Err(e) => eprintln!("Error: {}", e),
        }
    }
    Ok(())
}

fn write_stats(out: &mut impl Write, stats: &FailureStats) -> Result<()> {
    for (tag, count) in stats.sorted() {
        writeln!(out, "{} {}", tag, count)?;
    }
    writeln!(out, "total {}", stats.total())?;
    Ok(())
}

fn write_watched(out: &mut impl Write, outcomes: &[JobOutcome], tag: &str) -> Result<()> {
    let reports = outcomes.iter().filter_map(|o| o.report.as_ref().ok());
    for report in reports.filter(|r| r.classification.category == tag) {
        writeln!(out, "{}", report.path.display())?;
        if let Some(line) = &report.classification.matched_line {
            writeln!(out, "\t{}", line)?;
        }
    }
    Ok(())
}
