//! Parallel processing of many job logs.
//!
//! Each log is independent: a [`BatchRunner`] builds one [`JobReport`] per
//! file on a dedicated rayon pool and hands the results back in input
//! order. A file that cannot be processed yields an error for that file
//! only. Aggregation such as [`FailureStats`] is a fold over the results.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{info, warn};

use crate::classifier::{Classification, Classifier};
use crate::error::{Result, SensorError};
use crate::report::JobReport;
use crate::status::StatusOptions;

/// Outcome for one input file.
#[derive(Debug)]
pub struct JobOutcome {
    pub path: PathBuf,
    pub report: Result<JobReport>,
}

/// Builds job reports for many logs in parallel.
pub struct BatchRunner<'a> {
    classifier: &'a Classifier,
    options: StatusOptions,
    /// `None` lets rayon pick one thread per core.
    workers: Option<usize>,
}

impl<'a> BatchRunner<'a> {
    pub fn new(classifier: &'a Classifier, options: StatusOptions) -> Self {
        Self {
            classifier,
            options,
            workers: None,
        }
    }

    pub fn with_workers(mut self, workers: Option<usize>) -> Self {
        self.workers = workers.map(|n| n.max(1));
        self
    }

    /// Process `paths`; the outcomes are in the same order.
    pub fn run(&self, paths: Vec<PathBuf>) -> Vec<JobOutcome> {
        if paths.len() <= 1 {
            return paths.into_iter().map(|path| self.process(path)).collect();
        }

        let mut builder = rayon::ThreadPoolBuilder::new().thread_name(|i| format!("sensor-{}", i));
        if let Some(workers) = self.workers {
            builder = builder.num_threads(workers);
        }

        let pool = match builder.build() {
            Ok(pool) => pool,
            Err(e) => {
                warn!(error = %e, "Failed to create thread pool, processing sequentially");
                return paths.into_iter().map(|path| self.process(path)).collect();
            }
        };

        pool.install(|| {
            paths
                .into_par_iter()
                .map(|path| self.process(path))
                .collect()
        })
    }

    fn process(&self, path: PathBuf) -> JobOutcome {
        let report = JobReport::build(&path, self.classifier, &self.options);
        match &report {
            Ok(report) => info!(
                path = %path.display(),
                category = %report.classification.category,
                failed_tests = report.failed_tests.len(),
                "Processed log"
            ),
            Err(e) => warn!(path = %path.display(), error = %e, "Failed to process log"),
        }
        JobOutcome { path, report }
    }
}

/// `*.log` files directly inside `dir`, sorted by name.
pub fn discover_logs<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let mut logs = Vec::new();

    for entry in fs::read_dir(dir).map_err(|e| SensorError::open(dir, e))? {
        let path = entry.map_err(|e| SensorError::read(dir, e))?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "log") {
            logs.push(path);
        }
    }

    logs.sort();
    Ok(logs)
}

/// Number of jobs per failure category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FailureStats {
    counts: HashMap<String, usize>,
    total: usize,
}

impl FailureStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, classification: &Classification) {
        *self
            .counts
            .entry(classification.category.clone())
            .or_insert(0) += 1;
        self.total += 1;
    }

    pub fn from_outcomes<'a>(outcomes: impl IntoIterator<Item = &'a JobOutcome>) -> Self {
        outcomes
            .into_iter()
            .filter_map(|outcome| outcome.report.as_ref().ok())
            .fold(Self::new(), |mut stats, report| {
                stats.record(&report.classification);
                stats
            })
    }

    pub fn count(&self, category: &str) -> usize {
        self.counts.get(category).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Categories by descending count, ties by tag.
    pub fn sorted(&self) -> Vec<(&str, usize)> {
        let mut entries: Vec<_> = self
            .counts
            .iter()
            .map(|(tag, count)| (tag.as_str(), *count))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries
    }
}
