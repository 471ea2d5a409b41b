//! Per-job report: reconciled statuses, failed-test attempts, build facts
//! and the failure category of one log.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::classifier::{Classification, Classifier};
use crate::error::Result;
use crate::normalize::LineNormalizer;
use crate::reader::LogLines;
use crate::status::{self, RawStatusEvent, ReconciledStatusEvent, StatusOptions, TestStatus};

static RUNNER_VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Current runner version: '(\d*.\d*.\d*)'").expect("runner version pattern is valid")
});

// Self-hosted FreeBSD runners print their version differently.
static ALT_RUNNER_VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Runner Version: (\d*.\d*.\S*)").expect("runner version pattern is valid")
});

static COMPILER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"C compiler identification is (\S* \d*.\d*.\d*)").expect("compiler pattern is valid")
});

static QUEUED_AT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2})").expect("timestamp pattern is valid")
});

/// Harness a test belongs to, derived from its suite directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestType {
    Tap,
    Luatest,
    /// Result-file comparison tests.
    Diff,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestSubtype {
    Python,
    Sql,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestKind {
    pub test_type: TestType,
    pub test_subtype: Option<TestSubtype>,
}

impl TestKind {
    /// Kind of the test at `name` (`<suite>/<file>`).
    pub fn of(name: &str) -> Self {
        let suite = name.split('/').next().unwrap_or(name);

        if suite.ends_with("tap") {
            return Self::new(TestType::Tap, None);
        }
        if suite.ends_with("luatest") {
            return Self::new(TestType::Luatest, None);
        }

        let subtype = if suite.contains("sql") {
            Some(TestSubtype::Sql)
        } else if suite.ends_with("py") {
            Some(TestSubtype::Python)
        } else {
            None
        };
        Self::new(TestType::Diff, subtype)
    }

    fn new(test_type: TestType, test_subtype: Option<TestSubtype>) -> Self {
        Self {
            test_type,
            test_subtype,
        }
    }
}

/// One failed run of a test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedTest {
    pub name: String,
    /// Configuration, `"none"` when the test has none.
    pub conf: String,
    #[serde(flatten)]
    pub kind: TestKind,
    /// 1 for the first failure of a test key, counting up on retries.
    pub attempt: u32,
}

/// Failed runs among `events`, numbered per test key.
pub fn failed_tests(events: &[RawStatusEvent]) -> Vec<FailedTest> {
    let mut attempts = HashMap::new();

    events
        .iter()
        .filter(|event| event.status == TestStatus::Fail)
        .map(|event| {
            let attempt = attempts.entry(&event.key).or_insert(0u32);
            *attempt += 1;
            FailedTest {
                name: event.key.test.clone(),
                conf: event.key.conf_or_none().to_string(),
                kind: TestKind::of(&event.key.test),
                attempt: *attempt,
            }
        })
        .collect()
}

/// Build environment facts found in a log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogFacts {
    /// A CMake summary reported a `Debug` target.
    pub debug_build: bool,
    pub runner_version: Option<String>,
    /// Last C compiler identified in the log.
    pub compiler: Option<String>,
    /// Timestamp of the first line.
    pub queued_at: Option<DateTime<Utc>>,
}

impl LogFacts {
    pub fn scan<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_lines(LogLines::open(path)?)
    }

    pub fn from_lines<I, L>(lines: I) -> Result<Self>
    where
        I: IntoIterator<Item = Result<L>>,
        L: AsRef<str>,
    {
        let mut facts = LogFacts::default();
        let mut normalizer = LineNormalizer::new();
        let mut first = true;

        for line in lines {
            let line = line?;
            let line = normalizer.normalize(line.as_ref());

            if first {
                facts.queued_at = parse_queued_at(&line);
                first = false;
            }
            if !facts.debug_build && line.contains("| Target:") && line.ends_with("Debug") {
                facts.debug_build = true;
            }
            if facts.runner_version.is_none() {
                facts.runner_version = RUNNER_VERSION_RE
                    .captures(&line)
                    .or_else(|| ALT_RUNNER_VERSION_RE.captures(&line))
                    .map(|caps| caps[1].to_string());
            }
            if let Some(caps) = COMPILER_RE.captures(&line) {
                facts.compiler = Some(caps[1].to_string());
            }
        }

        Ok(facts)
    }
}

fn parse_queued_at(line: &str) -> Option<DateTime<Utc>> {
    let caps = QUEUED_AT_RE.captures(line)?;
    let naive = NaiveDateTime::parse_from_str(&caps[1], "%Y-%m-%dT%H:%M:%S").ok()?;
    Some(Utc.from_utc_datetime(&naive))
}

/// Everything known about one job log.
#[derive(Debug, Clone, Serialize)]
pub struct JobReport {
    pub path: PathBuf,
    pub classification: Classification,
    #[serde(flatten)]
    pub facts: LogFacts,
    pub statuses: Vec<ReconciledStatusEvent>,
    pub failed_tests: Vec<FailedTest>,
}

impl JobReport {
    pub fn build<P: AsRef<Path>>(
        path: P,
        classifier: &Classifier,
        options: &StatusOptions,
    ) -> Result<Self> {
        let path = path.as_ref();
        let raw = status::raw_statuses(path, options)?;
        let failed_tests = failed_tests(&raw);
        let statuses = status::reconcile(raw);
        let facts = LogFacts::scan(path)?;
        let classification = classifier.classify(path)?;

        Ok(Self {
            path: path.to_path_buf(),
            classification,
            facts,
            statuses,
            failed_tests,
        })
    }
}
