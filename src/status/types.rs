//! Test status data model.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Serialized form of an absent configuration.
pub const NO_CONF: &str = "none";

/// Identifies one test invocation context within a log.
///
/// An absent configuration is a distinct key from every present one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TestKey {
    pub test: String,
    #[serde(rename = "configuration")]
    pub conf: Option<String>,
}

impl TestKey {
    pub fn new(test: impl Into<String>, conf: Option<&str>) -> Self {
        Self {
            test: test.into(),
            conf: conf.map(str::to_string),
        }
    }

    /// Configuration, or [`NO_CONF`] when absent.
    pub fn conf_or_none(&self) -> &str {
        self.conf.as_deref().unwrap_or(NO_CONF)
    }
}

impl fmt::Display for TestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.test, self.conf_or_none())
    }
}

/// Outcome of one test run.
///
/// `Hang` only comes from the result-mismatch rule and `TransientFail` only
/// from reconciliation; unknown status words are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TestStatus {
    Pass,
    Fail,
    TransientFail,
    Hang,
    Skip,
    Disabled,
    Other(String),
}

impl TestStatus {
    /// Map a status word as printed by the test runner.
    pub fn parse(word: &str) -> Self {
        match word {
            "pass" => TestStatus::Pass,
            "fail" => TestStatus::Fail,
            "transient fail" => TestStatus::TransientFail,
            "hang" => TestStatus::Hang,
            "skip" => TestStatus::Skip,
            "disabled" => TestStatus::Disabled,
            other => TestStatus::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TestStatus::Pass => "pass",
            TestStatus::Fail => "fail",
            TestStatus::TransientFail => "transient fail",
            TestStatus::Hang => "hang",
            TestStatus::Skip => "skip",
            TestStatus::Disabled => "disabled",
            TestStatus::Other(word) => word,
        }
    }

    /// Whether the status is worth reporting as a problem.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            TestStatus::Fail | TestStatus::TransientFail | TestStatus::Hang
        )
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for TestStatus {
    fn from(word: String) -> Self {
        TestStatus::parse(&word)
    }
}

impl From<TestStatus> for String {
    fn from(status: TestStatus) -> Self {
        status.as_str().to_string()
    }
}

/// A test key paired with a status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEvent {
    #[serde(flatten)]
    pub key: TestKey,
    pub status: TestStatus,
}

/// Event as encountered in the log; keys may repeat on retries.
pub type RawStatusEvent = StatusEvent;

/// Final status of a key after reconciliation; one per key.
pub type ReconciledStatusEvent = StatusEvent;

impl StatusEvent {
    pub fn new(key: TestKey, status: TestStatus) -> Self {
        Self { key, status }
    }

    /// One-line text form used by the command line interface.
    pub fn to_line(&self) -> String {
        format!(
            "event: test status; test: {}; conf: {}; status: {}",
            self.key.test,
            self.key.conf_or_none(),
            self.status
        )
    }
}
