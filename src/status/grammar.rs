//! Test-status grammar: recognises one normalized log line.
//!
//! test-run prints one line per finished test:
//!
//! ```text
//! 2021-06-01T10:00:00.1234567Z [001] sql/select.test.lua   memtx   [ pass ]
//! 2021-06-01T10:00:00.1234567Z [002] box/tx.test.lua       Test timeout of 310 secs reached\t[ fail ]
//! ```
//!
//! When several workers share the terminal the status may arrive later on
//! its own line (`[002] [ fail ]`). A result-file mismatch is reported as
//! `Test hung! Result content mismatch:` followed by a `--- <suite>/<name>.result`
//! diff header.

use std::sync::LazyLock;

use regex::Regex;

use super::types::{TestKey, TestStatus};

const TIMESTAMP: &str = r"\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}.\d+Z";
const WORKER: &str = r"(?P<wid>\[\d+\])";
// The dots are wildcards on purpose: luatest names like `foo/bar_test.lua` match.
const TEST: &str = r"(?P<test>[^ ]+/[^ ]+(.test.lua|.test.sql|.test.py|.test|>))";
const CONF: &str = r"(?P<conf>[^\s\[]+)?";
const STATUS: &str = r"((Test timeout of \d+ secs reached\t)?\[ (?P<status>[^ ]+) \])?";
const RESULT: &str = r"(?P<result>[^ ]+/[^ ]+\.result)";

static TEST_STATUS_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        "^(?:{TIMESTAMP} +)?{WORKER} +{TEST} +{CONF} +{STATUS}$"
    ))
    .expect("test status grammar is valid")
});

static LATE_STATUS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^.*(?P<wid>\[\d+\]) \[ (?P<status>[a-z]+) \]").expect("late status grammar is valid")
});

static HANG_MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^(?:{TIMESTAMP} +)?Test hung! Result content mismatch:\s*$"
    ))
    .expect("hang marker grammar is valid")
});

static HANG_RESULT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^(?:{TIMESTAMP} +)?--- {RESULT}\b")).expect("hang result grammar is valid")
});

/// What a single line means to the status stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// Test announcement with its status on the same line.
    Inline {
        worker: &'a str,
        key: TestKey,
        status: TestStatus,
    },
    /// Test announcement whose status has not been printed yet.
    Pending { worker: &'a str, key: TestKey },
    /// `[wid] [ status ]` resolving an earlier announcement.
    LateStatus { worker: &'a str, status: TestStatus },
    /// `Test hung! Result content mismatch:`
    HangMarker,
    /// Diff header naming the result file of the hung test.
    HangResult { result: &'a str },
    /// Anything else; log text is noisy by nature.
    Unmatched,
}

/// Classify one normalized line.
///
/// `awaiting` tells whether any announcement is still pending (late status
/// lines are only looked for then); `hang_pending` whether the previous
/// line was a hang marker.
pub fn match_line(line: &str, awaiting: bool, hang_pending: bool) -> LineKind<'_> {
    if let Some(caps) = TEST_STATUS_LINE_RE.captures(line) {
        if let (Some(worker), Some(test)) = (caps.name("wid"), caps.name("test")) {
            let key = TestKey::new(test.as_str(), caps.name("conf").map(|m| m.as_str()));
            return match caps.name("status") {
                Some(status) => LineKind::Inline {
                    worker: worker.as_str(),
                    key,
                    status: TestStatus::parse(status.as_str()),
                },
                None => LineKind::Pending {
                    worker: worker.as_str(),
                    key,
                },
            };
        }
    }

    if awaiting {
        if let Some(caps) = LATE_STATUS_RE.captures(line) {
            if let (Some(worker), Some(status)) = (caps.name("wid"), caps.name("status")) {
                return LineKind::LateStatus {
                    worker: worker.as_str(),
                    status: TestStatus::parse(status.as_str()),
                };
            }
        }
    }

    if HANG_MARKER_RE.is_match(line) {
        return LineKind::HangMarker;
    }

    if hang_pending {
        if let Some(result) = HANG_RESULT_RE.captures(line).and_then(|caps| caps.name("result")) {
            return LineKind::HangResult {
                result: result.as_str(),
            };
        }
    }

    LineKind::Unmatched
}

/// Best guess of the test behind a result file: `suite/name.result`
/// becomes `suite/name` + `suffix`.
///
/// The real kind (`.test.lua`, `.test.sql`, `.test.py`) is unknown here.
pub fn hang_test_name(result: &str, suffix: &str) -> String {
    let stem = result.split_once('.').map_or(result, |(stem, _)| stem);
    format!("{stem}{suffix}")
}
