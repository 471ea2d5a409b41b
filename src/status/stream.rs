//! Status stream builder: raw per-test events from a forward line sequence.

use std::path::Path;

use indexmap::IndexMap;
use tracing::debug;

use super::grammar::{hang_test_name, match_line, LineKind};
use super::types::{StatusEvent, TestKey, TestStatus};
use crate::error::Result;
use crate::normalize::LineNormalizer;
use crate::reader::LogLines;

/// Default suffix for tests derived from a hung result file.
pub const DEFAULT_HANG_TEST_SUFFIX: &str = ".test.lua";

/// Single forward pass over one log yielding [`StatusEvent`]s in log order.
///
/// Announcements waiting for a late status are keyed by worker id. A new
/// announcement on a worker id that is still pending replaces the old one,
/// and the replaced test gets no event. This assumes a worker slot runs its
/// tests one after another; it is unverified for logs where announcements
/// of one worker overlap. Whatever is still pending at the end is reported
/// as `fail`.
pub struct StatusStream<I> {
    lines: I,
    normalizer: LineNormalizer,
    hang_test_suffix: String,
    pending: IndexMap<String, TestKey>,
    hang_pending: bool,
    flushing: Option<indexmap::map::IntoIter<String, TestKey>>,
}

impl StatusStream<LogLines> {
    /// Open `path` and stream its status events.
    pub fn open<P: AsRef<Path>>(path: P, hang_test_suffix: &str) -> Result<Self> {
        Ok(Self::new(LogLines::open(path)?, hang_test_suffix))
    }
}

impl<I, L> StatusStream<I>
where
    I: Iterator<Item = Result<L>>,
    L: AsRef<str>,
{
    pub fn new(lines: I, hang_test_suffix: &str) -> Self {
        Self {
            lines,
            normalizer: LineNormalizer::new(),
            hang_test_suffix: hang_test_suffix.to_string(),
            pending: IndexMap::new(),
            hang_pending: false,
            flushing: None,
        }
    }

    fn process(&mut self, raw: &str) -> Option<StatusEvent> {
        let line = self.normalizer.normalize(raw);

        match match_line(&line, !self.pending.is_empty(), self.hang_pending) {
            LineKind::Inline { key, status, .. } => Some(StatusEvent::new(key, status)),
            LineKind::Pending { worker, key } => {
                if let Some(dropped) = self.pending.insert(worker.to_string(), key) {
                    debug!(
                        worker,
                        test = %dropped,
                        "Worker announced a new test before reporting the previous one"
                    );
                }
                None
            }
            LineKind::LateStatus { worker, status } => {
                self.hang_pending = false;
                match self.pending.shift_remove(worker) {
                    Some(key) => Some(StatusEvent::new(key, status)),
                    None => {
                        debug!(worker, %status, "Late status for a worker with nothing pending");
                        None
                    }
                }
            }
            LineKind::HangMarker => {
                self.hang_pending = true;
                None
            }
            LineKind::HangResult { result } => {
                self.hang_pending = false;
                let test = hang_test_name(result, &self.hang_test_suffix);
                Some(StatusEvent::new(TestKey::new(test, None), TestStatus::Hang))
            }
            LineKind::Unmatched => {
                self.hang_pending = false;
                None
            }
        }
    }
}

impl<I, L> Iterator for StatusStream<I>
where
    I: Iterator<Item = Result<L>>,
    L: AsRef<str>,
{
    type Item = Result<StatusEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(unresolved) = self.flushing.as_mut() {
                return unresolved
                    .next()
                    .map(|(_, key)| Ok(StatusEvent::new(key, TestStatus::Fail)));
            }

            match self.lines.next() {
                Some(Ok(line)) => {
                    if let Some(event) = self.process(line.as_ref()) {
                        return Some(Ok(event));
                    }
                }
                Some(Err(e)) => return Some(Err(e)),
                None => {
                    if !self.pending.is_empty() {
                        debug!(
                            count = self.pending.len(),
                            "Reporting tests without a terminal status as failed"
                        );
                    }
                    self.flushing = Some(std::mem::take(&mut self.pending).into_iter());
                }
            }
        }
    }
}
