//! Status reconciler: one final status per test key.

use indexmap::map::Entry;
use indexmap::IndexMap;

use super::types::{StatusEvent, TestKey, TestStatus};

/// Folds raw events into one status per key, in first-seen key order.
///
/// A `pass` recorded over a `fail` becomes `transient fail`: the test was
/// retried and recovered, which is neither a clean pass nor a persistent
/// failure. Every other status overwrites what was recorded.
#[derive(Debug, Default)]
pub struct Reconciler {
    statuses: IndexMap<TestKey, TestStatus>,
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: StatusEvent) {
        match self.statuses.entry(event.key) {
            Entry::Occupied(mut recorded) => {
                let status = if event.status == TestStatus::Pass && *recorded.get() == TestStatus::Fail {
                    TestStatus::TransientFail
                } else {
                    event.status
                };
                recorded.insert(status);
            }
            Entry::Vacant(slot) => {
                slot.insert(event.status);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }

    pub fn finish(self) -> Vec<StatusEvent> {
        self.statuses
            .into_iter()
            .map(|(key, status)| StatusEvent::new(key, status))
            .collect()
    }
}

/// Reconcile a raw event sequence.
pub fn reconcile<I: IntoIterator<Item = StatusEvent>>(events: I) -> Vec<StatusEvent> {
    let mut reconciler = Reconciler::new();
    for event in events {
        reconciler.push(event);
    }
    reconciler.finish()
}
