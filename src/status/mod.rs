//! Per-test pass/fail/hang timeline extracted from free-form worker output.
//!
//! Pipeline for one log:
//!
//! ```text
//! LogLines -> LineNormalizer -> grammar::match_line -> StatusStream -> Reconciler
//! ```
//!
//! [`raw_statuses`] stops after the stream (retries are visible),
//! [`test_statuses`] reconciles to one status per test key.

pub mod cache;
pub mod grammar;
pub mod reconcile;
pub mod stream;
pub mod types;

pub use cache::StatusCache;
pub use grammar::{match_line, LineKind};
pub use reconcile::{reconcile, Reconciler};
pub use stream::{StatusStream, DEFAULT_HANG_TEST_SUFFIX};
pub use types::{
    RawStatusEvent, ReconciledStatusEvent, StatusEvent, TestKey, TestStatus, NO_CONF,
};

use std::path::Path;

use tracing::{debug, warn};

use crate::error::Result;

/// Options for status extraction.
#[derive(Debug, Clone)]
pub struct StatusOptions {
    /// Suffix appended to tests derived from a hung result file.
    pub hang_test_suffix: String,
    /// Read and write the side-file cache.
    pub use_cache: bool,
}

impl Default for StatusOptions {
    fn default() -> Self {
        Self {
            hang_test_suffix: DEFAULT_HANG_TEST_SUFFIX.to_string(),
            use_cache: false,
        }
    }
}

/// Raw status events of a log in encounter order.
pub fn raw_statuses<P: AsRef<Path>>(path: P, options: &StatusOptions) -> Result<Vec<RawStatusEvent>> {
    let path = path.as_ref();
    // Opened up front so a missing log fails even when a cache exists.
    let stream = StatusStream::open(path, &options.hang_test_suffix)?;

    if !options.use_cache {
        return stream.collect();
    }

    let cache = StatusCache::for_log(path);
    if let Some(events) = cache.load() {
        debug!(path = %path.display(), count = events.len(), "Using cached test statuses");
        return Ok(events);
    }

    let events = stream.collect::<Result<Vec<_>>>()?;
    if let Err(e) = cache.store(&events) {
        warn!(path = %cache.path().display(), error = %e, "Failed to write status cache");
    }
    Ok(events)
}

/// One reconciled status per test key, in first-seen order.
pub fn test_statuses<P: AsRef<Path>>(path: P, options: &StatusOptions) -> Result<Vec<ReconciledStatusEvent>> {
    Ok(reconcile(raw_statuses(path, options)?))
}
