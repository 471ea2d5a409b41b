//! Side-file cache of raw status events.
//!
//! Stored next to the log as `<log>.test_status.cache.json`, a JSON array
//! of `[test, conf | null, status]` triples. A cache that cannot be read,
//! or that is older than its log, is ignored and rewritten after the next
//! full parse.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::types::{StatusEvent, TestKey, TestStatus};
use crate::error::{Result, SensorError};

type CacheEntry = (String, Option<String>, String);

/// Cache file belonging to one log.
#[derive(Debug, Clone)]
pub struct StatusCache {
    path: PathBuf,
    log: PathBuf,
}

impl StatusCache {
    pub fn for_log<P: AsRef<Path>>(log: P) -> Self {
        let log = log.as_ref().to_path_buf();
        let mut name = OsString::from(log.as_os_str());
        name.push(".test_status.cache.json");
        Self {
            path: PathBuf::from(name),
            log,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Cached events, or `None` when there is no usable cache.
    pub fn load(&self) -> Option<Vec<StatusEvent>> {
        if !self.path.is_file() {
            return None;
        }
        if !self.is_fresh() {
            debug!(path = %self.path.display(), "Ignoring status cache older than its log");
            return None;
        }

        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Ignoring unreadable status cache");
                return None;
            }
        };

        match serde_json::from_str::<Vec<CacheEntry>>(&contents) {
            Ok(entries) => Some(
                entries
                    .into_iter()
                    .map(|(test, conf, status)| {
                        StatusEvent::new(TestKey { test, conf }, TestStatus::parse(&status))
                    })
                    .collect(),
            ),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Ignoring corrupt status cache");
                None
            }
        }
    }

    /// The cache was written no earlier than the log's last change. Missing
    /// timestamps count as stale.
    fn is_fresh(&self) -> bool {
        let modified = |path: &Path| fs::metadata(path).and_then(|m| m.modified());
        match (modified(&self.path), modified(&self.log)) {
            (Ok(cache), Ok(log)) => cache >= log,
            _ => false,
        }
    }

    pub fn store(&self, events: &[StatusEvent]) -> Result<()> {
        let entries: Vec<CacheEntry> = events
            .iter()
            .map(|e| (e.key.test.clone(), e.key.conf.clone(), e.status.to_string()))
            .collect();

        let file = File::create(&self.path).map_err(|e| SensorError::write(&self.path, e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &entries).map_err(|source| SensorError::Cache {
            path: self.path.clone(),
            source,
        })?;
        writer.flush().map_err(|e| SensorError::write(&self.path, e))
    }
}
