//! Tail-first failure classification of one job log.

use std::fs::File;
use std::path::Path;

use tracing::{debug, trace};

use super::types::{Catalogue, Classification, PatternGroup};
use crate::error::{Result, SensorError};
use crate::normalize::LineNormalizer;
use crate::reader::{ReverseLines, DEFAULT_CHUNK_SIZE};

/// Assigns a failure category to job logs.
///
/// For each precedence group, in order, the log is scanned from its last
/// line backwards; the first line matching any category of the group
/// decides. A later group is only consulted once every line has been
/// checked against all earlier ones. The result is
/// [`UNKNOWN_FAILURE`](super::UNKNOWN_FAILURE) when nothing matches.
#[derive(Debug, Clone)]
pub struct Classifier {
    catalogue: Catalogue,
    chunk_size: usize,
}

impl Classifier {
    pub fn new(catalogue: Catalogue) -> Self {
        Self {
            catalogue,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Classifier over the built-in catalogue.
    pub fn builtin() -> Result<Self> {
        Ok(Self::new(Catalogue::builtin()?))
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    pub fn classify<P: AsRef<Path>>(&self, path: P) -> Result<Classification> {
        let path = path.as_ref();

        if self.catalogue.is_empty() {
            // Nothing to scan for, but a missing log is still an error.
            File::open(path).map_err(|e| SensorError::open(path, e))?;
            return Ok(Classification::unknown());
        }

        for group in self.catalogue.groups() {
            let lines = ReverseLines::open_with_chunk_size(path, self.chunk_size)?;
            if let Some(found) = scan_group(group, lines)? {
                debug!(
                    path = %path.display(),
                    category = %found.category,
                    group = %group.precedence,
                    "Classified log"
                );
                return Ok(found);
            }
            trace!(path = %path.display(), group = %group.precedence, "No match in group");
        }

        debug!(path = %path.display(), "No known failure signature");
        Ok(Classification::unknown())
    }
}

/// First match of `group` over `lines`, which should already be in the
/// order they are to be tried (latest first for a log tail).
pub fn scan_group<I, L>(group: &PatternGroup, lines: I) -> Result<Option<Classification>>
where
    I: IntoIterator<Item = Result<L>>,
    L: AsRef<str>,
{
    let mut normalizer = LineNormalizer::new();

    for line in lines {
        let line = line?;
        let clean = normalizer.normalize(line.as_ref());
        if let Some(category) = group.find(&clean) {
            return Ok(Some(Classification::matched(
                category.tag.as_str(),
                clean.into_owned(),
            )));
        }
    }

    Ok(None)
}
