//! Failure classification data model.

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Category reported when no signature matches.
pub const UNKNOWN_FAILURE: &str = "unknown_failure";

/// Precedence group of a category. Every category of an earlier group is
/// tried against the whole log before any category of a later one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Precedence {
    /// Precise, context-rich signatures.
    Specific,
    /// Broad catch-alls.
    Generic,
}

impl Precedence {
    pub fn as_str(self) -> &'static str {
        match self {
            Precedence::Specific => "specific",
            Precedence::Generic => "generic",
        }
    }
}

impl fmt::Display for Precedence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One failure signature: a tag and the patterns that identify it.
#[derive(Debug, Clone)]
pub struct FailureCategory {
    pub tag: String,
    pub group: Precedence,
    pub description: Option<String>,
    pub patterns: Vec<Regex>,
}

impl FailureCategory {
    /// Whether any pattern occurs in `line`.
    pub fn matches(&self, line: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(line))
    }
}

/// Categories sharing one precedence, in catalogue order.
#[derive(Debug, Clone)]
pub struct PatternGroup {
    pub precedence: Precedence,
    pub categories: Vec<FailureCategory>,
}

impl PatternGroup {
    /// First category of the group matching `line`.
    pub fn find(&self, line: &str) -> Option<&FailureCategory> {
        self.categories.iter().find(|category| category.matches(line))
    }
}

/// Immutable, compiled set of failure signatures ordered by precedence.
///
/// Built through [`Catalogue::from_specs`] and friends in
/// [`super::catalogue`]; only non-empty groups are kept.
#[derive(Debug, Clone, Default)]
pub struct Catalogue {
    pub(crate) groups: Vec<PatternGroup>,
}

impl Catalogue {
    pub fn groups(&self) -> &[PatternGroup] {
        &self.groups
    }

    pub fn categories(&self) -> impl Iterator<Item = &FailureCategory> {
        self.groups.iter().flat_map(|group| group.categories.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn len(&self) -> usize {
        self.categories().count()
    }
}

/// Category assigned to a whole job log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub category: String,
    pub matched_line: Option<String>,
}

impl Classification {
    pub fn matched(category: impl Into<String>, line: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            matched_line: Some(line.into()),
        }
    }

    pub fn unknown() -> Self {
        Self {
            category: UNKNOWN_FAILURE.to_string(),
            matched_line: None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.matched_line.is_none() && self.category == UNKNOWN_FAILURE
    }
}
