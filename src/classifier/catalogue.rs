//! Loading, validation and documentation of failure catalogues.
//!
//! A catalogue is a TOML document of `[[category]]` tables:
//!
//! ```toml
//! [[category]]
//! tag = "ctest_error"
//! group = "specific"
//! description = "CTest reported failures."
//! patterns = ['The following tests FAILED:']
//! ```

use std::collections::HashSet;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::types::{Catalogue, FailureCategory, PatternGroup, Precedence};
use crate::error::{Result, SensorError};

/// Signatures shipped with the crate.
pub const BUILTIN_CATALOGUE: &str = include_str!("builtin.toml");

/// Uncompiled category as written in a catalogue file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySpec {
    pub tag: String,
    pub group: Precedence,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub patterns: Vec<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct CatalogueFile {
    #[serde(rename = "category", default)]
    categories: Vec<CategorySpec>,
}

impl CategorySpec {
    fn compile(self) -> Result<FailureCategory> {
        if self.tag.trim().is_empty() {
            return Err(SensorError::Catalogue("category tag must not be empty".into()));
        }
        if self.patterns.is_empty() {
            return Err(SensorError::Catalogue(format!(
                "category '{}' has no patterns",
                self.tag
            )));
        }

        let patterns = self
            .patterns
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|source| SensorError::Pattern {
                    tag: self.tag.clone(),
                    pattern: pattern.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(FailureCategory {
            tag: self.tag,
            group: self.group,
            description: self.description,
            patterns,
        })
    }
}

impl Catalogue {
    /// The built-in catalogue.
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_CATALOGUE)
    }

    /// Load a catalogue file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| SensorError::read(path, e))?;
        let catalogue = Self::from_toml_str(&contents)?;
        debug!(
            path = %path.display(),
            categories = catalogue.len(),
            "Loaded failure catalogue"
        );
        Ok(catalogue)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let file: CatalogueFile = toml::from_str(contents)?;
        Self::from_specs(file.categories)
    }

    /// Compile and validate categories.
    ///
    /// Order within a group is preserved; groups are ordered by precedence.
    /// Fails on an empty tag, a category without patterns, a pattern that
    /// does not compile or a repeated tag.
    pub fn from_specs(specs: impl IntoIterator<Item = CategorySpec>) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut groups: Vec<PatternGroup> = Vec::new();

        for spec in specs {
            if !seen.insert(spec.tag.clone()) {
                return Err(SensorError::Catalogue(format!(
                    "duplicate category tag '{}'",
                    spec.tag
                )));
            }

            let category = spec.compile()?;
            match groups.iter_mut().find(|g| g.precedence == category.group) {
                Some(group) => group.categories.push(category),
                None => groups.push(PatternGroup {
                    precedence: category.group,
                    categories: vec![category],
                }),
            }
        }

        groups.sort_by_key(|group| group.precedence);
        Ok(Self { groups })
    }

    /// Categories back in their file form.
    pub fn to_specs(&self) -> Vec<CategorySpec> {
        self.categories()
            .map(|category| CategorySpec {
                tag: category.tag.clone(),
                group: category.group,
                description: category.description.clone(),
                patterns: category
                    .patterns
                    .iter()
                    .map(|re| re.as_str().to_string())
                    .collect(),
            })
            .collect()
    }

    /// Markdown reference of every category, in precedence order. Each
    /// category carries an anchor named after its tag.
    pub fn render_markdown(&self) -> String {
        let mut out = String::from("# Failure categories\n");

        for group in self.groups() {
            let _ = write!(out, "\n## {} signatures\n", capitalize(group.precedence.as_str()));
            for category in &group.categories {
                let _ = write!(
                    out,
                    "\n<a id=\"{0}\"></a>\n\n### `{0}`\n\n",
                    category.tag
                );
                if let Some(description) = &category.description {
                    let _ = writeln!(out, "{}\n", description);
                }
                out.push_str("```text\n");
                for re in &category.patterns {
                    let _ = writeln!(out, "{}", re.as_str());
                }
                out.push_str("```\n");
            }
        }

        out
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
