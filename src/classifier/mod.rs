//! Failure classification of job logs.
//!
//! A [`Catalogue`] holds the known failure signatures, grouped by
//! [`Precedence`]. The [`Classifier`] scans a log tail-first once per group
//! and reports the first signature found.

pub mod catalogue;
pub mod classify;
pub mod types;

pub use catalogue::{CategorySpec, BUILTIN_CATALOGUE};
pub use classify::{scan_group, Classifier};
pub use types::{
    Catalogue, Classification, FailureCategory, PatternGroup, Precedence, UNKNOWN_FAILURE,
};
