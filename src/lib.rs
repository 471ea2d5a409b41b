//! multivac: sensors for CI job logs.
//!
//! Two independent analyses run over raw, possibly colourised, test-run
//! job logs:
//!
//! - [`status`] turns the log into a per-test timeline and reconciles
//!   retries into a single verdict per test and configuration
//! - [`classifier`] reads the log from its end and assigns the job a
//!   failure category from a catalogue of known signatures
//!
//! [`report`] and [`batch`] combine both for one or many logs.

pub mod batch;
pub mod classifier;
pub mod config;
pub mod error;
pub mod normalize;
pub mod reader;
pub mod report;
pub mod status;

pub use batch::{BatchRunner, FailureStats};
pub use classifier::{Catalogue, Classification, Classifier};
pub use config::Config;
pub use error::{Result, SensorError};
pub use normalize::{strip_ansi, LineNormalizer};
pub use reader::{LogLines, ReverseLines};
pub use report::JobReport;
pub use status::{StatusEvent, StatusOptions, TestKey, TestStatus};
