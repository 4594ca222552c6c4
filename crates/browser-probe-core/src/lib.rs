//! Core types, config, and errors for browser-probe.

pub mod config;
pub mod error;
pub mod types;

pub use config::Config;
pub use error::{ProbeError, Result};
pub use types::{TestDetails, TestResult, TestStatus};
