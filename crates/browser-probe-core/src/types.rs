//! The shared test-result record returned by every HTTP route.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome classification of the most recent connectivity run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Pending,
    Success,
    Failed,
}

/// Per-step outcomes of a run. Fields are filled in as steps complete, so a
/// failed run keeps whatever the steps before the failure produced.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_creation: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub navigation: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_length: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

/// The single process-wide result record. Replaced wholesale at the end of
/// each run; last write wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    pub status: TestStatus,
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,

    /// Elapsed wall-clock time of the run, formatted as `"<millis>ms"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,

    /// Monotonic run identifier, so an out-of-order overwrite by a slower
    /// concurrent run is detectable in logs and responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run: Option<u64>,

    pub details: TestDetails,
}

impl TestResult {
    /// The record held before any run has completed.
    pub fn pending() -> Self {
        Self {
            status: TestStatus::Pending,
            message: "Test not yet run".to_string(),
            timestamp: None,
            duration: None,
            run: None,
            details: TestDetails::default(),
        }
    }
}

/// Format an elapsed duration the way the result record carries it.
pub fn format_duration(elapsed: Duration) -> String {
    format!("{}ms", elapsed.as_millis())
}
