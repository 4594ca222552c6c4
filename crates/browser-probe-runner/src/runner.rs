//! The seven-step connectivity test.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::{error, info, warn};

use browser_probe_core::types::format_duration;
use browser_probe_core::{Config, ProbeError, Result, TestDetails, TestResult, TestStatus};

use crate::backend::{BrowserBackend, BrowserSession};
use crate::classify::FailureKind;
use crate::store::ResultStore;

/// Runs the browser connectivity check and records the outcome.
///
/// A run never returns an error to its caller: every failure is folded into
/// the stored [`TestResult`] and the log narrative.
pub struct ConnectivityTest {
    config: Arc<Config>,
    backend: Arc<dyn BrowserBackend>,
    store: Arc<ResultStore>,
}

impl ConnectivityTest {
    pub fn new(config: Arc<Config>, backend: Arc<dyn BrowserBackend>, store: Arc<ResultStore>) -> Self {
        Self {
            config,
            backend,
            store,
        }
    }

    /// Execute one run and replace the stored result.
    pub async fn run(&self) {
        let run_id = self.store.begin_run();
        info!(run = run_id, "starting browser connectivity test");

        let endpoint = match self.config.require_endpoint() {
            Ok(endpoint) => endpoint.to_string(),
            Err(err) => {
                error!(run = run_id, %err, "connectivity test cannot start");
                self.store
                    .complete(TestResult {
                        status: TestStatus::Failed,
                        message: err.to_string(),
                        timestamp: Some(Utc::now()),
                        duration: None,
                        run: Some(run_id),
                        details: TestDetails {
                            error: Some("Missing environment variable".to_string()),
                            ..Default::default()
                        },
                    })
                    .await;
                return;
            }
        };

        let started = Instant::now();
        let mut details = TestDetails::default();
        let outcome = self.exercise(&endpoint, &mut details).await;
        let elapsed = started.elapsed();

        let result = match outcome {
            Ok(()) => {
                info!(
                    run = run_id,
                    duration_ms = elapsed.as_millis() as u64,
                    "all connectivity checks passed"
                );
                TestResult {
                    status: TestStatus::Success,
                    message: "All tests passed".to_string(),
                    timestamp: Some(Utc::now()),
                    duration: Some(format_duration(elapsed)),
                    run: Some(run_id),
                    details,
                }
            }
            Err(err) => {
                let stack = error_chain(&err);
                error!(
                    run = run_id,
                    duration_ms = elapsed.as_millis() as u64,
                    error = %err,
                    "connectivity test failed"
                );
                for hint in FailureKind::from_message(&stack).hints() {
                    warn!("troubleshooting: {hint}");
                }
                details.error = Some(err.to_string());
                details.stack = Some(stack);
                TestResult {
                    status: TestStatus::Failed,
                    message: err.to_string(),
                    timestamp: Some(Utc::now()),
                    duration: Some(format_duration(elapsed)),
                    run: Some(run_id),
                    details,
                }
            }
        };

        self.store.complete(result).await;
    }

    /// Connect, drive the page steps, and release the connection on every
    /// path out of the sequence.
    async fn exercise(&self, endpoint: &str, details: &mut TestDetails) -> Result<()> {
        info!(step = "1/7", "connecting to browser service");
        let mut session = self
            .backend
            .connect(endpoint, self.config.connect_timeout)
            .await?;
        details.connection = Some("success".to_string());

        let outcome = self.drive(session.as_mut(), details).await;

        if let Err(err) = session.close().await {
            warn!(error = %err, "failed to close browser connection");
        } else {
            info!("browser connection closed");
        }

        outcome
    }

    async fn drive(&self, session: &mut dyn BrowserSession, details: &mut TestDetails) -> Result<()> {
        info!(step = "2/7", "querying browser version");
        let version = session.version().await?;
        info!(step = "2/7", %version, "browser version received");
        details.version = Some(version);

        info!(step = "3/7", "creating new page");
        let page = session.new_page().await?;
        details.page_creation = Some("success".to_string());

        info!(step = "4/7", url = %self.config.target_url, "navigating");
        page.navigate(&self.config.target_url, self.config.navigate_timeout)
            .await?;
        details.navigation = Some("success".to_string());

        info!(step = "5/7", "reading page title");
        let title = page.title().await?;
        info!(step = "5/7", %title, "page title received");
        details.page_title = Some(title);

        info!(step = "6/7", "reading page content");
        let content = page.content().await?;
        info!(step = "6/7", content_length = content.len(), "page content received");
        details.content_length = Some(content.len());

        info!(step = "7/7", "closing page");
        page.close().await?;

        Ok(())
    }
}

/// Render an error and its causes, the closest thing to a stack trace the
/// stored result carries.
fn error_chain(err: &ProbeError) -> String {
    let mut rendered = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        rendered.push_str("\ncaused by: ");
        rendered.push_str(&cause.to_string());
        source = cause.source();
    }
    rendered
}
