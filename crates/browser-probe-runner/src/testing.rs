//! In-memory backend stub.
//!
//! Lets the runner and the status server be exercised without a real browser
//! service, while recording whether the connection was released.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use browser_probe_core::{ProbeError, Result};

use crate::backend::{BrowserBackend, BrowserPage, BrowserSession};

/// Scripted stand-in for the remote browser backend.
pub struct StubBackend {
    version: String,
    title: String,
    content: String,
    connect_error: Option<String>,
    navigate_error: Option<String>,
    connect_delay: Duration,
    connect_attempts: Arc<AtomicUsize>,
    session_closed: Arc<AtomicBool>,
    page_closed: Arc<AtomicBool>,
}

impl StubBackend {
    /// A backend where every step succeeds.
    pub fn healthy() -> Self {
        Self {
            version: "HeadlessChrome/124.0.6367.78".to_string(),
            title: "Example Domain".to_string(),
            content: "<html><body><h1>Example Domain</h1></body></html>".to_string(),
            connect_error: None,
            navigate_error: None,
            connect_delay: Duration::ZERO,
            connect_attempts: Arc::new(AtomicUsize::new(0)),
            session_closed: Arc::new(AtomicBool::new(false)),
            page_closed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// A backend whose connect call fails with `message`.
    pub fn refusing_connection(message: &str) -> Self {
        Self {
            connect_error: Some(message.to_string()),
            ..Self::healthy()
        }
    }

    /// A backend whose navigate call fails with `message`.
    pub fn failing_navigation(message: &str) -> Self {
        Self {
            navigate_error: Some(message.to_string()),
            ..Self::healthy()
        }
    }

    /// Delay the connect call, keeping a triggered run in flight for a while.
    pub fn with_connect_delay(mut self, delay: Duration) -> Self {
        self.connect_delay = delay;
        self
    }

    pub fn connect_attempts(&self) -> usize {
        self.connect_attempts.load(Ordering::SeqCst)
    }

    pub fn session_closed(&self) -> bool {
        self.session_closed.load(Ordering::SeqCst)
    }

    pub fn page_closed(&self) -> bool {
        self.page_closed.load(Ordering::SeqCst)
    }

    pub fn expected_title(&self) -> &str {
        &self.title
    }

    pub fn expected_content_length(&self) -> usize {
        self.content.len()
    }
}

#[async_trait]
impl BrowserBackend for StubBackend {
    async fn connect(&self, _endpoint: &str, _timeout: Duration) -> Result<Box<dyn BrowserSession>> {
        self.connect_attempts.fetch_add(1, Ordering::SeqCst);
        if !self.connect_delay.is_zero() {
            tokio::time::sleep(self.connect_delay).await;
        }
        if let Some(message) = &self.connect_error {
            return Err(ProbeError::Backend(message.clone()));
        }
        Ok(Box::new(StubSession {
            version: self.version.clone(),
            title: self.title.clone(),
            content: self.content.clone(),
            navigate_error: self.navigate_error.clone(),
            session_closed: self.session_closed.clone(),
            page_closed: self.page_closed.clone(),
        }))
    }
}

struct StubSession {
    version: String,
    title: String,
    content: String,
    navigate_error: Option<String>,
    session_closed: Arc<AtomicBool>,
    page_closed: Arc<AtomicBool>,
}

#[async_trait]
impl BrowserSession for StubSession {
    async fn version(&self) -> Result<String> {
        Ok(self.version.clone())
    }

    async fn new_page(&self) -> Result<Box<dyn BrowserPage>> {
        Ok(Box::new(StubPage {
            title: self.title.clone(),
            content: self.content.clone(),
            navigate_error: self.navigate_error.clone(),
            page_closed: self.page_closed.clone(),
        }))
    }

    async fn close(&mut self) -> Result<()> {
        self.session_closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

struct StubPage {
    title: String,
    content: String,
    navigate_error: Option<String>,
    page_closed: Arc<AtomicBool>,
}

#[async_trait]
impl BrowserPage for StubPage {
    async fn navigate(&self, _url: &str, _timeout: Duration) -> Result<()> {
        match &self.navigate_error {
            Some(message) => Err(ProbeError::Backend(message.clone())),
            None => Ok(()),
        }
    }

    async fn title(&self) -> Result<String> {
        Ok(self.title.clone())
    }

    async fn content(&self) -> Result<String> {
        Ok(self.content.clone())
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.page_closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}
