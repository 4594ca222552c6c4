//! chromiumoxide-backed implementation of the backend traits.
//!
//! Connects to an already-running remote browser via its WebSocket debug URL
//! (e.g. a browserless deployment). Nothing is launched locally.

use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::Browser;
use chromiumoxide::error::CdpError;
use chromiumoxide::page::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::debug;

use browser_probe_core::{ProbeError, Result};

use crate::backend::{BrowserBackend, BrowserPage, BrowserSession};

fn backend_err(err: CdpError) -> ProbeError {
    ProbeError::Backend(err.to_string())
}

/// CDP client for a remote browser reached over WebSocket.
#[derive(Debug, Default)]
pub struct CdpBackend;

impl CdpBackend {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl BrowserBackend for CdpBackend {
    async fn connect(&self, endpoint: &str, limit: Duration) -> Result<Box<dyn BrowserSession>> {
        let (browser, mut handler) = timeout(limit, Browser::connect(endpoint))
            .await
            .map_err(|_| {
                ProbeError::Backend(format!(
                    "timeout after {}ms connecting to browser websocket",
                    limit.as_millis()
                ))
            })?
            .map_err(backend_err)?;

        // The handler is the CDP event loop; it must be polled for the
        // lifetime of the connection.
        let driver = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(err) = event {
                    debug!(error = %err, "CDP handler stopped");
                    break;
                }
            }
        });

        Ok(Box::new(CdpSession { browser, driver }))
    }
}

struct CdpSession {
    browser: Browser,
    driver: JoinHandle<()>,
}

#[async_trait]
impl BrowserSession for CdpSession {
    async fn version(&self) -> Result<String> {
        let version = self.browser.version().await.map_err(backend_err)?;
        Ok(version.product)
    }

    async fn new_page(&self) -> Result<Box<dyn BrowserPage>> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(backend_err)?;
        Ok(Box::new(CdpPage { page }))
    }

    async fn close(&mut self) -> Result<()> {
        let closed = self.browser.close().await.map_err(backend_err);
        self.driver.abort();
        closed.map(|_| ())
    }
}

struct CdpPage {
    page: Page,
}

#[async_trait]
impl BrowserPage for CdpPage {
    async fn navigate(&self, url: &str, limit: Duration) -> Result<()> {
        let navigation = async {
            self.page.goto(url).await.map_err(backend_err)?;
            self.page.wait_for_navigation().await.map_err(backend_err)?;
            Ok::<(), ProbeError>(())
        };
        timeout(limit, navigation).await.map_err(|_| {
            ProbeError::Backend(format!(
                "navigation timeout of {}ms exceeded for {url}",
                limit.as_millis()
            ))
        })?
    }

    async fn title(&self) -> Result<String> {
        let title = self.page.get_title().await.map_err(backend_err)?;
        Ok(title.unwrap_or_default())
    }

    async fn content(&self) -> Result<String> {
        self.page.content().await.map_err(backend_err)
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.page.close().await.map_err(backend_err)
    }
}
