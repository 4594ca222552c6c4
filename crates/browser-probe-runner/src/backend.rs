//! Abstraction over the remote browser backend.
//!
//! The runner only needs a handful of operations; putting them behind traits
//! keeps the CDP client at the edge and lets tests drive the runner with an
//! in-memory stub.

use std::time::Duration;

use async_trait::async_trait;

use browser_probe_core::Result;

/// Entry point to the backend: a single connect operation.
#[async_trait]
pub trait BrowserBackend: Send + Sync {
    /// Open a connection to the backend at `endpoint`, bounded by `timeout`.
    async fn connect(&self, endpoint: &str, timeout: Duration) -> Result<Box<dyn BrowserSession>>;
}

/// An established connection to the backend.
#[async_trait]
pub trait BrowserSession: Send {
    /// Query the backend's version string.
    async fn version(&self) -> Result<String>;

    /// Open a new page/tab.
    async fn new_page(&self) -> Result<Box<dyn BrowserPage>>;

    /// Release the connection. Called on every exit path of a run.
    async fn close(&mut self) -> Result<()>;
}

/// A page within an established session.
#[async_trait]
pub trait BrowserPage: Send {
    /// Navigate to `url` and wait for the navigation to settle, bounded by
    /// `timeout`.
    async fn navigate(&self, url: &str, timeout: Duration) -> Result<()>;

    /// Read the page title.
    async fn title(&self) -> Result<String>;

    /// Read the serialized page content.
    async fn content(&self) -> Result<String>;

    /// Close the page.
    async fn close(self: Box<Self>) -> Result<()>;
}
