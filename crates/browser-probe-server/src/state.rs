//! Shared server state.

use std::sync::Arc;

use browser_probe_core::Config;
use browser_probe_runner::{BrowserBackend, ConnectivityTest, ResultStore};

/// State shared by all route handlers: the config, the result store, and the
/// runner bound to both.
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<ResultStore>,
    pub runner: Arc<ConnectivityTest>,
}

impl AppState {
    pub fn new(config: Config, backend: Arc<dyn BrowserBackend>) -> Self {
        let config = Arc::new(config);
        let store = Arc::new(ResultStore::new());
        let runner = Arc::new(ConnectivityTest::new(config.clone(), backend, store.clone()));
        Self {
            config,
            store,
            runner,
        }
    }

    /// Kick off a run in the background. Triggers are not serialized;
    /// overlapping runs race on the store and last write wins.
    pub fn spawn_run(&self) {
        let runner = self.runner.clone();
        tokio::spawn(async move {
            runner.run().await;
        });
    }
}
