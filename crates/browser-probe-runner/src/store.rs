//! Process-wide result store.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::RwLock;
use tracing::warn;

use browser_probe_core::TestResult;

/// Holds the latest [`TestResult`] and hands out run identifiers.
///
/// Overlapping runs are permitted (startup run plus manual triggers); writes
/// are last-write-wins, but the run id makes an out-of-order overwrite
/// visible instead of silent.
pub struct ResultStore {
    current: RwLock<TestResult>,
    runs_started: AtomicU64,
}

impl Default for ResultStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultStore {
    pub fn new() -> Self {
        Self {
            current: RwLock::new(TestResult::pending()),
            runs_started: AtomicU64::new(0),
        }
    }

    /// Snapshot of the latest result.
    pub async fn current(&self) -> TestResult {
        self.current.read().await.clone()
    }

    /// Allocate the next run identifier.
    pub fn begin_run(&self) -> u64 {
        self.runs_started.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Replace the stored result wholesale.
    pub async fn complete(&self, result: TestResult) {
        let mut current = self.current.write().await;
        if let (Some(held), Some(incoming)) = (current.run, result.run) {
            if incoming < held {
                warn!(
                    stale_run = incoming,
                    newer_run = held,
                    "slower run overwrote a newer result"
                );
            }
        }
        *current = result;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use browser_probe_core::TestStatus;

    #[tokio::test]
    async fn test_starts_pending() {
        let store = ResultStore::new();
        assert_eq!(store.current().await.status, TestStatus::Pending);
    }

    #[tokio::test]
    async fn test_run_ids_are_monotonic() {
        let store = ResultStore::new();
        assert_eq!(store.begin_run(), 1);
        assert_eq!(store.begin_run(), 2);
    }

    #[tokio::test]
    async fn test_last_write_wins() {
        let store = ResultStore::new();
        let first = store.begin_run();
        let second = store.begin_run();

        let mut newer = TestResult::pending();
        newer.run = Some(second);
        newer.message = "newer".into();
        store.complete(newer).await;

        // The slower, older run still replaces the record.
        let mut older = TestResult::pending();
        older.run = Some(first);
        older.message = "older".into();
        store.complete(older).await;

        assert_eq!(store.current().await.message, "older");
    }
}
