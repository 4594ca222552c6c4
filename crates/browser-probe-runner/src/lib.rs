//! Browser connectivity test runner.
//!
//! Connects to a remote browser backend over its WebSocket (CDP) endpoint,
//! drives a fixed sequence of browser operations, and records the outcome in
//! a process-wide result store read by the status server.

pub mod backend;
pub mod cdp;
pub mod classify;
pub mod runner;
pub mod store;
pub mod testing;

pub use backend::{BrowserBackend, BrowserPage, BrowserSession};
pub use cdp::CdpBackend;
pub use runner::ConnectivityTest;
pub use store::ResultStore;
