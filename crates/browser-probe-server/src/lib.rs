//! HTTP status server for the browser connectivity probe.
//!
//! Three JSON routes over the shared result store: `/` (identity + latest
//! result), `/health` (liveness), `/test` (fire-and-forget manual trigger).

pub mod server;
pub mod state;

pub use server::start_server;
pub use state::AppState;
