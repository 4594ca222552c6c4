//! Axum routes and server startup.

use std::sync::Arc;

use axum::{Json, Router, extract::State, response::IntoResponse, routing::get};
use serde_json::json;
use tracing::info;

use crate::state::AppState;

const SERVICE_NAME: &str = "browser-probe";

/// Build the probe's router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/test", get(trigger_handler))
        .with_state(state)
}

/// Start the status server and, once listening, trigger the startup run.
///
/// Test failures never bring the server down; they only land in the stored
/// result and the logs.
pub async fn start_server(state: Arc<AppState>, port: u16) -> anyhow::Result<()> {
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Browser probe listening on {addr}");
    info!("Health check: http://localhost:{port}/health");
    info!("Manual test: http://localhost:{port}/test");

    info!("running automatic browser connectivity test");
    state.spawn_run();

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn index_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({
        "service": SERVICE_NAME,
        "description": "Tests connection to a remote browser service",
        "testResults": state.store.current().await,
        "endpoints": {
            "/": "This page",
            "/health": "Health check and test results",
            "/test": "Run test manually",
        },
    }))
}

async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({
        "service": SERVICE_NAME,
        "status": "running",
        "testResults": state.store.current().await,
    }))
}

/// Responds immediately with the pre-run result, then starts a fresh run in
/// the background.
async fn trigger_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let current = state.store.current().await;
    state.spawn_run();
    Json(json!({
        "message": "Test started, check logs for results",
        "currentResults": current,
    }))
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C handler");
    info!("Shutdown signal received");
}
