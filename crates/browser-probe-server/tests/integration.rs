//! Status server integration tests — start a real server and probe it over
//! HTTP, with the browser backend stubbed out.
//!
//! Run with: `cargo test -p browser-probe-server --test integration`

use std::sync::Arc;
use std::time::Duration;

use browser_probe_core::Config;
use browser_probe_runner::testing::StubBackend;
use browser_probe_server::{AppState, start_server};

/// Find an available port.
fn find_free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

fn configured(endpoint: Option<&str>) -> Config {
    Config {
        ws_endpoint: endpoint.map(str::to_string),
        ..Config::default()
    }
}

/// Start a server with a stub backend and wait until it answers.
async fn start_test_server(config: Config, backend: Arc<StubBackend>) -> (Arc<AppState>, u16) {
    let port = find_free_port();
    let state = Arc::new(AppState::new(config, backend));

    let state_clone = state.clone();
    tokio::spawn(async move {
        let _ = start_server(state_clone, port).await;
    });

    for _ in 0..50 {
        tokio::time::sleep(Duration::from_millis(20)).await;
        if reqwest::get(format!("http://127.0.0.1:{port}/health"))
            .await
            .is_ok()
        {
            break;
        }
    }

    (state, port)
}

async fn get_json(port: u16, path: &str) -> serde_json::Value {
    let resp = reqwest::get(format!("http://127.0.0.1:{port}{path}"))
        .await
        .expect("request failed");
    assert!(resp.status().is_success());
    resp.json().await.unwrap()
}

/// Poll `/health` until the stored result reaches the given run id.
async fn wait_for_run(port: u16, run: u64) -> serde_json::Value {
    for _ in 0..100 {
        let body = get_json(port, "/health").await;
        if body["testResults"]["run"] == serde_json::json!(run) {
            return body["testResults"].clone();
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("run {run} never completed");
}

#[tokio::test]
async fn test_routes_return_pending_before_first_run_completes() {
    // A slow connect keeps the startup run in flight while we look.
    let backend = Arc::new(StubBackend::healthy().with_connect_delay(Duration::from_secs(5)));
    let (_state, port) = start_test_server(configured(Some("ws://stub")), backend).await;

    let body = get_json(port, "/").await;
    assert_eq!(body["service"], "browser-probe");
    assert_eq!(body["testResults"]["status"], "pending");
    assert_eq!(body["endpoints"]["/test"], "Run test manually");

    let health = get_json(port, "/health").await;
    assert_eq!(health["status"], "running");
    assert_eq!(health["testResults"]["status"], "pending");
    assert_eq!(health["testResults"]["message"], "Test not yet run");
}

#[tokio::test]
async fn test_startup_run_succeeds_against_stub() {
    let backend = Arc::new(StubBackend::healthy());
    let (_state, port) = start_test_server(configured(Some("ws://stub")), backend.clone()).await;

    let results = wait_for_run(port, 1).await;
    assert_eq!(results["status"], "success");
    assert_eq!(results["message"], "All tests passed");
    assert_eq!(results["details"]["connection"], "success");
    assert_eq!(results["details"]["pageTitle"], backend.expected_title());
    assert_eq!(
        results["details"]["contentLength"],
        serde_json::json!(backend.expected_content_length())
    );
    assert!(backend.session_closed());
}

#[tokio::test]
async fn test_missing_endpoint_fails_without_contacting_backend() {
    let backend = Arc::new(StubBackend::healthy());
    let (_state, port) = start_test_server(configured(None), backend.clone()).await;

    let results = wait_for_run(port, 1).await;
    assert_eq!(results["status"], "failed");
    assert_eq!(results["details"]["error"], "Missing environment variable");
    assert_eq!(backend.connect_attempts(), 0);
}

#[tokio::test]
async fn test_trigger_returns_previous_result_immediately() {
    let backend = Arc::new(StubBackend::healthy().with_connect_delay(Duration::from_millis(200)));
    let (_state, port) = start_test_server(configured(Some("ws://stub")), backend).await;

    // Let the startup run finish first.
    let first = wait_for_run(port, 1).await;
    assert_eq!(first["status"], "success");

    // The trigger acknowledges with the run-1 result, not the run it starts.
    let body = get_json(port, "/test").await;
    assert_eq!(body["message"], "Test started, check logs for results");
    assert_eq!(body["currentResults"]["run"], serde_json::json!(1));

    let second = wait_for_run(port, 2).await;
    assert_eq!(second["status"], "success");
}

#[tokio::test]
async fn test_failed_run_still_serves_http_200() {
    let backend = Arc::new(StubBackend::refusing_connection(
        "connect ECONNREFUSED 10.0.0.3:3000",
    ));
    let (_state, port) = start_test_server(configured(Some("ws://stub")), backend).await;

    let results = wait_for_run(port, 1).await;
    assert_eq!(results["status"], "failed");
    assert!(
        results["details"]["error"]
            .as_str()
            .unwrap()
            .contains("ECONNREFUSED")
    );
    assert!(results["details"]["stack"].is_string());

    // Routes keep answering 200 regardless of test outcome.
    let body = get_json(port, "/").await;
    assert_eq!(body["testResults"]["status"], "failed");
}
