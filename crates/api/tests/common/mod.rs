//! Shared harness for HTTP-level integration tests.
//!
//! Builds the full application router with the same middleware stack as
//! production (`build_app_router`), backed by an in-memory ledger and a
//! temp-file corpus, with the background flush worker running.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use retorik_api::background::flush::{self, FlushQueue};
use retorik_api::cache::{AllowListCache, CorpusCache};
use retorik_api::config::ServerConfig;
use retorik_api::router::build_app_router;
use retorik_api::sessions::SessionRegistry;
use retorik_api::state::AppState;
use retorik_core::LabelSchema;
use retorik_ledger::{Ledger, MemoryLedger};

/// Default allow-list tab name used by the test config.
pub const ALLOW_TAB: &str = "allowed_users_CE";

/// A running test application.
pub struct TestApp {
    pub router: Router,
    pub ledger: Arc<MemoryLedger>,
    _corpus_dir: tempfile::TempDir,
}

/// Build a test `ServerConfig` with safe defaults.
fn test_config(corpus_path: std::path::PathBuf) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        corpus_path,
        ledger_url: "http://unused.invalid".to_string(),
        ledger_sheet_id: "test-sheet".to_string(),
        ledger_token: None,
        allow_list_tab: ALLOW_TAB.to_string(),
    }
}

/// Spawn the app with the given corpus content (`None` = no corpus file) and
/// allow-list identifiers. The flush worker runs for the lifetime of the
/// test runtime.
pub async fn spawn_app(corpus: Option<&str>, allowed: &[&str]) -> TestApp {
    let ledger = Arc::new(MemoryLedger::new());
    ledger
        .seed(
            ALLOW_TAB,
            allowed.iter().map(|id| vec![id.to_string()]).collect(),
        )
        .await;

    let corpus_dir = tempfile::tempdir().expect("tempdir");
    let corpus_path = corpus_dir.path().join("processed_texts.txt");
    if let Some(content) = corpus {
        std::fs::write(&corpus_path, content).expect("write corpus");
    }

    let config = test_config(corpus_path);

    let (flusher, flush_rx) = FlushQueue::new();
    tokio::spawn(flush::run(
        Arc::clone(&ledger) as Arc<dyn Ledger>,
        flush_rx,
        CancellationToken::new(),
    ));

    let state = AppState {
        ledger: Arc::clone(&ledger) as Arc<dyn Ledger>,
        config: Arc::new(config.clone()),
        sessions: Arc::new(SessionRegistry::new()),
        allow_list: Arc::new(AllowListCache::new()),
        corpus: Arc::new(CorpusCache::new()),
        flusher,
    };

    TestApp {
        router: build_app_router(state, &config),
        ledger,
        _corpus_dir: corpus_dir,
    }
}

/// Seed a user tab with a header row plus one annotated row per text.
pub async fn seed_user_tab(ledger: &MemoryLedger, user_id: &str, texts: &[&str]) {
    let schema = LabelSchema::latest();
    let mut rows = vec![schema.header()];
    for (i, text) in texts.iter().enumerate() {
        let mut row = vec![
            user_id.to_string(),
            i.to_string(),
            text.to_string(),
            String::new(),
        ];
        row.extend(schema.labels.iter().map(|_| String::new()));
        row.push(String::new());
        row.push("2025-01-01 00:00:00".to_string());
        rows.push(row);
    }
    ledger.seed(user_id, rows).await;
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn get_session(app: Router, uri: &str, token: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("GET")
            .uri(uri)
            .header("x-session-token", token)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn post_json_session(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .header("x-session-token", token)
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn post_session(app: Router, uri: &str, token: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("x-session-token", token)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Collect a response body into JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Flow helpers
// ---------------------------------------------------------------------------

/// Log a user in and return (token, login response JSON).
pub async fn login(app: &TestApp, user_id: &str) -> (String, serde_json::Value) {
    let response = post_json(
        app.router.clone(),
        "/api/v1/session/login",
        serde_json::json!({ "user_id": user_id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let token = json["token"].as_str().expect("token").to_string();
    (token, json)
}

/// Submit one labeled span for the current unit.
pub async fn submit_one(app: &TestApp, token: &str, label: &str, text: &str) -> serde_json::Value {
    let response = post_json_session(
        app.router.clone(),
        "/api/v1/session/submit",
        token,
        serde_json::json!({
            "selections": [{ "label": label, "text": text }],
            "comment": "",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

/// Wait (up to 1s) for the ledger to have seen `n` append batches. The flush
/// path is fire-and-forget, so tests poll instead of awaiting the handler.
pub async fn wait_for_appends(ledger: &MemoryLedger, n: usize) {
    for _ in 0..100 {
        if ledger.append_calls() >= n {
            assert_eq!(ledger.append_calls(), n);
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!(
        "expected {n} append batches, saw {} within 1s",
        ledger.append_calls()
    );
}
