//! HTTP-level integration tests for annotation submission: batching,
//! exhaustion, no-op submits, and ledger row layout.

mod common;

use axum::http::StatusCode;
use chrono::NaiveDateTime;
use common::{login, post_json_session, spawn_app, submit_one, wait_for_appends};
use retorik_core::LabelSchema;

fn corpus(n: usize) -> String {
    (0..n).map(|i| format!("[{}] line {i}\n", i + 100)).collect()
}

// ---------------------------------------------------------------------------
// Batching
// ---------------------------------------------------------------------------

/// Five submits drain the buffer exactly once, carrying all five records.
#[tokio::test]
async fn five_submits_trigger_a_single_flush_of_five() {
    let app = spawn_app(Some(&corpus(10)), &["x2"]).await;
    let (token, _) = login(&app, "x2").await;

    for i in 0..5 {
        let json = submit_one(&app, &token, "evasion", "det ved jeg ikke").await;
        assert_eq!(json["advanced"], true);
        assert_eq!(json["progress"]["position"], i + 1);
    }

    wait_for_appends(&app.ledger, 1).await;
    let rows = app.ledger.rows("x2").await.unwrap();
    assert_eq!(rows.len(), 6); // header + 5
}

#[tokio::test]
async fn four_submits_do_not_flush() {
    let app = spawn_app(Some(&corpus(10)), &["x2"]).await;
    let (token, _) = login(&app, "x2").await;

    for _ in 0..4 {
        submit_one(&app, &token, "answer", "ja").await;
    }

    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    assert_eq!(app.ledger.append_calls(), 0);
}

// ---------------------------------------------------------------------------
// Row layout
// ---------------------------------------------------------------------------

#[tokio::test]
async fn flushed_row_matches_header_layout() {
    let app = spawn_app(Some(&corpus(10)), &["x2"]).await;
    let (token, _) = login(&app, "x2").await;

    let response = post_json_session(
        app.router.clone(),
        "/api/v1/session/submit",
        &token,
        serde_json::json!({
            "selections": [
                { "label": "evasion", "text": "det vil jeg ikke" },
                { "label": "evasion", "text": "svare på" },
                { "label": "attack", "text": "du lyver" },
            ],
            "comment": "tydelig undvigelse",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Force a flush via logout.
    common::post_session(app.router.clone(), "/api/v1/session/logout", &token).await;
    wait_for_appends(&app.ledger, 1).await;

    let schema = LabelSchema::latest();
    let rows = app.ledger.rows("x2").await.unwrap();
    let header = &rows[0];
    let row = &rows[1];
    assert_eq!(row.len(), header.len());

    let col = |name: &str| header.iter().position(|c| c == name).unwrap();
    assert_eq!(row[col("user_id")], "x2");
    assert_eq!(row[col("text_index")], "0");
    assert_eq!(row[col("full_text")], "line 0");
    assert_eq!(row[col("debate_unit_id")], "100");
    // Same-label fragments joined with ';', other labels empty.
    assert_eq!(row[col("evasion")], "det vil jeg ikke;svare på");
    assert_eq!(row[col("attack")], "du lyver");
    assert_eq!(row[col("answer")], "");
    assert_eq!(row[col("comment_field")], "tydelig undvigelse");

    // Timestamp column parses as YYYY-MM-DD HH:MM:SS.
    assert!(
        NaiveDateTime::parse_from_str(&row[col("timestamp")], "%Y-%m-%d %H:%M:%S").is_ok(),
        "bad timestamp: {}",
        row[col("timestamp")]
    );
    assert_eq!(header.len(), schema.column_count());
}

// ---------------------------------------------------------------------------
// No-op submits
// ---------------------------------------------------------------------------

/// No labeled spans: nothing recorded, queue does not move.
#[tokio::test]
async fn empty_selections_are_a_no_op() {
    let app = spawn_app(Some(&corpus(3)), &["x2"]).await;
    let (token, _) = login(&app, "x2").await;

    let response = post_json_session(
        app.router.clone(),
        "/api/v1/session/submit",
        &token,
        serde_json::json!({ "selections": [], "comment": "" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = common::body_json(response).await;
    assert_eq!(json["advanced"], false);
    assert_eq!(json["progress"]["position"], 0);
}

// ---------------------------------------------------------------------------
// Exhaustion
// ---------------------------------------------------------------------------

/// Exhausting the queue forces a flush of the partial batch and further
/// submits are rejected without moving the index.
#[tokio::test]
async fn exhaustion_flushes_partial_batch_and_is_sticky() {
    let app = spawn_app(Some(&corpus(2)), &["x2"]).await;
    let (token, _) = login(&app, "x2").await;

    submit_one(&app, &token, "answer", "a").await;
    let json = submit_one(&app, &token, "answer", "b").await;
    assert_eq!(json["progress"]["finished"], true);
    assert!(json["progress"]["unit"].is_null());

    wait_for_appends(&app.ledger, 1).await;
    let rows = app.ledger.rows("x2").await.unwrap();
    assert_eq!(rows.len(), 3); // header + 2

    let json = submit_one(&app, &token, "answer", "c").await;
    assert_eq!(json["advanced"], false);
    assert_eq!(json["progress"]["position"], 2);

    // No further flushes happened for the rejected submit.
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    assert_eq!(app.ledger.append_calls(), 1);
}
