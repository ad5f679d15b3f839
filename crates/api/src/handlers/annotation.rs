//! Handler for submitting an annotation of the current unit.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use retorik_core::{Selection, SubmitOutcome};

use crate::error::AppResult;
use crate::handlers::session::ProgressView;
use crate::handlers::{enqueue_flush, unknown_session};
use crate::middleware::session::SessionToken;
use crate::state::AppState;

/// Request body for `POST /session/submit`: the labeled spans produced by
/// the highlighting widget, plus an optional free-text comment.
#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub selections: Vec<Selection>,
    #[serde(default)]
    pub comment: String,
}

/// Response for `POST /session/submit`.
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    /// False when the submit was a no-op (no labeled spans, or the queue was
    /// already exhausted).
    pub advanced: bool,
    pub progress: ProgressView,
}

/// POST /api/v1/session/submit
///
/// Record the labeled spans for the current unit and advance the queue. The
/// response never waits on the ledger: any batch drained here goes to the
/// background flush worker.
pub async fn submit(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
    Json(input): Json<SubmitRequest>,
) -> AppResult<Json<SubmitResponse>> {
    let (user_id, outcome, progress) = state
        .sessions
        .with_session(&token, |session| {
            let outcome = session.submit(&input.selections, &input.comment);
            (
                session.user_id().to_string(),
                outcome,
                ProgressView::of(session),
            )
        })
        .await
        .ok_or_else(unknown_session)?;

    let advanced = match outcome {
        SubmitOutcome::Advanced { flush, finished } => {
            if finished {
                tracing::info!(user_id = %user_id, "Annotation queue exhausted");
            }
            enqueue_flush(&state, &user_id, flush);
            true
        }
        SubmitOutcome::EmptySubmission => {
            tracing::debug!(user_id = %user_id, "Submit without labeled spans ignored");
            false
        }
        SubmitOutcome::AlreadyFinished => {
            tracing::debug!(user_id = %user_id, "Submit after exhaustion ignored");
            false
        }
    };

    Ok(Json(SubmitResponse { advanced, progress }))
}
