//! Handlers for the `/session` resource (login, current, logout).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use retorik_core::error::CoreError;
use retorik_core::{annotated_texts, AnnotationUnit, Label, LabelSchema, Session};

use crate::error::{AppError, AppResult};
use crate::handlers::{enqueue_flush, unknown_session};
use crate::middleware::session::SessionToken;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /session/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub user_id: String,
}

/// The unit currently presented for annotation.
#[derive(Debug, Serialize)]
pub struct UnitView {
    pub text: String,
    pub debate_unit_id: Option<i64>,
}

impl UnitView {
    fn from_unit(unit: &AnnotationUnit) -> Self {
        Self {
            text: unit.text.clone(),
            debate_unit_id: unit.debate_unit_id,
        }
    }
}

/// Where the session sits in its queue.
#[derive(Debug, Serialize)]
pub struct ProgressView {
    /// Position within the unannotated queue.
    pub position: usize,
    /// Queue length at session start.
    pub total: usize,
    pub finished: bool,
    /// Absent once the queue is exhausted.
    pub unit: Option<UnitView>,
}

impl ProgressView {
    pub(crate) fn of(session: &Session) -> Self {
        Self {
            position: session.position(),
            total: session.total(),
            finished: session.is_finished(),
            unit: session.current().map(UnitView::from_unit),
        }
    }
}

/// Successful login response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: Uuid,
    pub user_id: String,
    /// The active label schema, so the highlighting widget derives its
    /// categories from the same source as the ledger columns.
    pub labels: &'static [Label],
    pub progress: ProgressView,
}

/// Response for `GET /session/current`.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub user_id: String,
    pub progress: ProgressView,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/session/login
///
/// Gate the identifier against the allow-list, ensure the user's ledger tab
/// exists, fetch the already-annotated texts, and open a session over the
/// remaining queue. These are the only interactive-path calls that wait on
/// the ledger.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    // 1. Trimmed, non-empty identifier.
    let user_id = input.user_id.trim().to_string();
    if user_id.is_empty() {
        return Err(AppError::BadRequest("user_id must not be empty".into()));
    }

    // 2. Allow-list gate. No session is created on denial.
    let allowed = state
        .allow_list
        .contains(
            state.ledger.as_ref(),
            &state.config.allow_list_tab,
            &user_id,
        )
        .await?;
    if !allowed {
        tracing::info!(user_id = %user_id, "Login rejected: not on allow-list");
        return Err(AppError::Core(CoreError::AccessDenied { user_id }));
    }

    // 3. Corpus (cached after the first login).
    let corpus = state.corpus.get_or_load(&state.config.corpus_path).await?;

    // 4. Idempotent tab creation, then the once-per-login fetch of what this
    //    user already annotated.
    let schema = LabelSchema::latest();
    state.ledger.ensure_tab(&user_id, &schema.header()).await?;
    let rows = state.ledger.read_rows(&user_id).await?;
    let already_done = annotated_texts(schema, &rows);

    // 5. Open the session over the remaining queue.
    let session = Session::new(user_id.clone(), &corpus, &already_done);
    let progress = ProgressView::of(&session);
    let (token, evicted) = state.sessions.insert(session).await;

    // One active session per user: a replaced session flushes its buffer.
    if let Some(old) = evicted {
        tracing::warn!(user_id = %user_id, "Replacing existing session; flushing its buffer");
        enqueue_flush(&state, &user_id, old.logout());
    }

    tracing::info!(
        user_id = %user_id,
        queued = progress.total,
        finished = progress.finished,
        "User logged in"
    );

    Ok(Json(LoginResponse {
        token,
        user_id,
        labels: schema.labels,
        progress,
    }))
}

/// GET /api/v1/session/current
///
/// The unit currently presented plus queue progress.
pub async fn current(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
) -> AppResult<Json<SessionView>> {
    state
        .sessions
        .with_session(&token, |session| SessionView {
            user_id: session.user_id().to_string(),
            progress: ProgressView::of(session),
        })
        .await
        .map(Json)
        .ok_or_else(unknown_session)
}

/// POST /api/v1/session/logout
///
/// Flush any buffered records, then tear the session down entirely.
pub async fn logout(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
) -> AppResult<StatusCode> {
    let session = state.sessions.remove(&token).await.ok_or_else(unknown_session)?;
    let user_id = session.user_id().to_string();

    let batch = session.logout();
    if let Some(batch) = &batch {
        tracing::info!(user_id = %user_id, pending = batch.len(), "Logout: flushing buffered annotations");
    }
    enqueue_flush(&state, &user_id, batch);

    tracing::info!(user_id = %user_id, "User logged out");
    Ok(StatusCode::NO_CONTENT)
}
