use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use retorik_core::error::CoreError;
use retorik_ledger::LedgerError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`LedgerError`] for failures of
/// the synchronous login-path ledger calls. Implements [`IntoResponse`] to
/// produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `retorik_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A ledger error on the interactive path (login fetches).
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// Missing, malformed, or unknown session token.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::AccessDenied { user_id } => (
                    StatusCode::UNAUTHORIZED,
                    "ACCESS_DENIED",
                    format!("Access denied: user '{user_id}' is not authorized"),
                ),
                CoreError::MissingCorpus { path } => {
                    tracing::error!(path = %path.display(), "Corpus file missing");
                    (
                        StatusCode::SERVICE_UNAVAILABLE,
                        "MISSING_CORPUS",
                        "Text file missing! Run the preprocessing step first.".to_string(),
                    )
                }
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            // --- Ledger errors (login-path fetches) ---
            AppError::Ledger(err) => {
                tracing::error!(error = %err, "Ledger error on interactive path");
                (
                    StatusCode::BAD_GATEWAY,
                    "LEDGER_ERROR",
                    "The annotation store is unreachable".to_string(),
                )
            }

            // --- HTTP-specific errors ---
            AppError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
