//! Session-token extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

/// Session token extracted from the `X-Session-Token` header.
///
/// Use this as an extractor parameter in any handler scoped to an active
/// session:
///
/// ```ignore
/// async fn my_handler(SessionToken(token): SessionToken) -> AppResult<Json<()>> {
///     // look the session up in state.sessions
/// }
/// ```
///
/// The extractor only validates the token's shape; resolution against the
/// registry happens in the handler, which answers 401 for unknown tokens.
#[derive(Debug, Clone, Copy)]
pub struct SessionToken(pub Uuid);

impl FromRequestParts<AppState> for SessionToken {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get("x-session-token")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Missing X-Session-Token header".into()))?;

        let token = Uuid::parse_str(header)
            .map_err(|_| AppError::Unauthorized("Invalid session token".into()))?;

        Ok(SessionToken(token))
    }
}
