pub mod health;
pub mod session;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /session/login       login (public)
/// /session/current     current unit + progress (requires session token)
/// /session/submit      submit annotation (requires session token)
/// /session/logout      flush + teardown (requires session token)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/session", session::router())
}
