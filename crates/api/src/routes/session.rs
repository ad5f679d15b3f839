//! Route definitions for the annotation session lifecycle.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{annotation, session};
use crate::state::AppState;

/// Session routes mounted at `/session`.
///
/// ```text
/// POST /login    -> session::login
/// GET  /current  -> session::current
/// POST /submit   -> annotation::submit
/// POST /logout   -> session::logout
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(session::login))
        .route("/current", get(session::current))
        .route("/submit", post(annotation::submit))
        .route("/logout", post(session::logout))
}
