pub mod annotation;
pub mod session;

use retorik_core::AnnotationRecord;

use crate::background::flush::FlushJob;
use crate::error::AppError;
use crate::state::AppState;

/// Hand a drained batch to the background flush worker, if there is one.
///
/// Fire-and-forget: the batch has already left the session buffer, so the
/// interactive turn never waits on the ledger here.
pub(crate) fn enqueue_flush(state: &AppState, tab: &str, batch: Option<Vec<AnnotationRecord>>) {
    if let Some(batch) = batch {
        let rows = batch.iter().map(AnnotationRecord::to_row).collect();
        state.flusher.enqueue(FlushJob {
            tab: tab.to_string(),
            rows,
        });
    }
}

/// 401 for a token that does not resolve to an active session.
pub(crate) fn unknown_session() -> AppError {
    AppError::Unauthorized("Unknown or expired session token".into())
}
