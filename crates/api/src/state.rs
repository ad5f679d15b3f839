use std::sync::Arc;

use retorik_ledger::Ledger;

use crate::background::flush::FlushQueue;
use crate::cache::{AllowListCache, CorpusCache};
use crate::config::ServerConfig;
use crate::sessions::SessionRegistry;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// The remote annotation store.
    pub ledger: Arc<dyn Ledger>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Active annotation sessions, keyed by session token.
    pub sessions: Arc<SessionRegistry>,
    /// Process-lifetime allow-list cache.
    pub allow_list: Arc<AllowListCache>,
    /// Process-lifetime corpus cache.
    pub corpus: Arc<CorpusCache>,
    /// Hand-off queue to the background flush worker.
    pub flusher: FlushQueue,
}
