//! Registry of active annotation sessions.
//!
//! Sessions are keyed by an opaque token handed to the client at login; a
//! secondary user-id index enforces the one-active-session-per-user rule.
//! Thread-safe via interior `RwLock`; designed to be wrapped in `Arc` and
//! shared through [`crate::state::AppState`].

use std::collections::HashMap;

use tokio::sync::RwLock;
use uuid::Uuid;

use retorik_core::Session;

#[derive(Default)]
struct Inner {
    by_token: HashMap<Uuid, Session>,
    by_user: HashMap<String, Uuid>,
}

/// Active sessions for all logged-in users.
#[derive(Default)]
pub struct SessionRegistry {
    inner: RwLock<Inner>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new session under a fresh token.
    ///
    /// If the user already has an active session it is removed and returned
    /// so the caller can flush its buffer; the buffer must not be silently
    /// dropped.
    pub async fn insert(&self, session: Session) -> (Uuid, Option<Session>) {
        let mut inner = self.inner.write().await;
        let user_id = session.user_id().to_string();

        let evicted = inner
            .by_user
            .remove(&user_id)
            .and_then(|old_token| inner.by_token.remove(&old_token));

        let token = Uuid::new_v4();
        inner.by_user.insert(user_id, token);
        inner.by_token.insert(token, session);
        (token, evicted)
    }

    /// Run `f` against the session for `token`, if one exists.
    ///
    /// The closure runs under the registry write lock and must not block;
    /// session operations are pure in-memory work, so critical sections stay
    /// short.
    pub async fn with_session<T>(
        &self,
        token: &Uuid,
        f: impl FnOnce(&mut Session) -> T,
    ) -> Option<T> {
        let mut inner = self.inner.write().await;
        inner.by_token.get_mut(token).map(f)
    }

    /// Remove and return the session for `token` (logout path).
    pub async fn remove(&self, token: &Uuid) -> Option<Session> {
        let mut inner = self.inner.write().await;
        let session = inner.by_token.remove(token)?;
        inner.by_user.remove(session.user_id());
        Some(session)
    }

    /// Number of active sessions.
    pub async fn active_count(&self) -> usize {
        self.inner.read().await.by_token.len()
    }
}
