//! Process-lifetime caches: the allow-list and the corpus.
//!
//! Both are fetched lazily on the first login and memoized for the process
//! lifetime. The allow-list additionally refetches once when a submitted
//! identifier misses the cached set, so identifiers added to the allow-list
//! tab after startup are picked up at their first login attempt.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use tokio::sync::RwLock;

use retorik_core::{Corpus, CoreError};
use retorik_ledger::{Ledger, LedgerError};

/// Memoized allow-list with invalidation-on-login semantics.
#[derive(Default)]
pub struct AllowListCache {
    cached: RwLock<Option<HashSet<String>>>,
}

impl AllowListCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check `user_id` against the allow-list tab.
    ///
    /// A cold cache or a cache miss triggers a fetch of the tab's first
    /// column; membership is exact string match on trimmed identifiers.
    pub async fn contains(
        &self,
        ledger: &dyn Ledger,
        tab: &str,
        user_id: &str,
    ) -> Result<bool, LedgerError> {
        if let Some(set) = self.cached.read().await.as_ref() {
            if set.contains(user_id) {
                return Ok(true);
            }
        }

        let fresh: HashSet<String> = ledger
            .read_column(tab, 0)
            .await?
            .into_iter()
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .collect();
        tracing::debug!(tab, entries = fresh.len(), "Fetched allow-list");

        let allowed = fresh.contains(user_id);
        *self.cached.write().await = Some(fresh);
        Ok(allowed)
    }

    /// Drop the cached set; the next check refetches.
    pub async fn invalidate(&self) {
        *self.cached.write().await = None;
    }
}

/// Memoized corpus, loaded from disk at first login.
#[derive(Default)]
pub struct CorpusCache {
    cached: RwLock<Option<Arc<Corpus>>>,
}

impl CorpusCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached corpus, loading it from `path` on first use.
    ///
    /// A missing file surfaces as [`CoreError::MissingCorpus`] on every
    /// login until the file appears; nothing is cached on failure.
    pub async fn get_or_load(&self, path: &Path) -> Result<Arc<Corpus>, CoreError> {
        if let Some(corpus) = self.cached.read().await.as_ref() {
            return Ok(Arc::clone(corpus));
        }

        let corpus = Arc::new(Corpus::load(path)?);
        tracing::info!(path = %path.display(), units = corpus.len(), "Corpus loaded");
        *self.cached.write().await = Some(Arc::clone(&corpus));
        Ok(corpus)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use retorik_ledger::MemoryLedger;

    use super::*;

    #[tokio::test]
    async fn allow_list_refetches_on_miss() {
        let ledger = MemoryLedger::new();
        ledger.seed("allowed", vec![vec!["x2".into()]]).await;
        let cache = AllowListCache::new();

        assert!(cache.contains(&ledger, "allowed", "x2").await.unwrap());
        assert!(!cache.contains(&ledger, "allowed", "x9").await.unwrap());

        // x9 is added to the tab after the first fetch; the miss-triggered
        // refetch must pick it up.
        ledger
            .seed("allowed", vec![vec!["x2".into()], vec!["x9".into()]])
            .await;
        assert!(cache.contains(&ledger, "allowed", "x9").await.unwrap());
    }

    #[tokio::test]
    async fn allow_list_trims_identifiers() {
        let ledger = MemoryLedger::new();
        ledger.seed("allowed", vec![vec!["  x2  ".into()]]).await;
        let cache = AllowListCache::new();
        assert!(cache.contains(&ledger, "allowed", "x2").await.unwrap());
    }

    #[tokio::test]
    async fn corpus_cache_loads_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.txt");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "A\nB").unwrap();
        drop(file);

        let cache = CorpusCache::new();
        let first = cache.get_or_load(&path).await.unwrap();
        assert_eq!(first.len(), 2);

        // Deleting the file must not matter once cached.
        std::fs::remove_file(&path).unwrap();
        let second = cache.get_or_load(&path).await.unwrap();
        assert_eq!(second.len(), 2);
    }

    #[tokio::test]
    async fn corpus_cache_missing_file_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.txt");

        let cache = CorpusCache::new();
        let err = cache.get_or_load(&path).await.unwrap_err();
        assert!(matches!(err, CoreError::MissingCorpus { .. }));

        // The file appearing later must succeed.
        std::fs::write(&path, "A\n").unwrap();
        assert_eq!(cache.get_or_load(&path).await.unwrap().len(), 1);
    }
}
