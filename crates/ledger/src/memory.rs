//! In-memory [`Ledger`] for tests and local development.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::RwLock;

use crate::{Ledger, LedgerError};

/// A `HashMap`-backed ledger with the same append-only contract as the
/// bridge. Also counts `append_rows` calls so tests can assert flush
/// cardinality, not just row totals.
#[derive(Default)]
pub struct MemoryLedger {
    tabs: RwLock<HashMap<String, Vec<Vec<String>>>>,
    append_calls: AtomicUsize,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a tab with rows (e.g. an allow-list or pre-existing annotations).
    pub async fn seed(&self, tab: &str, rows: Vec<Vec<String>>) {
        self.tabs.write().await.insert(tab.to_string(), rows);
    }

    /// Snapshot of a tab's rows, header included. `None` if the tab does not
    /// exist.
    pub async fn rows(&self, tab: &str) -> Option<Vec<Vec<String>>> {
        self.tabs.read().await.get(tab).cloned()
    }

    /// Number of `append_rows` calls made so far.
    pub fn append_calls(&self) -> usize {
        self.append_calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Ledger for MemoryLedger {
    async fn ensure_tab(&self, tab: &str, header: &[String]) -> Result<(), LedgerError> {
        self.tabs
            .write()
            .await
            .entry(tab.to_string())
            .or_insert_with(|| vec![header.to_vec()]);
        Ok(())
    }

    async fn read_rows(&self, tab: &str) -> Result<Vec<Vec<String>>, LedgerError> {
        self.tabs
            .read()
            .await
            .get(tab)
            .cloned()
            .ok_or_else(|| LedgerError::TabNotFound(tab.to_string()))
    }

    async fn append_rows(&self, tab: &str, rows: Vec<Vec<String>>) -> Result<(), LedgerError> {
        self.append_calls.fetch_add(1, Ordering::SeqCst);
        let mut tabs = self.tabs.write().await;
        let existing = tabs
            .get_mut(tab)
            .ok_or_else(|| LedgerError::TabNotFound(tab.to_string()))?;
        existing.extend(rows);
        Ok(())
    }
}
