//! The Remote Ledger: an append-only table store addressed by tab name.
//!
//! One tab per annotator, plus the allow-list tab. The production
//! implementation ([`HttpLedger`]) talks to a spreadsheet bridge service
//! over HTTP; [`MemoryLedger`] backs tests and local development.

pub mod http;
pub mod memory;

pub use http::HttpLedger;
pub use memory::MemoryLedger;

/// Errors from the ledger layer.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The bridge returned a non-2xx status code.
    #[error("Ledger API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The addressed tab does not exist.
    #[error("Tab not found: {0}")]
    TabNotFound(String),
}

/// An append-only tabular store, one tab per collection.
///
/// Appends never rewrite or delete existing rows; `ensure_tab` is
/// idempotent. Implementations must be shareable across tasks
/// (`Arc<dyn Ledger>`).
#[async_trait::async_trait]
pub trait Ledger: Send + Sync {
    /// Create `tab` with the given header row if it does not exist yet.
    async fn ensure_tab(&self, tab: &str, header: &[String]) -> Result<(), LedgerError>;

    /// Read all rows of `tab`, header row included.
    async fn read_rows(&self, tab: &str) -> Result<Vec<Vec<String>>, LedgerError>;

    /// Append rows to the end of `tab`.
    async fn append_rows(&self, tab: &str, rows: Vec<Vec<String>>) -> Result<(), LedgerError>;

    /// Read a single zero-based column of `tab`, top to bottom. Used for the
    /// single-column allow-list tab.
    async fn read_column(&self, tab: &str, column: usize) -> Result<Vec<String>, LedgerError> {
        let rows = self.read_rows(tab).await?;
        Ok(rows
            .into_iter()
            .filter_map(|row| row.into_iter().nth(column))
            .collect())
    }
}
