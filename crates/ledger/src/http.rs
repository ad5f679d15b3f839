//! HTTP client for the spreadsheet bridge service.
//!
//! The bridge exposes the spreadsheet backend as a small REST API:
//!
//! ```text
//! GET  /v1/sheets/{sheet}/tabs/{tab}/rows   -> { "rows": [[...], ...] }
//! POST /v1/sheets/{sheet}/tabs              <- { "title": ..., "header": [...] }
//! POST /v1/sheets/{sheet}/tabs/{tab}/rows   <- { "rows": [[...], ...] }
//! ```
//!
//! Creating a tab that already exists returns 409, which [`ensure_tab`]
//! treats as success. Requests carry a bearer token when one is configured.

use serde::Deserialize;

use crate::{Ledger, LedgerError};

/// [`Ledger`] implementation backed by the spreadsheet bridge.
pub struct HttpLedger {
    client: reqwest::Client,
    base_url: String,
    sheet_id: String,
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RowsResponse {
    rows: Vec<Vec<String>>,
}

impl HttpLedger {
    /// Create a client for one spreadsheet.
    ///
    /// * `base_url` - bridge base URL, e.g. `http://localhost:8090`.
    /// * `sheet_id` - spreadsheet identifier on the bridge.
    /// * `token`    - optional bearer token.
    pub fn new(base_url: String, sheet_id: String, token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            sheet_id,
            token,
        }
    }

    fn tab_rows_url(&self, tab: &str) -> String {
        format!(
            "{}/v1/sheets/{}/tabs/{}/rows",
            self.base_url, self.sheet_id, tab
        )
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Turn a non-2xx response into [`LedgerError::Api`], mapping 404 on a
    /// tab route to [`LedgerError::TabNotFound`].
    async fn check(response: reqwest::Response, tab: &str) -> Result<reqwest::Response, LedgerError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(LedgerError::TabNotFound(tab.to_string()));
        }
        let body = response.text().await.unwrap_or_default();
        Err(LedgerError::Api {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait::async_trait]
impl Ledger for HttpLedger {
    async fn ensure_tab(&self, tab: &str, header: &[String]) -> Result<(), LedgerError> {
        let url = format!("{}/v1/sheets/{}/tabs", self.base_url, self.sheet_id);
        let body = serde_json::json!({ "title": tab, "header": header });

        let response = self.request(self.client.post(&url).json(&body)).send().await?;

        // 409: the tab already exists. Creation is idempotent.
        if response.status() == reqwest::StatusCode::CONFLICT {
            tracing::debug!(tab, "Tab already exists");
            return Ok(());
        }
        Self::check(response, tab).await?;
        tracing::info!(tab, "Created ledger tab");
        Ok(())
    }

    async fn read_rows(&self, tab: &str) -> Result<Vec<Vec<String>>, LedgerError> {
        let response = self
            .request(self.client.get(self.tab_rows_url(tab)))
            .send()
            .await?;
        let response = Self::check(response, tab).await?;
        let parsed: RowsResponse = response.json().await?;
        Ok(parsed.rows)
    }

    async fn append_rows(&self, tab: &str, rows: Vec<Vec<String>>) -> Result<(), LedgerError> {
        let body = serde_json::json!({ "rows": rows });
        let response = self
            .request(self.client.post(self.tab_rows_url(tab)).json(&body))
            .send()
            .await?;
        Self::check(response, tab).await?;
        Ok(())
    }
}
