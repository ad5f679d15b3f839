use std::path::PathBuf;

/// Server configuration loaded from environment variables.
///
/// All fields except the ledger sheet id have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Graceful shutdown timeout in seconds (default: `30`). Bounds how long
    /// the flush worker gets to drain after the server stops.
    pub shutdown_timeout_secs: u64,
    /// Path to the preprocessed corpus file.
    pub corpus_path: PathBuf,
    /// Base URL of the spreadsheet bridge service.
    pub ledger_url: String,
    /// Spreadsheet identifier on the bridge.
    pub ledger_sheet_id: String,
    /// Optional bearer token for the bridge.
    pub ledger_token: Option<String>,
    /// Name of the single-column allow-list tab.
    pub allow_list_tab: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                           |
    /// |-------------------------|-----------------------------------|
    /// | `HOST`                  | `0.0.0.0`                         |
    /// | `PORT`                  | `3000`                            |
    /// | `CORS_ORIGINS`          | `http://localhost:5173`           |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                              |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `30`                              |
    /// | `CORPUS_PATH`           | `data/clean/processed_texts.txt`  |
    /// | `LEDGER_URL`            | `http://localhost:8090`           |
    /// | `LEDGER_SHEET_ID`       | (required)                        |
    /// | `LEDGER_TOKEN`          | (none)                            |
    /// | `ALLOW_LIST_TAB`        | `allowed_users_CE`                |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let corpus_path = PathBuf::from(
            std::env::var("CORPUS_PATH")
                .unwrap_or_else(|_| "data/clean/processed_texts.txt".into()),
        );

        let ledger_url =
            std::env::var("LEDGER_URL").unwrap_or_else(|_| "http://localhost:8090".into());

        let ledger_sheet_id =
            std::env::var("LEDGER_SHEET_ID").expect("LEDGER_SHEET_ID must be set");

        let ledger_token = std::env::var("LEDGER_TOKEN").ok();

        let allow_list_tab =
            std::env::var("ALLOW_LIST_TAB").unwrap_or_else(|_| "allowed_users_CE".into());

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            corpus_path,
            ledger_url,
            ledger_sheet_id,
            ledger_token,
            allow_list_tab,
        }
    }
}
