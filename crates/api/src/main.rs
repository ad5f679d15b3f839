use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use retorik_api::background::flush::{self, FlushQueue};
use retorik_api::cache::{AllowListCache, CorpusCache};
use retorik_api::config::ServerConfig;
use retorik_api::router::build_app_router;
use retorik_api::sessions::SessionRegistry;
use retorik_api::state::AppState;
use retorik_ledger::{HttpLedger, Ledger};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "retorik_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Ledger ---
    let ledger: Arc<dyn Ledger> = Arc::new(HttpLedger::new(
        config.ledger_url.clone(),
        config.ledger_sheet_id.clone(),
        config.ledger_token.clone(),
    ));
    tracing::info!(url = %config.ledger_url, "Ledger client created");

    // --- Background flush worker ---
    let (flusher, flush_rx) = FlushQueue::new();
    let flush_cancel = CancellationToken::new();
    let flush_handle = tokio::spawn(flush::run(
        Arc::clone(&ledger),
        flush_rx,
        flush_cancel.clone(),
    ));

    // --- App state ---
    let state = AppState {
        ledger,
        config: Arc::new(config.clone()),
        sessions: Arc::new(SessionRegistry::new()),
        allow_list: Arc::new(AllowListCache::new()),
        corpus: Arc::new(CorpusCache::new()),
        flusher,
    };
    let sessions = Arc::clone(&state.sessions);

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    let active = sessions.active_count().await;
    tracing::info!(active, "Server stopped accepting connections, draining flush queue");

    // Stop the flush worker; it drains queued batches before exiting so
    // logout-time flushes are not lost. Bounded by the shutdown timeout.
    flush_cancel.cancel();
    let _ = tokio::time::timeout(
        Duration::from_secs(config.shutdown_timeout_secs),
        flush_handle,
    )
    .await;

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
