//! Web UI: a small axum app exposing similarity search, CSV import with
//! polled progress, and collection stats, plus an embedded single-page UI.

pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

use crate::FinTerm;
use state::AppState;

pub async fn serve(ft: FinTerm, host: &str, port: u16) -> std::io::Result<()> {
    let state = AppState::new(ft);
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Web UI listening on http://{addr}");

    axum::serve(listener, router::build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
