//! OS signal handling.
//!
//! # Responsibilities
//! - Wait for SIGINT/SIGTERM and report it as a shutdown request
//! - Turn SIGHUP into a config reload
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - SIGHUP triggers config reload, not shutdown

use std::path::PathBuf;

use tokio::sync::{broadcast, mpsc};

use crate::config::watcher::reload_into;
use crate::config::RouterConfig;

/// Resolve once Ctrl+C or SIGTERM is received.
pub async fn wait_for_shutdown() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Ctrl+C received"),
        _ = terminate => tracing::info!("SIGTERM received"),
    }
}

/// Reload `path` into `update_tx` on every SIGHUP until shutdown.
#[cfg(unix)]
pub async fn reload_on_hangup(
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<RouterConfig>,
    mut shutdown: broadcast::Receiver<()>,
) {
    use tokio::signal::unix::{signal, SignalKind};

    let mut hangup = match signal(SignalKind::hangup()) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Failed to install SIGHUP handler");
            return;
        }
    };

    loop {
        tokio::select! {
            received = hangup.recv() => {
                if received.is_none() {
                    break;
                }
                tracing::info!(path = ?path, "SIGHUP received, reloading config");
                reload_into(&path, &update_tx);
            }
            _ = shutdown.recv() => break,
        }
    }
}

/// SIGHUP does not exist here; wait for shutdown and return.
#[cfg(not(unix))]
pub async fn reload_on_hangup(
    _path: PathBuf,
    _update_tx: mpsc::UnboundedSender<RouterConfig>,
    mut shutdown: broadcast::Receiver<()>,
) {
    let _ = shutdown.recv().await;
}
