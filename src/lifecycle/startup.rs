//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate configuration
//! - Initialize logging and metrics
//! - Start the config watcher and signal listeners
//! - Bind the listener and serve until shutdown
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listener binds last (traffic only when ready)

use std::net::{AddrParseError, SocketAddr};
use std::path::PathBuf;

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use crate::config::validation::validate_config;
use crate::config::watcher::ConfigWatcher;
use crate::config::{load_config, ConfigError, RouterConfig};
use crate::http::HttpServer;
use crate::lifecycle::{signals, Shutdown};
use crate::observability::logging::{self, LoggingError};
use crate::observability::metrics;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Logging(#[from] LoggingError),

    #[error("invalid metrics address {value:?}: {source}")]
    MetricsAddress {
        value: String,
        source: AddrParseError,
    },

    #[error("failed to start metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("failed to watch config file: {0}")]
    Watch(#[from] notify::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// What the command line asked for.
#[derive(Debug, Clone, Default)]
pub struct StartupOptions {
    /// Config file; `None` runs with defaults and no routes.
    pub config_path: Option<PathBuf>,
    /// Replaces `listener.bind_address`.
    pub bind_override: Option<String>,
}

/// Resolve the effective configuration.
pub fn load(options: &StartupOptions) -> Result<RouterConfig, StartupError> {
    let mut config = match &options.config_path {
        Some(path) => load_config(path)?,
        None => RouterConfig::default(),
    };

    if let Some(bind) = &options.bind_override {
        config.listener.bind_address = bind.clone();
        validate_config(&config).map_err(ConfigError::Validation)?;
    }
    Ok(config)
}

/// Run the service until Ctrl+C or SIGTERM.
pub async fn run(options: StartupOptions) -> Result<(), StartupError> {
    let config = load(&options)?;
    logging::init_logging(&config.observability)?;

    tracing::info!(
        bind_address = %config.listener.bind_address,
        routes = config.routes.len(),
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config
            .observability
            .metrics_address
            .parse()
            .map_err(|source| StartupError::MetricsAddress {
                value: config.observability.metrics_address.clone(),
                source,
            })?;
        metrics::init_metrics(addr)?;
    }

    let shutdown = Shutdown::new();
    let (update_tx, update_rx) = mpsc::unbounded_channel();

    // Kept alive for the lifetime of the server.
    let _watcher = match &options.config_path {
        Some(path) => Some(ConfigWatcher::with_sender(path, update_tx.clone()).run()?),
        None => None,
    };
    if let Some(path) = options.config_path.clone() {
        tokio::spawn(signals::reload_on_hangup(path, update_tx, shutdown.subscribe()));
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(config);
    let server_shutdown = shutdown.subscribe();

    let trigger = shutdown.clone();
    tokio::spawn(async move {
        signals::wait_for_shutdown().await;
        trigger.trigger();
    });

    server.run(listener, update_rx, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_defaults_without_file() {
        let config = load(&StartupOptions::default()).unwrap();
        assert!(config.routes.is_empty());
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
    }

    #[test]
    fn test_bind_override_is_validated() {
        let options = StartupOptions {
            config_path: None,
            bind_override: Some("127.0.0.1:9999".into()),
        };
        assert_eq!(load(&options).unwrap().listener.bind_address, "127.0.0.1:9999");

        let options = StartupOptions {
            config_path: None,
            bind_override: Some("nowhere".into()),
        };
        assert!(matches!(
            load(&options),
            Err(StartupError::Config(ConfigError::Validation(_)))
        ));
    }
}
