//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the axum app with a single fallback that feeds the route table
//! - Wire up middleware (tracing, timeout, body limit, request ID)
//! - Serve on a listener until the shutdown broadcast fires
//! - Swap in a fresh route table on every config update
//! - Observability (metrics, correlation IDs)

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use http_body_util::LengthLimitError;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::RouterConfig;
use crate::http::request::{propagate_request_id_layer, request_id, set_request_id_layer};
use crate::http::response::into_response;
use crate::observability::metrics;
use crate::routing::{RequestContext, Router as RouteTable, SharedRouter};

/// Application state injected into the dispatch handler.
#[derive(Clone)]
pub struct AppState {
    pub routes: Arc<SharedRouter>,
    pub max_body_bytes: usize,
}

/// HTTP front end for a [`SharedRouter`].
pub struct HttpServer {
    app: Router,
    routes: Arc<SharedRouter>,
}

impl HttpServer {
    /// Create a server whose table is built from `config.routes`.
    pub fn new(config: RouterConfig) -> Self {
        let table = RouteTable::from_config(&config.routes);
        metrics::set_routes_registered(table.len());
        Self::with_routes(config, Arc::new(SharedRouter::new(table)))
    }

    /// Create a server around a table the caller already populated.
    pub fn with_routes(config: RouterConfig, routes: Arc<SharedRouter>) -> Self {
        let state = AppState {
            routes: routes.clone(),
            max_body_bytes: config.limits.max_body_bytes,
        };
        let app = Self::build_app(&config, state);
        Self { app, routes }
    }

    /// Build the axum app with all middleware layers.
    #[allow(deprecated)]
    fn build_app(config: &RouterConfig, state: AppState) -> Router {
        Router::new()
            .fallback(dispatch)
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(RequestBodyLimitLayer::new(config.limits.max_body_bytes))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer())
    }

    /// The axum app, for in-process use.
    pub fn app(&self) -> Router {
        self.app.clone()
    }

    /// The live route table.
    pub fn routes(&self) -> Arc<SharedRouter> {
        self.routes.clone()
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Route changes arriving on `config_updates` replace the table; other
    /// settings in an update need a restart to take effect.
    pub async fn run(
        self,
        listener: TcpListener,
        config_updates: mpsc::UnboundedReceiver<RouterConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            routes = self.routes.snapshot().len(),
            "HTTP server starting"
        );

        tokio::spawn(apply_updates(
            self.routes.clone(),
            config_updates,
            shutdown.resubscribe(),
        ));

        axum::serve(listener, self.app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Rebuild and swap the route table for every config received.
async fn apply_updates(
    routes: Arc<SharedRouter>,
    mut config_updates: mpsc::UnboundedReceiver<RouterConfig>,
    mut shutdown: broadcast::Receiver<()>,
) {
    loop {
        tokio::select! {
            update = config_updates.recv() => {
                let Some(config) = update else { break };
                let table = RouteTable::from_config(&config.routes);
                metrics::set_routes_registered(table.len());
                metrics::record_reload(true);
                routes.replace(table);
            }
            _ = shutdown.recv() => break,
        }
    }
    tracing::debug!("Config update loop exiting");
}

/// True when `err` or anything in its source chain is a body length limit.
fn exceeds_length_limit(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        if e.is::<LengthLimitError>() {
            return true;
        }
        current = e.source();
    }
    false
}

/// Fallback handler: every request goes through the route table.
async fn dispatch(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let (parts, body) = request.into_parts();

    let body = match axum::body::to_bytes(body, state.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(e) if exceeds_length_limit(&e) => {
            tracing::warn!(
                request_id = %request_id(&parts.headers),
                limit = state.max_body_bytes,
                "Request body too large"
            );
            return (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large").into_response();
        }
        Err(e) => {
            tracing::warn!(
                request_id = %request_id(&parts.headers),
                error = %e,
                "Failed to read request body"
            );
            return (StatusCode::BAD_REQUEST, "Failed to read request body").into_response();
        }
    };

    let mut ctx = RequestContext::new(parts.method, parts.uri.path())
        .with_headers(parts.headers)
        .with_body(body);

    let outcome = state.routes.route(&mut ctx);

    tracing::debug!(
        request_id = %request_id(ctx.headers()),
        method = %ctx.method(),
        path = %ctx.path(),
        outcome = outcome.as_str(),
        status = ctx.status().as_u16(),
        "Request dispatched"
    );
    metrics::record_dispatch(outcome, ctx.status(), start_time);

    into_response(ctx)
}
