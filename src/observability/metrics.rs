//! Metrics collection and exposition.
//!
//! # Metrics
//! - `router_requests_total` (counter): dispatches by outcome, status
//! - `router_dispatch_duration_seconds` (histogram): time spent routing and in the handler
//! - `router_routes_registered` (gauge): patterns in the live table
//! - `router_reloads_total` (counter): config reloads by result
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; without an installed
//!   recorder every call is a no-op
//! - Prometheus exposition is opt-in via config

use std::net::SocketAddr;
use std::time::Instant;

use axum::http::StatusCode;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::routing::RouteOutcome;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;

    ::metrics::describe_counter!("router_requests_total", "Requests dispatched by the router");
    ::metrics::describe_histogram!(
        "router_dispatch_duration_seconds",
        ::metrics::Unit::Seconds,
        "Dispatch latency including handler time"
    );
    ::metrics::describe_gauge!("router_routes_registered", "Patterns in the live route table");
    ::metrics::describe_counter!("router_reloads_total", "Route table reloads");

    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one dispatch.
pub fn record_dispatch(outcome: RouteOutcome, status: StatusCode, start: Instant) {
    ::metrics::counter!(
        "router_requests_total",
        "outcome" => outcome.as_str(),
        "status" => status.as_u16().to_string()
    )
    .increment(1);

    ::metrics::histogram!("router_dispatch_duration_seconds", "outcome" => outcome.as_str())
        .record(start.elapsed().as_secs_f64());
}

pub fn set_routes_registered(count: usize) {
    ::metrics::gauge!("router_routes_registered").set(count as f64);
}

pub fn record_reload(success: bool) {
    let result = if success { "success" } else { "failure" };
    ::metrics::counter!("router_reloads_total", "result" => result).increment(1);
}
