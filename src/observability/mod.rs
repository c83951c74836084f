//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Routing and transport produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout, pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured logging for machine parsing
//! - Request ID flows through the transport's trace spans
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
