//! Segment-matching HTTP request router.
//!
//! The core lives in [`routing`]: patterns are normalized to `/a/b/` form,
//! looked up exactly first, then matched segment by segment with `:name`
//! segments binding one path component each. Everything else wires that
//! core to a config file and an axum server.
//!
//! ```
//! use std::fmt::Write;
//! use segment_router::routing::{RequestContext, Router};
//!
//! let mut router = Router::new();
//! router.add("/users/:id", |ctx: &mut RequestContext| {
//!     let id = ctx.param("id").unwrap_or_default().to_string();
//!     let _ = write!(ctx, "user {}", id);
//! });
//!
//! let mut ctx = RequestContext::get("/users/42");
//! router.route(&mut ctx);
//! assert_eq!(ctx.response_text(), "user 42");
//! ```

pub mod config;
pub mod handlers;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::schema::RouterConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{RequestContext, Router, SharedRouter};
