//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Registration (at startup or reload):
//!     pattern string
//!     → normalize.rs (leading/trailing slash)
//!     → pattern.rs (literal and :param segments)
//!     → router.rs (table keyed by normalized pattern)
//!
//! Dispatch (per request):
//!     RequestContext (path)
//!     → normalize.rs
//!     → router.rs exact lookup, then segment-wise scan
//!     → handler.rs invoke, or 404 written into the context
//! ```
//!
//! # Design Decisions
//! - Exact match first, then patterns in registration order
//! - One parameter per segment, no wildcards
//! - HTTP method is not part of the key
//! - Live changes go through shared.rs snapshot swaps only

pub mod context;
pub mod handler;
pub mod normalize;
pub mod pattern;
pub mod router;
pub mod shared;

pub use context::RequestContext;
pub use handler::{Handler, SharedHandler};
pub use normalize::normalize_route;
pub use pattern::{Pattern, Segment, PARAM_SIGIL};
pub use router::{RouteOutcome, Router};
pub use shared::SharedRouter;
