//! Handler capability.

use std::sync::Arc;

use crate::routing::context::RequestContext;

/// Processes one request/response exchange.
///
/// Implemented for any `Fn(&mut RequestContext) + Send + Sync` closure, so
/// most registrations pass a closure directly.
pub trait Handler: Send + Sync {
    fn handle(&self, ctx: &mut RequestContext);
}

impl<F> Handler for F
where
    F: Fn(&mut RequestContext) + Send + Sync,
{
    fn handle(&self, ctx: &mut RequestContext) {
        self(ctx)
    }
}

/// Shared handle to a registered handler. The registering code keeps its own
/// clone if it needs one; the router never owns the only reference.
pub type SharedHandler = Arc<dyn Handler>;
