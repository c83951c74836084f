//! Hot-swappable route table.
//!
//! # Design Decisions
//! - Dispatch loads the current snapshot without locking
//! - Changes build a new [`Router`] and swap it in atomically
//! - In-flight requests finish on the snapshot they started with

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::routing::context::RequestContext;
use crate::routing::handler::{Handler, SharedHandler};
use crate::routing::router::{RouteOutcome, Router};

/// A [`Router`] that can be replaced or extended while serving.
#[derive(Debug)]
pub struct SharedRouter {
    current: ArcSwap<Router>,
}

impl SharedRouter {
    pub fn new(router: Router) -> Self {
        Self {
            current: ArcSwap::from_pointee(router),
        }
    }

    /// The table new dispatches will use.
    pub fn snapshot(&self) -> Arc<Router> {
        self.current.load_full()
    }

    /// Dispatch against the current snapshot.
    pub fn route(&self, ctx: &mut RequestContext) -> RouteOutcome {
        self.current.load().route(ctx)
    }

    /// Install a fully built table.
    pub fn replace(&self, router: Router) {
        tracing::info!(routes = router.len(), "Route table replaced");
        self.current.store(Arc::new(router));
    }

    /// Register one handler by copying the current table.
    pub fn add<H: Handler + 'static>(&self, pattern: &str, handler: H) {
        self.add_shared(pattern, Arc::new(handler));
    }

    pub fn add_shared(&self, pattern: &str, handler: SharedHandler) {
        self.current.rcu(|current| {
            let mut next = Router::clone(current);
            next.add_shared(pattern, handler.clone());
            next
        });
    }
}

impl Default for SharedRouter {
    fn default() -> Self {
        Self::new(Router::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_replace_swaps_table() {
        let shared = SharedRouter::default();
        let mut ctx = RequestContext::get("/hello");
        assert_eq!(shared.route(&mut ctx), RouteOutcome::NotFound);

        let mut router = Router::new();
        router.add("/hello", |ctx: &mut RequestContext| ctx.write_body("hi"));
        shared.replace(router);

        let mut ctx = RequestContext::get("/hello");
        assert_eq!(shared.route(&mut ctx), RouteOutcome::Exact);
        assert_eq!(ctx.response_text(), "hi");
    }

    #[test]
    fn test_snapshot_unaffected_by_later_add() {
        let shared = SharedRouter::default();
        let before = shared.snapshot();
        shared.add("/late", |_: &mut RequestContext| {});

        assert!(before.is_empty());
        assert_eq!(shared.snapshot().len(), 1);
    }

    #[test]
    fn test_concurrent_add_and_route() {
        let shared = Arc::new(SharedRouter::default());

        let writers: Vec<_> = (0..4)
            .map(|i| {
                let shared = shared.clone();
                thread::spawn(move || {
                    for j in 0..25 {
                        shared.add(&format!("/w{}/{}", i, j), |_: &mut RequestContext| {});
                    }
                })
            })
            .collect();

        let reader = {
            let shared = shared.clone();
            thread::spawn(move || {
                for _ in 0..200 {
                    let mut ctx = RequestContext::get("/missing");
                    assert_eq!(shared.route(&mut ctx), RouteOutcome::NotFound);
                }
            })
        };

        for w in writers {
            w.join().unwrap();
        }
        reader.join().unwrap();

        assert_eq!(shared.snapshot().len(), 100);
    }
}
