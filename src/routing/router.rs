//! Route table and dispatch.
//!
//! # Responsibilities
//! - Store normalized patterns and their handlers
//! - Resolve a request path: exact key first, then segment-wise patterns
//! - Write the 404 fallback when nothing matches
//!
//! # Design Decisions
//! - Registration takes `&mut self`, dispatch takes `&self`; a table is
//!   fully built before it is shared
//! - O(1) exact lookup via HashMap
//! - O(n) segment scan over patterns in registration order; the earliest
//!   registered match wins, and an overwrite keeps its original slot
//! - No trie: cost is segments x patterns, fine for typical table sizes

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use axum::http::StatusCode;

use crate::config::RouteConfig;
use crate::handlers::TemplateResponder;
use crate::routing::context::RequestContext;
use crate::routing::handler::{Handler, SharedHandler};
use crate::routing::normalize::{normalize_route, segments};
use crate::routing::pattern::Pattern;

/// How a dispatch was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    /// The normalized path was a table key.
    Exact,
    /// A pattern matched segment by segment.
    Segmented,
    /// Nothing matched; the 404 fallback was written.
    NotFound,
}

impl RouteOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteOutcome::Exact => "exact",
            RouteOutcome::Segmented => "segmented",
            RouteOutcome::NotFound => "not_found",
        }
    }
}

struct RouteEntry {
    key: String,
    pattern: Pattern,
    handler: SharedHandler,
}

/// Maps normalized patterns to handlers.
#[derive(Clone, Default)]
pub struct Router {
    /// Normalized key -> slot in `routes`.
    index: HashMap<String, usize>,
    routes: Vec<Arc<RouteEntry>>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table with one [`TemplateResponder`] per configured route.
    pub fn from_config(routes: &[RouteConfig]) -> Self {
        let mut router = Self::new();
        for route in routes {
            router.add(&route.pattern, TemplateResponder::from_config(route));
        }
        router
    }

    /// Register `handler` under the normalized form of `pattern`.
    ///
    /// An identical normalized pattern is silently overwritten.
    pub fn add<H: Handler + 'static>(&mut self, pattern: &str, handler: H) {
        self.add_shared(pattern, Arc::new(handler));
    }

    /// Register a handler the caller keeps a handle to.
    pub fn add_shared(&mut self, pattern: &str, handler: SharedHandler) {
        let key = normalize_route(pattern);
        let entry = Arc::new(RouteEntry {
            pattern: Pattern::parse(&key),
            key: key.clone(),
            handler,
        });

        match self.index.get(&key) {
            Some(&slot) => {
                tracing::trace!(pattern = %key, "Route overwritten");
                self.routes[slot] = entry;
            }
            None => {
                tracing::trace!(pattern = %key, "Route registered");
                self.index.insert(key, self.routes.len());
                self.routes.push(entry);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Normalized patterns in registration order.
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.routes.iter().map(|entry| entry.key.as_str())
    }

    /// Dispatch `ctx` to the matching handler, or write a 404.
    pub fn route(&self, ctx: &mut RequestContext) -> RouteOutcome {
        let path = normalize_route(ctx.path());

        if let Some(&slot) = self.index.get(&path) {
            tracing::debug!(path = %path, "Exact route matched");
            self.routes[slot].handler.handle(ctx);
            return RouteOutcome::Exact;
        }

        let request: Vec<&str> = segments(&path).collect();
        for entry in &self.routes {
            let Some(bindings) = entry.pattern.match_segments(&request) else {
                continue;
            };

            tracing::debug!(path = %path, pattern = %entry.key, params = bindings.len(), "Pattern matched");
            ctx.bind_params(bindings);
            entry.handler.handle(ctx);
            ctx.clear_params();
            return RouteOutcome::Segmented;
        }

        tracing::debug!(path = %path, "No route matched");
        ctx.set_status(StatusCode::NOT_FOUND);
        ctx.set_body(format!("404 - no such route {}", path));
        RouteOutcome::NotFound
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("patterns", &self.patterns().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn text(body: &'static str) -> impl Fn(&mut RequestContext) + Send + Sync {
        move |ctx: &mut RequestContext| ctx.write_body(body)
    }

    fn table() -> Router {
        let mut router = Router::new();
        router.add("/", text("root"));
        router.add("/onething", text("onething"));
        router.add("/a/couple/of/things", text("a couple of things"));
        router.add("/a/:param/to/be/used", |ctx: &mut RequestContext| {
            let value = ctx.param("param").unwrap_or_default().to_string();
            let _ = write!(ctx, "{}", value);
        });
        router
    }

    #[test]
    fn test_route_table_scenarios() {
        let router = table();

        for (url, expect, status) in [
            ("/", "root", 200),
            ("/onething/", "onething", 200),
            ("a/couple/of/things/", "a couple of things", 200),
            ("/a/thing/to/be/used/", "thing", 200),
            ("/nonesuch", "404 - no such route /nonesuch/", 404),
        ] {
            let mut ctx = RequestContext::get(url);
            router.route(&mut ctx);
            assert_eq!(ctx.response_text(), expect, "body for {}", url);
            assert_eq!(ctx.status().as_u16(), status, "status for {}", url);
        }
    }

    #[test]
    fn test_add_normalizes_keys() {
        for (input, expect) in [
            ("", "/"),
            ("something/", "/something/"),
            ("/something", "/something/"),
            ("something", "/something/"),
        ] {
            let mut router = Router::new();
            router.add(input, |_: &mut RequestContext| {});
            assert_eq!(router.patterns().collect::<Vec<_>>(), vec![expect]);
        }
    }

    #[test]
    fn test_exact_match_wins_over_param() {
        let mut router = Router::new();
        router.add("/a/:x/", text("param"));
        router.add("/a/b/", text("literal"));

        let mut ctx = RequestContext::get("/a/b/");
        assert_eq!(router.route(&mut ctx), RouteOutcome::Exact);
        assert_eq!(ctx.response_text(), "literal");

        let mut ctx = RequestContext::get("/a/c/");
        assert_eq!(router.route(&mut ctx), RouteOutcome::Segmented);
        assert_eq!(ctx.response_text(), "param");
    }

    #[test]
    fn test_exact_match_binds_nothing() {
        let mut router = Router::new();
        router.add("/a/:x/", |ctx: &mut RequestContext| {
            let seen = ctx.param("x").map(str::to_string);
            let _ = write!(ctx, "{:?}", seen);
        });

        let mut ctx = RequestContext::get("/a/:x");
        router.route(&mut ctx);
        assert_eq!(ctx.response_text(), "None");
    }

    #[test]
    fn test_segment_count_mismatch_never_matches() {
        let mut router = Router::new();
        router.add("/:a/:b/:c/", text("three"));

        for url in ["/x/y/", "/x/y/z/w/"] {
            let mut ctx = RequestContext::get(url);
            assert_eq!(router.route(&mut ctx), RouteOutcome::NotFound, "{}", url);
            assert_eq!(ctx.status(), StatusCode::NOT_FOUND);
        }

        let mut ctx = RequestContext::get("/x/y/z");
        assert_eq!(router.route(&mut ctx), RouteOutcome::Segmented);
    }

    #[test]
    fn test_params_discarded_after_handler() {
        let mut router = Router::new();
        router.add("/users/:id/", |ctx: &mut RequestContext| {
            assert_eq!(ctx.param("id"), Some("9"));
        });

        let mut ctx = RequestContext::get("/users/9");
        router.route(&mut ctx);
        assert_eq!(ctx.param("id"), None);
    }

    #[test]
    fn test_duplicate_registration_overwrites() {
        let mut router = Router::new();
        router.add("/dup", text("first"));
        router.add("dup/", text("second"));
        assert_eq!(router.len(), 1);

        let mut ctx = RequestContext::get("/dup");
        router.route(&mut ctx);
        assert_eq!(ctx.response_text(), "second");
    }

    #[test]
    fn test_ambiguous_patterns_resolve_in_registration_order() {
        let mut router = Router::new();
        router.add("/:first/b/", text("first"));
        router.add("/a/:second/", text("second"));

        for _ in 0..16 {
            let mut ctx = RequestContext::get("/a/b/");
            router.route(&mut ctx);
            assert_eq!(ctx.response_text(), "first");
        }

        // Overwriting keeps the original slot.
        router.add("/:first/b/", text("first again"));
        let mut ctx = RequestContext::get("/a/b/");
        router.route(&mut ctx);
        assert_eq!(ctx.response_text(), "first again");
    }

    #[test]
    fn test_shared_handler_outlives_router() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let handler: SharedHandler = Arc::new(move |_: &mut RequestContext| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        {
            let mut router = Router::new();
            router.add_shared("/count", handler.clone());
            router.route(&mut RequestContext::get("/count"));
        }

        handler.handle(&mut RequestContext::get("/"));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_empty_router_not_found() {
        let router = Router::new();
        let mut ctx = RequestContext::get("");
        assert_eq!(router.route(&mut ctx), RouteOutcome::NotFound);
        assert_eq!(ctx.response_text(), "404 - no such route /");
    }
}
