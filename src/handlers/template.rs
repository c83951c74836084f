//! Fixed responses with parameter substitution.
//!
//! `"user {id}"` served for `/users/:id` at `/users/7` renders `user 7`.
//! `{{` and `}}` produce literal braces. A name the request did not bind
//! renders as nothing.

use axum::http::{HeaderValue, StatusCode};

use crate::config::RouteConfig;
use crate::routing::{Handler, RequestContext};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Text(String),
    Param(String),
}

/// A parsed body template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    parts: Vec<Part>,
}

impl Template {
    pub fn parse(source: &str) -> Self {
        let mut parts = Vec::new();
        let mut text = String::new();
        let mut chars = source.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    text.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    text.push('}');
                }
                '{' => {
                    let mut name = String::new();
                    let mut closed = false;
                    for n in chars.by_ref() {
                        if n == '}' {
                            closed = true;
                            break;
                        }
                        name.push(n);
                    }
                    if closed {
                        if !text.is_empty() {
                            parts.push(Part::Text(std::mem::take(&mut text)));
                        }
                        parts.push(Part::Param(name));
                    } else {
                        // Unterminated placeholder stays literal.
                        text.push('{');
                        text.push_str(&name);
                    }
                }
                other => text.push(other),
            }
        }

        if !text.is_empty() {
            parts.push(Part::Text(text));
        }
        Self { parts }
    }

    /// Render with parameters looked up on `ctx`.
    pub fn render(&self, ctx: &RequestContext) -> String {
        let mut out = String::new();
        for part in &self.parts {
            match part {
                Part::Text(text) => out.push_str(text),
                Part::Param(name) => out.push_str(ctx.param(name).unwrap_or_default()),
            }
        }
        out
    }
}

/// Handler that writes a configured status, content type and body.
#[derive(Debug, Clone)]
pub struct TemplateResponder {
    status: StatusCode,
    content_type: HeaderValue,
    body: Template,
}

impl TemplateResponder {
    pub fn new(status: StatusCode, content_type: HeaderValue, body: &str) -> Self {
        Self {
            status,
            content_type,
            body: Template::parse(body),
        }
    }

    /// Build from a route entry. Values that fail to parse fall back to
    /// `200` and `text/plain`; validation rejects them before this point.
    pub fn from_config(route: &RouteConfig) -> Self {
        let status = StatusCode::from_u16(route.status).unwrap_or(StatusCode::OK);
        let content_type = HeaderValue::from_str(&route.content_type)
            .unwrap_or_else(|_| HeaderValue::from_static("text/plain; charset=utf-8"));
        Self::new(status, content_type, &route.body)
    }
}

impl Handler for TemplateResponder {
    fn handle(&self, ctx: &mut RequestContext) {
        let body = self.body.render(ctx);
        ctx.set_status(self.status);
        ctx.set_content_type(self.content_type.clone());
        ctx.write_body(body);
    }
}
