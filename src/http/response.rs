//! Response conversion.
//!
//! # Responsibilities
//! - Turn a dispatched `RequestContext` into an axum response
//! - Default the content type for handlers that did not set one

use axum::body::Body;
use axum::http::{header, HeaderValue};
use axum::response::Response;

use crate::routing::RequestContext;

const DEFAULT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Build the client response from what the handler wrote.
pub fn into_response(ctx: RequestContext) -> Response {
    let (status, mut headers, body) = ctx.into_response_parts();
    headers
        .entry(header::CONTENT_TYPE)
        .or_insert_with(|| HeaderValue::from_static(DEFAULT_CONTENT_TYPE));

    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_into_response_carries_status_and_body() {
        let mut ctx = RequestContext::get("/");
        ctx.set_status(StatusCode::NOT_FOUND);
        ctx.write_body("gone");

        let response = into_response(ctx);
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            DEFAULT_CONTENT_TYPE
        );

        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], b"gone");
    }

    #[test]
    fn test_handler_content_type_kept() {
        let mut ctx = RequestContext::get("/");
        ctx.set_content_type(HeaderValue::from_static("application/json"));

        let response = into_response(ctx);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }
}
