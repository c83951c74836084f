//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use segment_router::config::RouterConfig;
use segment_router::http::HttpServer;
use segment_router::lifecycle::Shutdown;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tower::ServiceExt;

/// A server running on an ephemeral local port.
#[allow(dead_code)]
pub struct RunningServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub config_updates: mpsc::UnboundedSender<RouterConfig>,
}

/// Start `server` on 127.0.0.1 with an OS-assigned port.
#[allow(dead_code)]
pub async fn start_server(server: HttpServer) -> RunningServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let (config_updates, updates_rx) = mpsc::unbounded_channel();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, updates_rx, server_shutdown).await;
    });

    // Give the accept loop a moment to start.
    tokio::time::sleep(Duration::from_millis(50)).await;

    RunningServer {
        addr,
        shutdown,
        config_updates,
    }
}

/// Send one request through the app in-process.
#[allow(dead_code)]
pub async fn send(server: &HttpServer, request: Request<Body>) -> (u16, String, Response<()>) {
    let response = server.app().oneshot(request).await.unwrap();
    let (parts, body) = response.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    (
        parts.status.as_u16(),
        String::from_utf8(bytes.to_vec()).unwrap(),
        Response::from_parts(parts, ()),
    )
}

/// `GET path` through the app in-process.
#[allow(dead_code)]
pub async fn get(server: &HttpServer, path: &str) -> (u16, String) {
    let request = Request::builder().uri(path).body(Body::empty()).unwrap();
    let (status, body, _) = send(server, request).await;
    (status, body)
}
