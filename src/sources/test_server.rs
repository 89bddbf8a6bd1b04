//! Local HTTP server for adapter tests
//!
//! Serves canned replies on an ephemeral localhost port so adapters can be
//! exercised without reaching the real providers.

use axum::Router;
use axum::http::{StatusCode, Uri, header};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

pub(crate) struct Reply {
    pub status: u16,
    pub body: String,
    pub delay: Duration,
}

impl Reply {
    pub fn ok(body: impl Into<String>) -> Self {
        Self::status(200, body)
    }

    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            delay: Duration::ZERO,
        }
    }

    /// Hold the reply back for `delay`
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

pub(crate) struct TestServer {
    base: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    /// Answer every request with `handler(path_and_query)`
    pub async fn start<F>(handler: F) -> Self
    where
        F: Fn(&str) -> Reply + Send + Sync + 'static,
    {
        let handler = Arc::new(handler);
        let app = Router::new().fallback(move |uri: Uri| {
            let handler = Arc::clone(&handler);
            async move {
                let path = uri
                    .path_and_query()
                    .map(|pq| pq.as_str().to_string())
                    .unwrap_or_default();
                let reply = handler(&path);
                if !reply.delay.is_zero() {
                    tokio::time::sleep(reply.delay).await;
                }
                (
                    StatusCode::from_u16(reply.status).unwrap(),
                    [(header::CONTENT_TYPE, "application/json")],
                    reply.body,
                )
            }
        });

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { base, handle }
    }

    /// Accept connections but never answer them
    pub async fn start_silent() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        Self { base, handle }
    }

    /// URL of a localhost port nothing listens on
    pub async fn unused_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}/", addr)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
