//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::Router;
use tower::ServiceExt;

use routekit::registrar::{handler, middleware, BoxHandler, BoxMiddleware};
use routekit::{AppServerOptions, RouteTree};

/// Handler answering with a fixed body.
pub fn text(body: &'static str) -> BoxHandler {
    handler(move |_req: Request<Body>| async move { body })
}

/// Shared log of middleware invocations.
#[derive(Clone, Default)]
pub struct Trail(Arc<Mutex<Vec<String>>>);

impl Trail {
    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.0.lock().unwrap().clear();
    }

    /// Middleware that records `tag` and passes the request on.
    pub fn tag(&self, tag: &'static str) -> BoxMiddleware {
        let trail = self.clone();
        middleware(move |req: Request<Body>, next: Next| {
            trail.0.lock().unwrap().push(tag.to_string());
            async move { next.run(req).await }
        })
    }
}

/// Dispatch one request in-process.
pub async fn send(router: &Router, method: &str, uri: &str) -> (StatusCode, String) {
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

/// Server options bound to the IPv4 loopback.
pub fn local_options(routes: RouteTree<BoxHandler>) -> AppServerOptions {
    AppServerOptions::new(routes).hostname("127.0.0.1")
}

/// A port that was free a moment ago.
pub fn free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

/// Client without connection pooling, so closed servers are noticed.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .build()
        .unwrap()
}
