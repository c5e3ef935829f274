//! Named handlers and middleware for app files served by the CLI.
//!
//! Handlers: `ok`, `echo`, `meta`, `no_content`.
//! Middleware: `log`, `cors`, `deny`.

use std::time::Instant;

use axum::{
    body::Body,
    http::{header, HeaderValue, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::config::HandlerRegistry;
use crate::registrar::{handler, middleware, BoxHandler, BoxMiddleware, RouteMeta};

/// Largest request body `echo` will buffer.
const MAX_ECHO_BODY: usize = 1024 * 1024;

/// Every builtin handler, by name.
pub fn handlers() -> HandlerRegistry<BoxHandler> {
    HandlerRegistry::new()
        .with("ok", handler(ok))
        .with("echo", handler(echo))
        .with("meta", handler(meta))
        .with("no_content", handler(no_content))
}

/// Every builtin middleware, by name.
pub fn middlewares() -> HandlerRegistry<BoxMiddleware> {
    HandlerRegistry::new()
        .with("log", middleware(log))
        .with("cors", middleware(cors))
        .with("deny", middleware(deny))
}

async fn ok(_req: Request<Body>) -> &'static str {
    "ok"
}

async fn no_content(_req: Request<Body>) -> StatusCode {
    StatusCode::NO_CONTENT
}

/// Reply with the request line and body.
async fn echo(req: Request<Body>) -> Response {
    let (parts, body) = req.into_parts();
    let bytes = match axum::body::to_bytes(body, MAX_ECHO_BODY).await {
        Ok(bytes) => bytes,
        Err(_) => return (StatusCode::PAYLOAD_TOO_LARGE, "Body too large").into_response(),
    };

    Json(json!({
        "method": parts.method.as_str(),
        "path": parts.uri.path(),
        "query": parts.uri.query(),
        "body": String::from_utf8_lossy(&bytes),
    }))
    .into_response()
}

/// Reply with the registration details of the matched route.
async fn meta(req: Request<Body>) -> Response {
    match req.extensions().get::<RouteMeta>() {
        Some(meta) => Json(json!({
            "path": meta.path,
            "method": meta.method.as_str(),
            "options": meta.options,
        }))
        .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn log(req: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;

    tracing::info!(
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Request handled"
    );
    response
}

async fn cors(req: Request<Body>, next: Next) -> Response {
    let mut response = next.run(req).await;
    response.headers_mut().insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    response
}

async fn deny(req: Request<Body>, _next: Next) -> Response {
    tracing::warn!(path = %req.uri().path(), "Request denied");
    (StatusCode::FORBIDDEN, "Forbidden").into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registries() {
        let names: Vec<_> = handlers().names().map(str::to_string).collect();
        assert_eq!(names, vec!["ok", "echo", "meta", "no_content"]);

        let names: Vec<_> = middlewares().names().map(str::to_string).collect();
        assert_eq!(names, vec!["log", "cors", "deny"]);
    }

    #[tokio::test]
    async fn test_echo_reports_request() {
        let echo = handlers().get("echo").cloned().unwrap();
        let response = echo(
            Request::builder()
                .method("POST")
                .uri("/hello?x=1")
                .body(Body::from("hi"))
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            value,
            json!({"method": "POST", "path": "/hello", "query": "x=1", "body": "hi"})
        );
    }
}
