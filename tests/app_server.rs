//! Listener lifecycle tests.

use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use routekit::http::ServerError;
use routekit::registrar::handler;
use routekit::{AppError, AppServer, AppServerOptions, RouteConfig, RouteTree};

mod common;

fn routes() -> RouteTree<routekit::registrar::BoxHandler> {
    RouteTree::new()
        .all("/api", common::text("api"))
        .route("/hello", RouteConfig::new().get(common::text("hello world")))
}

#[tokio::test]
async fn test_created_server_is_not_listening() {
    let server = AppServer::create(common::local_options(routes())).await.unwrap();
    assert!(!server.is_listening());
    assert_eq!(server.port(), None);
    assert_eq!(server.url(), None);
}

#[tokio::test]
async fn test_missing_routes_is_rejected() {
    let result = AppServer::create(AppServerOptions::default()).await;
    assert!(matches!(result, Err(AppError::MissingRoutes)));
}

#[tokio::test]
async fn test_listen_on_random_port() {
    let mut server = AppServer::new(common::local_options(RouteTree::new())).unwrap();
    server.listen(None).await.unwrap();

    let port = server.port().unwrap();
    assert_ne!(port, 0);
    assert_eq!(server.url(), Some(format!("http://127.0.0.1:{}", port).as_str()));

    server.close().await.unwrap();
}

#[tokio::test]
async fn test_listen_on_configured_port() {
    let port = common::free_port();
    let mut server = AppServer::new(common::local_options(routes()).port(port)).unwrap();
    server.listen(None).await.unwrap();

    assert_eq!(server.port(), Some(port));
    assert!(server.url().unwrap().contains(&port.to_string()));

    let body = common::client()
        .get(format!("{}/hello", server.url().unwrap()))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(body, "hello world");

    server.close().await.unwrap();
}

#[tokio::test]
async fn test_listen_argument_overrides_port() {
    let configured = common::free_port();
    let requested = common::free_port();
    let mut server = AppServer::new(common::local_options(routes()).port(configured)).unwrap();

    server.listen(Some(requested)).await.unwrap();
    assert_eq!(server.port(), Some(requested));

    server.close().await.unwrap();
}

#[tokio::test]
async fn test_auto_listen() {
    let port = common::free_port();
    let mut server = AppServer::create(common::local_options(routes()).port(port).auto_listen(true))
        .await
        .unwrap();

    assert!(server.is_listening());
    assert_eq!(server.port(), Some(port));
    assert!(server.url().unwrap().contains(&port.to_string()));

    let response = common::client()
        .put(format!("{}/api", server.url().unwrap()))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "api");

    server.close().await.unwrap();
}

#[tokio::test]
async fn test_close_resets_state_and_stops_serving() {
    let mut server = AppServer::new(common::local_options(routes())).unwrap();
    server.listen(None).await.unwrap();
    let url = server.url().unwrap().to_string();

    server.close().await.unwrap();
    assert!(!server.is_listening());
    assert_eq!(server.port(), None);
    assert_eq!(server.url(), None);

    let result = common::client()
        .get(format!("{}/hello", url))
        .timeout(Duration::from_secs(2))
        .send()
        .await;
    assert!(result.is_err());

    // Closing again is a no-op.
    server.close().await.unwrap();
}

#[tokio::test]
async fn test_close_drains_in_flight_request() {
    let slow = handler(|_req: Request<Body>| async {
        tokio::time::sleep(Duration::from_millis(200)).await;
        "slow"
    });
    let mut server =
        AppServer::new(common::local_options(RouteTree::new().all("/slow", slow))).unwrap();
    server.listen(None).await.unwrap();
    let url = format!("{}/slow", server.url().unwrap());

    let request = tokio::spawn(async move { common::client().get(url).send().await });
    tokio::time::sleep(Duration::from_millis(50)).await;
    server.close().await.unwrap();

    let response = request.await.unwrap().unwrap();
    assert_eq!(response.text().await.unwrap(), "slow");
}

#[tokio::test]
async fn test_listen_twice_fails() {
    let mut server = AppServer::new(common::local_options(routes())).unwrap();
    server.listen(None).await.unwrap();
    let port = server.port().unwrap();

    let err = server.listen(None).await.unwrap_err();
    assert!(matches!(err, ServerError::AlreadyListening(p) if p == port));

    server.close().await.unwrap();
}

#[tokio::test]
async fn test_address_in_use_propagates() {
    let mut first = AppServer::new(common::local_options(routes())).unwrap();
    first.listen(None).await.unwrap();
    let port = first.port().unwrap();

    let mut second = AppServer::new(common::local_options(routes()).port(port)).unwrap();
    match second.listen(None).await {
        Err(ServerError::Io(e)) => assert_eq!(e.kind(), std::io::ErrorKind::AddrInUse),
        other => panic!("expected address in use, got {:?}", other),
    }
    assert!(!second.is_listening());

    first.close().await.unwrap();
}

#[tokio::test]
async fn test_in_process_router_matches_listener() {
    let server = AppServer::new(common::local_options(routes())).unwrap();
    let router = server.router();

    assert_eq!(
        common::send(&router, "GET", "/hello").await,
        (StatusCode::OK, "hello world".to_string())
    );
    assert_eq!(common::send(&router, "GET", "/missing").await.0, StatusCode::NOT_FOUND);
}
