//! Route and middleware configuration resolution.
//!
//! Declarative route trees and middleware lists are flattened into an
//! ordered list of registration instructions and replayed against a
//! [`registrar::Registrar`]. The bundled registrar serves them with axum.

// Resolution core
pub mod middleware;
pub mod routing;

// Dispatch and serving
pub mod http;
pub mod registrar;

// Cross-cutting concerns
pub mod builtins;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod observability;

pub use error::AppError;
pub use http::{build_server_url, AppServer, AppServerOptions};
pub use lifecycle::{build, AppOptions, Shutdown};
pub use middleware::{parse_middlewares, MiddlewareEntry, ParsedMiddleware};
pub use registrar::{AxumRegistrar, Plugin, Registrar, RouteMeta};
pub use routing::{
    join_paths, parse_routes, HandlerOptions, HttpMethod, ParsedRoute, RouteConfig, RouteHandler,
    RouteMethod, RouteNode, RouteTree,
};
