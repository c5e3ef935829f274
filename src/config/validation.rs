//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde and the loader handle shape)
//! - Report route configs that declare nothing
//! - Check route patterns against the dispatch syntax
//! - Validate listener settings (scheme, host, timeout)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is a pure function over the declarations
//! - Runs before anything is registered

use indexmap::IndexSet;
use thiserror::Error;

use crate::config::schema::ServerConfig;
use crate::http::url::build_server_url;
use crate::registrar::path::to_axum_path;
use crate::routing::{join_paths, parse_routes, RouteNode, RouteTree};

/// A single semantic problem.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A route config with neither methods nor children.
    #[error("route `{0}` declares no methods and no children")]
    EmptyRouteConfig(String),

    #[error("route `{path}` is not a valid pattern: {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("invalid server address: {0}")]
    InvalidServerAddress(String),

    #[error("request timeout must be greater than zero")]
    InvalidTimeout,
}

/// Check a route tree. Returns every problem found, in declaration order.
pub fn validate_routes<H: Clone>(routes: &RouteTree<H>) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    collect_empty_configs(routes, "/", &mut errors);

    let mut checked = IndexSet::new();
    for route in parse_routes(routes) {
        if !checked.insert(route.route.clone()) {
            continue;
        }
        if let Err(e) = to_axum_path(&route.route) {
            errors.push(ValidationError::InvalidPath {
                path: route.route,
                reason: e.to_string(),
            });
        }
    }

    errors
}

fn collect_empty_configs<H>(tree: &RouteTree<H>, base: &str, errors: &mut Vec<ValidationError>) {
    for (segment, node) in tree.iter() {
        let RouteNode::Config(config) = node else {
            continue;
        };
        let path = join_paths([base, segment]);
        if !config.has_methods() && !config.has_children() {
            errors.push(ValidationError::EmptyRouteConfig(path));
            continue;
        }
        if let Some(children) = config.child_routes() {
            collect_empty_configs(children, &path, errors);
        }
    }
}

/// Check listener settings.
pub fn validate_server(server: &ServerConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if let Err(e) = build_server_url(&server.protocol, &server.hostname, None::<u16>) {
        errors.push(ValidationError::InvalidServerAddress(e.to_string()));
    }

    if server.request_timeout_secs == Some(0) {
        errors.push(ValidationError::InvalidTimeout);
    }

    errors
}

/// Validate routes and listener settings together.
pub fn validate<H: Clone>(
    routes: &RouteTree<H>,
    server: &ServerConfig,
) -> Result<(), Vec<ValidationError>> {
    let mut errors = validate_routes(routes);
    errors.extend(validate_server(server));

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
