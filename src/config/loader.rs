//! Configuration loading from disk.
//!
//! Routes and middleware in an app file reference handlers by name. The
//! loader classifies each raw value by shape and resolves the names against
//! a [`HandlerRegistry`].

use std::fs;
use std::path::Path;

use thiserror::Error;
use toml::{Table, Value};

use crate::config::registry::HandlerRegistry;
use crate::config::schema::{AppFile, ObservabilityConfig, ServerConfig};
use crate::config::validation::{validate, ValidationError};
use crate::middleware::MiddlewareEntry;
use crate::routing::classify::{
    is_handler_config, is_handler_reference, is_raw_route_config, CHILDREN_KEY, HANDLER_KEY,
};
use crate::routing::{
    join_paths, HandlerOptions, HttpMethod, RouteConfig, RouteHandler, RouteNode, RouteTree,
};

/// Middleware config key restricting it to a route pattern.
pub const ROUTE_KEY: &str = "route";

/// Key holding the options table of a handler config.
pub const OPTIONS_KEY: &str = "options";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),

    #[error("unknown handler `{name}` at {at}")]
    UnknownHandler { name: String, at: String },

    #[error("route `{at}` is not a handler or route config: {reason}")]
    UnrecognizedRoute { at: String, reason: String },

    #[error("invalid handler at {at}: {reason}")]
    InvalidHandler { at: String, reason: String },

    #[error("invalid options at {at}: {reason}")]
    InvalidOptions { at: String, reason: String },
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// An app file with every handler name resolved.
#[derive(Debug, Clone)]
pub struct ResolvedApp<H, M> {
    pub server: ServerConfig,
    pub observability: ObservabilityConfig,
    pub routes: Option<RouteTree<H>>,
    pub middlewares: Vec<MiddlewareEntry<M>>,
}

/// Read and parse an app file.
pub fn load_app_file(path: &Path) -> Result<AppFile, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_app_file(&content)
}

/// Parse app file contents.
pub fn parse_app_file(content: &str) -> Result<AppFile, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Resolve handler names and validate the result.
pub fn resolve_app<H: Clone, M: Clone>(
    file: &AppFile,
    handlers: &HandlerRegistry<H>,
    middlewares: &HandlerRegistry<M>,
) -> Result<ResolvedApp<H, M>, ConfigError> {
    let routes = file
        .routes
        .as_ref()
        .map(|table| resolve_routes(table, handlers))
        .transpose()?;
    let resolved_middlewares = resolve_middlewares(&file.middlewares, middlewares)?;

    if let Some(routes) = &routes {
        validate(routes, &file.server).map_err(ConfigError::Validation)?;
    }

    tracing::debug!(
        routes = routes.as_ref().map_or(0, RouteTree::len),
        middlewares = resolved_middlewares.len(),
        "App file resolved"
    );

    Ok(ResolvedApp {
        server: file.server.clone(),
        observability: file.observability.clone(),
        routes,
        middlewares: resolved_middlewares,
    })
}

/// Resolve a raw route table into a typed tree.
pub fn resolve_routes<H: Clone>(
    table: &Table,
    registry: &HandlerRegistry<H>,
) -> Result<RouteTree<H>, ConfigError> {
    resolve_route_table(table, "/", registry)
}

fn resolve_route_table<H: Clone>(
    table: &Table,
    base: &str,
    registry: &HandlerRegistry<H>,
) -> Result<RouteTree<H>, ConfigError> {
    let mut tree = RouteTree::new();
    for (segment, value) in table {
        let at = join_paths([base, segment.as_str()]);
        let node = match value {
            Value::String(name) => RouteNode::Handler(lookup(registry, name, &at)?),
            Value::Table(config) if config.is_empty() || is_raw_route_config(value) => {
                RouteNode::Config(resolve_route_config(config, &at, registry)?)
            }
            Value::Table(_) if is_handler_config(value) => {
                return Err(ConfigError::UnrecognizedRoute {
                    at,
                    reason: format!("a `{}` table must sit under a method key", HANDLER_KEY),
                })
            }
            Value::Table(_) => {
                return Err(ConfigError::UnrecognizedRoute {
                    at,
                    reason: format!("expected a method key or `{}`", CHILDREN_KEY),
                })
            }
            other => {
                return Err(ConfigError::UnrecognizedRoute {
                    at,
                    reason: format!("unexpected {}", other.type_str()),
                })
            }
        };
        tree.insert(segment.clone(), node);
    }
    Ok(tree)
}

fn resolve_route_config<H: Clone>(
    table: &Table,
    at: &str,
    registry: &HandlerRegistry<H>,
) -> Result<RouteConfig<H>, ConfigError> {
    let mut config = RouteConfig::new();
    for (key, value) in table {
        if key == CHILDREN_KEY {
            let children = value.as_table().ok_or_else(|| ConfigError::UnrecognizedRoute {
                at: at.to_string(),
                reason: format!("`{}` must be a table", CHILDREN_KEY),
            })?;
            config.set_children(resolve_route_table(children, at, registry)?);
            continue;
        }

        let method: HttpMethod = key.parse().map_err(|_| ConfigError::UnrecognizedRoute {
            at: at.to_string(),
            reason: format!("unknown key `{}`", key),
        })?;
        let location = format!("{} {}", method, at);
        config.insert(method, resolve_route_handler(value, &location, registry)?);
    }
    Ok(config)
}

fn resolve_route_handler<H: Clone>(
    value: &Value,
    at: &str,
    registry: &HandlerRegistry<H>,
) -> Result<RouteHandler<H>, ConfigError> {
    let (name, options) = resolve_handler_shape(value, at, &[])?;
    let handler = lookup(registry, name, at)?;
    Ok(match options {
        Some(options) => RouteHandler::with_options(handler, options),
        None => RouteHandler::Handler(handler),
    })
}

/// Resolve a raw middleware list.
pub fn resolve_middlewares<M: Clone>(
    values: &[Value],
    registry: &HandlerRegistry<M>,
) -> Result<Vec<MiddlewareEntry<M>>, ConfigError> {
    values
        .iter()
        .enumerate()
        .map(|(index, value)| {
            let at = format!("middlewares[{}]", index);
            let (name, options) = resolve_handler_shape(value, &at, &[ROUTE_KEY])?;
            let handler = lookup(registry, name, &at)?;

            if is_handler_reference(value) {
                return Ok(MiddlewareEntry::Handler(handler));
            }

            let route = match value.get(ROUTE_KEY) {
                None => None,
                Some(Value::String(route)) => Some(route.clone()),
                Some(other) => {
                    return Err(ConfigError::InvalidHandler {
                        at,
                        reason: format!(
                            "`{}` must be a string, got {}",
                            ROUTE_KEY,
                            other.type_str()
                        ),
                    })
                }
            };
            Ok(MiddlewareEntry::Config {
                handler,
                route,
                options,
            })
        })
        .collect()
}

/// Split a handler reference or handler config into name and options.
fn resolve_handler_shape<'a>(
    value: &'a Value,
    at: &str,
    extra_keys: &[&str],
) -> Result<(&'a str, Option<HandlerOptions>), ConfigError> {
    if let Value::String(name) = value {
        return Ok((name, None));
    }
    if !is_handler_config(value) {
        return Err(ConfigError::InvalidHandler {
            at: at.to_string(),
            reason: format!(
                "expected a handler name or a table with a string `{}`",
                HANDLER_KEY
            ),
        });
    }

    let mut name = "";
    let mut options = None;
    if let Value::Table(table) = value {
        for (key, entry) in table {
            match key.as_str() {
                HANDLER_KEY => name = entry.as_str().unwrap_or_default(),
                OPTIONS_KEY => options = Some(to_options(entry, at)?),
                other if extra_keys.contains(&other) => {}
                other => {
                    return Err(ConfigError::InvalidHandler {
                        at: at.to_string(),
                        reason: format!("unknown key `{}`", other),
                    })
                }
            }
        }
    }
    Ok((name, options))
}

fn to_options(value: &Value, at: &str) -> Result<HandlerOptions, ConfigError> {
    if !value.is_table() {
        return Err(ConfigError::InvalidOptions {
            at: at.to_string(),
            reason: format!("expected a table, got {}", value.type_str()),
        });
    }
    value
        .clone()
        .try_into()
        .map_err(|e: toml::de::Error| ConfigError::InvalidOptions {
            at: at.to_string(),
            reason: e.to_string(),
        })
}

fn lookup<H: Clone>(registry: &HandlerRegistry<H>, name: &str, at: &str) -> Result<H, ConfigError> {
    registry
        .get(name)
        .cloned()
        .ok_or_else(|| ConfigError::UnknownHandler {
            name: name.to_string(),
            at: at.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::{parse_routes, RouteMethod};

    fn registry() -> HandlerRegistry<String> {
        HandlerRegistry::<String>::names_of(["home", "list", "create", "show", "all"])
    }

    fn routes(src: &str) -> Result<RouteTree<String>, ConfigError> {
        let table: Table = toml::from_str(src).unwrap();
        resolve_routes(&table, &registry())
    }

    #[test]
    fn test_resolve_nested_routes() {
        let tree = routes(
            r#"
            "/all" = "all"

            ["/api"]
            POST = { handler = "create", options = { lazy = true } }
            GET = "list"

            ["/api".children."/:id"]
            GET = "show"
            "#,
        )
        .unwrap();

        let parsed = parse_routes(&tree);
        let summary: Vec<_> = parsed
            .iter()
            .map(|r| (r.method, r.route.as_str(), r.handler.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (RouteMethod::All, "/all", "all"),
                (HttpMethod::Get.into(), "/api", "list"),
                (HttpMethod::Post.into(), "/api", "create"),
                (HttpMethod::Get.into(), "/api/:id", "show"),
            ]
        );
        assert_eq!(
            parsed[2].options,
            Some(HandlerOptions::new().with("lazy", true))
        );
        assert_eq!(parsed[1].options, None);
    }

    #[test]
    fn test_unknown_handler() {
        let err = routes(r#""/x" = { GET = "missing" }"#).unwrap_err();
        match err {
            ConfigError::UnknownHandler { name, at } => {
                assert_eq!(name, "missing");
                assert_eq!(at, "GET /x");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unrecognized_route_shapes() {
        assert!(matches!(
            routes(r#""/x" = 42"#),
            Err(ConfigError::UnrecognizedRoute { .. })
        ));
        match routes(r#""/x" = { handler = "home" }"#) {
            Err(ConfigError::UnrecognizedRoute { at, reason }) => {
                assert_eq!(at, "/x");
                assert!(reason.contains("method key"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
        match routes(r#""/x" = { get = "home" }"#) {
            Err(ConfigError::UnrecognizedRoute { reason, .. }) => {
                assert!(reason.contains("children"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(matches!(
            routes(r#""/x" = { GET = 1 }"#),
            Err(ConfigError::InvalidHandler { .. })
        ));
        assert!(matches!(
            routes(r#""/x" = { GET = { handler = "home", options = "no" } }"#),
            Err(ConfigError::InvalidOptions { .. })
        ));
    }

    #[test]
    fn test_empty_route_table_resolves() {
        let tree = routes(r#""/x" = {}"#).unwrap();
        assert_eq!(tree.len(), 1);
        assert!(parse_routes(&tree).is_empty());
    }

    #[test]
    fn test_resolve_middlewares() {
        let file = parse_app_file(
            r#"
            middlewares = [
                "log",
                { handler = "auth", route = "/x" },
                { handler = "cors", options = { a = 1 } },
                { handler = "log", route = "", options = { method = "GET" } },
            ]
            "#,
        )
        .unwrap();
        let registry = HandlerRegistry::<String>::names_of(["log", "auth", "cors"]);
        let entries = resolve_middlewares(&file.middlewares, &registry).unwrap();

        assert_eq!(entries[0], MiddlewareEntry::Handler("log".to_string()));
        assert_eq!(
            entries[1],
            MiddlewareEntry::config("auth".to_string()).route("/x")
        );
        assert_eq!(
            entries[2],
            MiddlewareEntry::config("cors".to_string())
                .options(HandlerOptions::new().with("a", 1))
        );
        assert_eq!(entries[3].handler(), "log");
    }

    #[test]
    fn test_middleware_errors() {
        let registry = HandlerRegistry::<String>::names_of(["log"]);
        let bad_route = vec![toml::from_str::<Table>(r#"handler = "log"
route = 3"#)
            .map(Value::Table)
            .unwrap()];
        assert!(matches!(
            resolve_middlewares(&bad_route, &registry),
            Err(ConfigError::InvalidHandler { .. })
        ));

        let unknown = vec![Value::String("nope".into())];
        let err = resolve_middlewares(&unknown, &registry).unwrap_err();
        assert_eq!(err.to_string(), "unknown handler `nope` at middlewares[0]");
    }

    #[test]
    fn test_resolve_app_validates() {
        let file = parse_app_file(
            r#"
            [routes."/empty"]
            [routes."/ok"]
            GET = "home"
            "#,
        )
        .unwrap();
        let err = resolve_app(&file, &registry(), &HandlerRegistry::<String>::new()).unwrap_err();
        match err {
            ConfigError::Validation(errors) => {
                assert_eq!(errors, vec![ValidationError::EmptyRouteConfig("/empty".into())]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_resolve_app_without_routes() {
        let file = parse_app_file("[server]\nport = 8080").unwrap();
        let app = resolve_app(&file, &registry(), &HandlerRegistry::<String>::new()).unwrap();
        assert!(app.routes.is_none());
        assert_eq!(app.server.port, 8080);
    }
}
