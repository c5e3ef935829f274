//! Shape classification for route and middleware declarations.
//!
//! Typed declarations carry their shape in the variant tag, so the typed
//! predicates are plain matches. Declarations read from a config file
//! arrive as untyped TOML values and are classified structurally:
//!
//! - a *handler reference* is a string naming a registered handler;
//! - a *handler config* is a table whose `handler` entry is a reference;
//! - a *route config* is a table with a method key or `children`.
//!
//! None of the predicates fail; anything unrecognised is simply `false`.

use toml::Value;

use crate::middleware::MiddlewareEntry;
use crate::routing::method::HTTP_METHODS;
use crate::routing::tree::{RouteHandler, RouteNode};

/// Key holding nested routes inside a route config.
pub const CHILDREN_KEY: &str = "children";

/// Key holding the handler reference inside a handler config.
pub const HANDLER_KEY: &str = "handler";

pub fn is_route_handler_config<H>(value: &RouteHandler<H>) -> bool {
    matches!(value, RouteHandler::Config { .. })
}

pub fn is_middleware_config<M>(value: &MiddlewareEntry<M>) -> bool {
    matches!(value, MiddlewareEntry::Config { .. })
}

/// True for a config node declaring at least one method or children.
pub fn is_route_config<H>(node: &RouteNode<H>) -> bool {
    match node {
        RouteNode::Config(config) => config.has_methods() || config.has_children(),
        RouteNode::Handler(_) => false,
    }
}

/// A raw value usable where a handler is expected.
pub fn is_handler_reference(value: &Value) -> bool {
    value.is_str()
}

/// A raw table whose `handler` entry is a handler reference.
pub fn is_handler_config(value: &Value) -> bool {
    value
        .as_table()
        .and_then(|table| table.get(HANDLER_KEY))
        .is_some_and(is_handler_reference)
}

/// A raw table declaring at least one method key or `children`.
pub fn is_raw_route_config(value: &Value) -> bool {
    value.as_table().is_some_and(|table| {
        table.contains_key(CHILDREN_KEY)
            || HTTP_METHODS.iter().any(|m| table.contains_key(m.as_str()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::tree::RouteConfig;

    fn parse(src: &str) -> Value {
        let table: toml::Table = toml::from_str(src).unwrap();
        table.get("v").cloned().unwrap()
    }

    #[test]
    fn test_typed_route_config() {
        let bare: RouteNode<&str> = RouteNode::Handler("h");
        assert!(!is_route_config(&bare));

        let with_method: RouteNode<&str> = RouteConfig::new().get("h").into();
        assert!(is_route_config(&with_method));

        let with_children: RouteNode<&str> =
            RouteConfig::new().children(Default::default()).into();
        assert!(is_route_config(&with_children));

        let empty: RouteNode<&str> = RouteConfig::new().into();
        assert!(!is_route_config(&empty));
    }

    #[test]
    fn test_typed_handler_config() {
        assert!(!is_route_handler_config(&RouteHandler::Handler("h")));
        assert!(is_route_handler_config(&RouteHandler::Config {
            handler: "h",
            options: None,
        }));
    }

    #[test]
    fn test_typed_middleware_config() {
        assert!(!is_middleware_config(&MiddlewareEntry::Handler("mw")));
        assert!(is_middleware_config(&MiddlewareEntry::config("mw")));
        assert!(is_middleware_config(&MiddlewareEntry::Handler("mw").route("/api")));
    }

    #[test]
    fn test_raw_handler_config() {
        assert!(is_handler_config(&parse(r#"v = { handler = "echo" }"#)));
        assert!(is_handler_config(&parse(
            r#"v = { handler = "echo", route = "/api" }"#
        )));
        assert!(!is_handler_config(&parse(r#"v = { route = "/api" }"#)));
        assert!(!is_handler_config(&parse("v = {}")));
        assert!(!is_handler_config(&parse(r#"v = "echo""#)));
        assert!(!is_handler_config(&parse("v = { handler = 1 }")));
        assert!(!is_handler_config(&parse("v = [1, 2]")));
    }

    #[test]
    fn test_raw_route_config() {
        assert!(is_raw_route_config(&parse(r#"v = { GET = "ok" }"#)));
        assert!(is_raw_route_config(&parse("v = { children = {} }")));
        assert!(!is_raw_route_config(&parse(r#"v = { get = "ok" }"#)));
        assert!(!is_raw_route_config(&parse(r#"v = { handler = "ok" }"#)));
        assert!(!is_raw_route_config(&parse(r#"v = "ok""#)));
        assert!(!is_raw_route_config(&parse("v = {}")));
    }
}
