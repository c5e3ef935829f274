//! Route tree flattening.

use crate::routing::classify::{is_route_config, is_route_handler_config};
use crate::routing::method::{RouteMethod, HTTP_METHODS};
use crate::routing::options::HandlerOptions;
use crate::routing::path::join_paths;
use crate::routing::tree::{RouteNode, RouteTree};

/// One registration instruction produced by flattening.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRoute<H> {
    /// Canonical absolute path.
    pub route: String,
    pub method: RouteMethod,
    pub handler: H,
    pub options: Option<HandlerOptions>,
}

/// Flatten `tree` into registration order, rooted at `/`.
pub fn parse_routes<H: Clone>(tree: &RouteTree<H>) -> Vec<ParsedRoute<H>> {
    parse_routes_with_base(tree, "/")
}

/// Flatten `tree`, prefixing every path with `base_path`.
///
/// Paths keep declaration order, methods inside one config follow
/// [`HTTP_METHODS`], and children come after their parent's methods.
pub fn parse_routes_with_base<H: Clone>(
    tree: &RouteTree<H>,
    base_path: &str,
) -> Vec<ParsedRoute<H>> {
    let mut parsed = Vec::new();
    collect(tree, base_path, &mut parsed);
    parsed
}

fn collect<H: Clone>(tree: &RouteTree<H>, base_path: &str, out: &mut Vec<ParsedRoute<H>>) {
    for (segment, node) in tree.iter() {
        let full_path = join_paths([base_path, segment]);

        match node {
            RouteNode::Config(config) => {
                if !is_route_config(node) {
                    tracing::debug!(path = %full_path, "Route config declares nothing");
                    continue;
                }

                for method in HTTP_METHODS {
                    let Some(declared) = config.handler_for(method) else {
                        continue;
                    };
                    let options = if is_route_handler_config(declared) {
                        declared.options().cloned()
                    } else {
                        None
                    };
                    out.push(ParsedRoute {
                        route: full_path.clone(),
                        method: method.into(),
                        handler: declared.handler().clone(),
                        options,
                    });
                }

                if let Some(children) = config.child_routes() {
                    collect(children, &full_path, out);
                }
            }
            RouteNode::Handler(handler) => out.push(ParsedRoute {
                route: full_path,
                method: RouteMethod::All,
                handler: handler.clone(),
                options: None,
            }),
        }
    }
}
