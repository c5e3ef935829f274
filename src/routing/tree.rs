//! Declarative route tree types.
//!
//! A [`RouteTree`] maps path segments to [`RouteNode`]s in declaration
//! order. A node is either a bare handler (matches every method) or a
//! [`RouteConfig`] carrying per-method handlers and nested children.

use indexmap::IndexMap;

use crate::routing::method::{HttpMethod, HTTP_METHODS};
use crate::routing::options::HandlerOptions;

/// Handler declared under a method key.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteHandler<H> {
    /// Plain handler, no options.
    Handler(H),
    /// Handler with an options bag. `options` may still be absent.
    Config {
        handler: H,
        options: Option<HandlerOptions>,
    },
}

impl<H> RouteHandler<H> {
    pub fn with_options(handler: H, options: HandlerOptions) -> Self {
        RouteHandler::Config {
            handler,
            options: Some(options),
        }
    }

    pub fn handler(&self) -> &H {
        match self {
            RouteHandler::Handler(handler) => handler,
            RouteHandler::Config { handler, .. } => handler,
        }
    }

    pub fn options(&self) -> Option<&HandlerOptions> {
        match self {
            RouteHandler::Handler(_) => None,
            RouteHandler::Config { options, .. } => options.as_ref(),
        }
    }
}

impl<H> From<H> for RouteHandler<H> {
    fn from(handler: H) -> Self {
        RouteHandler::Handler(handler)
    }
}

/// Per-method route declaration with optional children.
///
/// Methods are stored in the order they were declared; flattening
/// re-orders them canonically.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteConfig<H> {
    methods: IndexMap<HttpMethod, RouteHandler<H>>,
    children: Option<RouteTree<H>>,
}

impl<H> Default for RouteConfig<H> {
    fn default() -> Self {
        Self {
            methods: IndexMap::new(),
            children: None,
        }
    }
}

impl<H> RouteConfig<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a handler for `method`, replacing any earlier declaration.
    pub fn on(mut self, method: HttpMethod, handler: impl Into<RouteHandler<H>>) -> Self {
        self.methods.insert(method, handler.into());
        self
    }

    pub fn get(self, handler: impl Into<RouteHandler<H>>) -> Self {
        self.on(HttpMethod::Get, handler)
    }

    pub fn post(self, handler: impl Into<RouteHandler<H>>) -> Self {
        self.on(HttpMethod::Post, handler)
    }

    pub fn put(self, handler: impl Into<RouteHandler<H>>) -> Self {
        self.on(HttpMethod::Put, handler)
    }

    pub fn patch(self, handler: impl Into<RouteHandler<H>>) -> Self {
        self.on(HttpMethod::Patch, handler)
    }

    pub fn delete(self, handler: impl Into<RouteHandler<H>>) -> Self {
        self.on(HttpMethod::Delete, handler)
    }

    pub fn children(mut self, children: RouteTree<H>) -> Self {
        self.children = Some(children);
        self
    }

    pub fn insert(&mut self, method: HttpMethod, handler: RouteHandler<H>) {
        self.methods.insert(method, handler);
    }

    pub fn set_children(&mut self, children: RouteTree<H>) {
        self.children = Some(children);
    }

    pub fn handler_for(&self, method: HttpMethod) -> Option<&RouteHandler<H>> {
        self.methods.get(&method)
    }

    pub fn child_routes(&self) -> Option<&RouteTree<H>> {
        self.children.as_ref()
    }

    pub fn has_methods(&self) -> bool {
        HTTP_METHODS.iter().any(|m| self.methods.contains_key(m))
    }

    pub fn has_children(&self) -> bool {
        self.children.is_some()
    }
}

/// Declaration for a single path segment.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteNode<H> {
    /// Bare handler answering every method.
    Handler(H),
    Config(RouteConfig<H>),
}

impl<H> From<RouteConfig<H>> for RouteNode<H> {
    fn from(config: RouteConfig<H>) -> Self {
        RouteNode::Config(config)
    }
}

/// Ordered mapping from path segment to node.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteTree<H> {
    routes: IndexMap<String, RouteNode<H>>,
}

impl<H> Default for RouteTree<H> {
    fn default() -> Self {
        Self {
            routes: IndexMap::new(),
        }
    }
}

impl<H> RouteTree<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a bare handler answering every method on `path`.
    pub fn all(self, path: impl Into<String>, handler: H) -> Self {
        self.node(path, RouteNode::Handler(handler))
    }

    /// Declare a per-method route config on `path`.
    pub fn route(self, path: impl Into<String>, config: RouteConfig<H>) -> Self {
        self.node(path, RouteNode::Config(config))
    }

    pub fn node(mut self, path: impl Into<String>, node: RouteNode<H>) -> Self {
        self.insert(path, node);
        self
    }

    /// Insert a node. Re-declaring a segment replaces the node but keeps
    /// the segment's original position.
    pub fn insert(&mut self, path: impl Into<String>, node: RouteNode<H>) -> Option<RouteNode<H>> {
        self.routes.insert(path.into(), node)
    }

    pub fn get(&self, path: &str) -> Option<&RouteNode<H>> {
        self.routes.get(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RouteNode<H>)> {
        self.routes.iter().map(|(path, node)| (path.as_str(), node))
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl<H, P: Into<String>> FromIterator<(P, RouteNode<H>)> for RouteTree<H> {
    fn from_iter<I: IntoIterator<Item = (P, RouteNode<H>)>>(iter: I) -> Self {
        let mut tree = RouteTree::new();
        for (path, node) in iter {
            tree.insert(path, node);
        }
        tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redeclared_segment_keeps_position() {
        let tree = RouteTree::new()
            .all("/b", "first")
            .all("/a", "a")
            .all("/b", "second");

        let entries: Vec<_> = tree.iter().map(|(p, n)| (p.to_string(), n.clone())).collect();
        assert_eq!(
            entries,
            vec![
                ("/b".to_string(), RouteNode::Handler("second")),
                ("/a".to_string(), RouteNode::Handler("a")),
            ]
        );
    }

    #[test]
    fn test_config_method_lookup() {
        let config = RouteConfig::new().post("p").get("g").post("p2");
        assert_eq!(config.handler_for(HttpMethod::Post), Some(&RouteHandler::Handler("p2")));
        assert_eq!(config.handler_for(HttpMethod::Put), None);
        assert!(config.has_methods());
        assert!(!config.has_children());
    }

    #[test]
    fn test_handler_options_accessors() {
        let plain: RouteHandler<&str> = "h".into();
        assert_eq!(plain.options(), None);

        let opts = HandlerOptions::new().with("lazy", true);
        let configured = RouteHandler::with_options("h", opts.clone());
        assert_eq!(*configured.handler(), "h");
        assert_eq!(configured.options(), Some(&opts));
    }
}
