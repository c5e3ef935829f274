//! Middleware declaration and resolution.
//!
//! # Data Flow
//! ```text
//! [MiddlewareEntry] (bare handler | handler config)
//!     → parse_middlewares (pick the registration arity per entry)
//!     → [ParsedMiddleware] (same length, same order)
//!     → registrar `use`
//! ```
//!
//! # Design Decisions
//! - One output per input; nothing dropped, merged or reordered
//! - The resolver only picks the arity, it never calls the registrar

use crate::routing::classify::is_middleware_config;
use crate::routing::options::HandlerOptions;

/// A declared middleware.
#[derive(Debug, Clone, PartialEq)]
pub enum MiddlewareEntry<M> {
    /// Global middleware with no route and no options.
    Handler(M),
    Config {
        handler: M,
        route: Option<String>,
        options: Option<HandlerOptions>,
    },
}

impl<M> MiddlewareEntry<M> {
    pub fn config(handler: M) -> Self {
        MiddlewareEntry::Config {
            handler,
            route: None,
            options: None,
        }
    }

    /// Scope a middleware to `route`. A bare entry becomes a config.
    pub fn route(self, route: impl Into<String>) -> Self {
        match self {
            MiddlewareEntry::Handler(handler) => MiddlewareEntry::Config {
                handler,
                route: Some(route.into()),
                options: None,
            },
            MiddlewareEntry::Config { handler, options, .. } => MiddlewareEntry::Config {
                handler,
                route: Some(route.into()),
                options,
            },
        }
    }

    pub fn options(self, options: HandlerOptions) -> Self {
        match self {
            MiddlewareEntry::Handler(handler) => MiddlewareEntry::Config {
                handler,
                route: None,
                options: Some(options),
            },
            MiddlewareEntry::Config { handler, route, .. } => MiddlewareEntry::Config {
                handler,
                route,
                options: Some(options),
            },
        }
    }

    pub fn handler(&self) -> &M {
        match self {
            MiddlewareEntry::Handler(handler) => handler,
            MiddlewareEntry::Config { handler, .. } => handler,
        }
    }

    /// Declared route, as written.
    pub fn scope(&self) -> Option<&str> {
        match self {
            MiddlewareEntry::Handler(_) => None,
            MiddlewareEntry::Config { route, .. } => route.as_deref(),
        }
    }

    pub fn handler_options(&self) -> Option<&HandlerOptions> {
        match self {
            MiddlewareEntry::Handler(_) => None,
            MiddlewareEntry::Config { options, .. } => options.as_ref(),
        }
    }
}

impl<M> From<M> for MiddlewareEntry<M> {
    fn from(handler: M) -> Self {
        MiddlewareEntry::Handler(handler)
    }
}

/// Positional registration form of a middleware, one variant per arity the
/// registrar's `use` accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedMiddleware<M> {
    /// `[handler]`
    Global(M),
    /// `[route, handler]`
    Routed(String, M),
    /// `[handler, options]`
    WithOptions(M, HandlerOptions),
    /// `[route, handler, options]`
    RoutedWithOptions(String, M, HandlerOptions),
}

impl<M> ParsedMiddleware<M> {
    pub fn handler(&self) -> &M {
        match self {
            ParsedMiddleware::Global(handler)
            | ParsedMiddleware::Routed(_, handler)
            | ParsedMiddleware::WithOptions(handler, _)
            | ParsedMiddleware::RoutedWithOptions(_, handler, _) => handler,
        }
    }

    pub fn route(&self) -> Option<&str> {
        match self {
            ParsedMiddleware::Routed(route, _)
            | ParsedMiddleware::RoutedWithOptions(route, _, _) => Some(route),
            _ => None,
        }
    }

    pub fn options(&self) -> Option<&HandlerOptions> {
        match self {
            ParsedMiddleware::WithOptions(_, options)
            | ParsedMiddleware::RoutedWithOptions(_, _, options) => Some(options),
            _ => None,
        }
    }

    /// Number of positional arguments this form spreads into `use`.
    pub fn arity(&self) -> usize {
        match self {
            ParsedMiddleware::Global(_) => 1,
            ParsedMiddleware::Routed(..) | ParsedMiddleware::WithOptions(..) => 2,
            ParsedMiddleware::RoutedWithOptions(..) => 3,
        }
    }

    pub fn into_parts(self) -> (Option<String>, M, Option<HandlerOptions>) {
        match self {
            ParsedMiddleware::Global(handler) => (None, handler, None),
            ParsedMiddleware::Routed(route, handler) => (Some(route), handler, None),
            ParsedMiddleware::WithOptions(handler, options) => (None, handler, Some(options)),
            ParsedMiddleware::RoutedWithOptions(route, handler, options) => {
                (Some(route), handler, Some(options))
            }
        }
    }
}

/// Resolve each entry into its registration arity, preserving order.
///
/// An empty route string counts as no route.
pub fn parse_middlewares<M: Clone>(
    middlewares: &[MiddlewareEntry<M>],
) -> Vec<ParsedMiddleware<M>> {
    middlewares.iter().map(parse_middleware).collect()
}

fn parse_middleware<M: Clone>(entry: &MiddlewareEntry<M>) -> ParsedMiddleware<M> {
    let handler = entry.handler().clone();
    if !is_middleware_config(entry) {
        return ParsedMiddleware::Global(handler);
    }

    let route = entry.scope().filter(|r| !r.is_empty()).map(str::to_string);
    match (route, entry.handler_options().cloned()) {
        (Some(route), Some(options)) => {
            ParsedMiddleware::RoutedWithOptions(route, handler, options)
        }
        (Some(route), None) => ParsedMiddleware::Routed(route, handler),
        (None, Some(options)) => ParsedMiddleware::WithOptions(handler, options),
        (None, None) => ParsedMiddleware::Global(handler),
    }
}
