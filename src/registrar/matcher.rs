//! Middleware applicability matching.
//!
//! # Responsibilities
//! - Match the request path against a middleware's route pattern
//! - Match the request method against a middleware's `method` option
//! - Combine conditions with AND semantics
//!
//! # Design Decisions
//! - Route patterns share the route declaration syntax (`:id`, `*`, `**`)
//! - Method matching is case-insensitive
//! - Empty condition = always matches (global middleware)

use axum::body::Body;
use axum::http::Request;

use crate::middleware::ParsedMiddleware;

/// Option key restricting a middleware to one HTTP method.
pub const METHOD_OPTION: &str = "method";

/// Trait for matching requests against conditions.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the request matches this condition.
    fn matches(&self, req: &Request<Body>) -> bool;
}

/// Matches the request path against a route pattern.
#[derive(Debug, Clone)]
pub struct RoutePatternMatcher {
    segments: Vec<String>,
}

impl RoutePatternMatcher {
    pub fn new(pattern: impl AsRef<str>) -> Self {
        Self {
            segments: split_segments(pattern.as_ref())
                .map(str::to_string)
                .collect(),
        }
    }

    pub fn matches_path(&self, path: &str) -> bool {
        let mut path_segments = split_segments(path);
        for pattern in &self.segments {
            if pattern.starts_with("**") {
                return true;
            }
            let Some(segment) = path_segments.next() else {
                return false;
            };
            let wildcard = pattern == "*" || pattern.starts_with(':');
            if !wildcard && pattern != segment {
                return false;
            }
        }
        path_segments.next().is_none()
    }
}

impl Matcher for RoutePatternMatcher {
    fn matches(&self, req: &Request<Body>) -> bool {
        self.matches_path(req.uri().path())
    }
}

/// Matches the request method.
#[derive(Debug, Clone)]
pub struct MethodMatcher {
    method: String,
}

impl MethodMatcher {
    /// The method is normalized to uppercase for case-insensitive matching.
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into().to_uppercase(),
        }
    }
}

impl Matcher for MethodMatcher {
    fn matches(&self, req: &Request<Body>) -> bool {
        req.method().as_str() == self.method
    }
}

/// Combines multiple matchers with AND semantics.
#[derive(Debug, Default)]
pub struct AndMatcher {
    matchers: Vec<Box<dyn Matcher>>,
}

impl AndMatcher {
    /// Conditions implied by a middleware's route and options.
    pub fn for_middleware<M>(middleware: &ParsedMiddleware<M>) -> Self {
        let mut matchers: Vec<Box<dyn Matcher>> = Vec::new();
        if let Some(route) = middleware.route() {
            matchers.push(Box::new(RoutePatternMatcher::new(route)));
        }
        if let Some(method) = middleware
            .options()
            .and_then(|o| o.get(METHOD_OPTION))
            .and_then(|m| m.as_str())
        {
            matchers.push(Box::new(MethodMatcher::new(method)));
        }
        Self { matchers }
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }
}

impl Matcher for AndMatcher {
    fn matches(&self, req: &Request<Body>) -> bool {
        // All matchers must pass (AND)
        self.matchers.iter().all(|m| m.matches(req))
    }
}

fn split_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}
