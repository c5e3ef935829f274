//! HTTP method vocabulary used by route declarations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Standard HTTP methods a route config can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

/// Canonical registration order for the methods of a single route config.
pub const HTTP_METHODS: [HttpMethod; 5] = [
    HttpMethod::Get,
    HttpMethod::Post,
    HttpMethod::Put,
    HttpMethod::Patch,
    HttpMethod::Delete,
];

/// Sentinel method name for handlers that match every HTTP method.
pub const ALL_HTTP_METHOD: &str = "ALL";

impl HttpMethod {
    /// The upper-case key used in declarations (`GET`, `POST`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not one of the declarable methods.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported HTTP method: {0}")]
pub struct UnknownMethod(pub String);

impl FromStr for HttpMethod {
    type Err = UnknownMethod;

    /// Method keys are matched exactly, as they appear in route declarations.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HTTP_METHODS
            .iter()
            .copied()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| UnknownMethod(s.to_string()))
    }
}

/// Method of a flattened route: one concrete method, or every method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteMethod {
    Method(HttpMethod),
    All,
}

impl RouteMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteMethod::Method(m) => m.as_str(),
            RouteMethod::All => ALL_HTTP_METHOD,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, RouteMethod::All)
    }
}

impl From<HttpMethod> for RouteMethod {
    fn from(method: HttpMethod) -> Self {
        RouteMethod::Method(method)
    }
}

impl fmt::Display for RouteMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
