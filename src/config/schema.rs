//! Configuration schema definitions.
//!
//! Listener and observability settings deserialize directly into typed
//! structs. Routes and middleware stay as raw TOML values here; the loader
//! classifies them structurally and resolves handler names.

use serde::{Deserialize, Serialize};

/// Root of an app file.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppFile {
    /// Listener settings.
    pub server: ServerConfig,

    /// Logging and metrics settings.
    pub observability: ObservabilityConfig,

    /// Nested route tree, keyed by path segment.
    pub routes: Option<toml::Table>,

    /// Middleware list, in registration order.
    pub middlewares: Vec<toml::Value>,
}

/// Listener configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Port to bind; 0 picks any free port.
    pub port: u16,

    /// Interface to bind and to print in the server URL.
    pub hostname: String,

    /// URL scheme used when building the server URL.
    pub protocol: String,

    /// Start listening as soon as the server is created.
    pub auto_listen: bool,

    /// Per-request timeout. No timeout layer when unset.
    pub request_timeout_secs: Option<u64>,

    /// Generate and propagate `x-request-id`.
    pub request_id: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 0,
            hostname: "localhost".to_string(),
            protocol: "http".to_string(),
            auto_listen: false,
            request_timeout_secs: None,
            request_id: true,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default filter directive; `RUST_LOG` takes precedence.
    pub log_level: String,

    pub log_format: LogFormat,

    /// Install the Prometheus exporter.
    pub metrics_enabled: bool,

    /// Bind address of the Prometheus scrape endpoint.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
