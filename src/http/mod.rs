//! HTTP listener subsystem.
//!
//! # Data Flow
//! ```text
//! AppServerOptions (routes, middleware, plugins, ServerConfig)
//!     → config::validation (reject bad declarations up front)
//!     → lifecycle::startup::build (AxumRegistrar)
//!     → frozen axum::Router
//!     → server.rs listen(): bind → url.rs build_server_url → serve task
//!     → server.rs close(): shutdown trigger → drain → port/url reset
//! ```

pub mod server;
pub mod url;

pub use server::{AppServer, AppServerOptions, ServerError};
pub use url::{build_server_url, UrlError};
