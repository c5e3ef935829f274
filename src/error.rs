//! Top-level application errors.

use thiserror::Error;

use crate::config::ConfigError;
use crate::http::server::ServerError;

/// Errors surfaced by [`AppServer`](crate::http::AppServer) and the CLI.
#[derive(Debug, Error)]
pub enum AppError {
    /// The server was created without a route set.
    #[error("no routes configured")]
    MissingRoutes,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Server(#[from] ServerError),
}
