//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! app file (TOML)
//!     → loader.rs (parse & deserialize into AppFile)
//!     → loader.rs (classify raw routes/middleware, resolve names
//!                  against a HandlerRegistry)
//!     → validation.rs (semantic checks)
//!     → ResolvedApp (typed RouteTree + MiddlewareEntry list)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal files
//! - Validation separates syntactic (serde) from semantic checks
//! - Unknown handler names fail at load time, not at first request

pub mod loader;
pub mod registry;
pub mod schema;
pub mod validation;

pub use loader::{load_app_file, parse_app_file, resolve_app, ConfigError, ResolvedApp};
pub use registry::HandlerRegistry;
pub use schema::{AppFile, LogFormat, ObservabilityConfig, ServerConfig};
pub use validation::{validate, ValidationError};
