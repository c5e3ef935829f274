//! Dispatch registrar boundary.
//!
//! # Data Flow
//! ```text
//! lifecycle::startup::build
//!     → register(plugin)            (plugins, in order)
//!     → use_middleware(parsed)      (middleware, in order)
//!     → on(method, ..) / all(..)    (routes, in flattened order)
//!     → registrar-specific dispatch (axum.rs) or a plan (recording.rs)
//! ```
//!
//! # Design Decisions
//! - The registrar owns dispatch; the resolution core only replays instructions
//! - Handler, middleware and plugin types are associated types, so the core
//!   never depends on a particular HTTP stack

pub mod axum;
pub mod matcher;
pub mod path;
pub mod recording;

use crate::middleware::ParsedMiddleware;
use crate::routing::{HandlerOptions, HttpMethod};

pub use self::axum::{
    handler, middleware, AxumRegistrar, BoxHandler, BoxMiddleware, DispatchSettings, Plugin,
    RouteMeta, SkippedRoute,
};
pub use recording::{Registration, RecordingRegistrar};

/// Something that routes, middleware and plugins can be installed into.
pub trait Registrar {
    type Handler: Clone;
    type Middleware: Clone;
    type Plugin;

    /// Install an opaque plugin unit.
    fn register(&mut self, plugin: Self::Plugin);

    /// Install a middleware in one of its four positional forms.
    fn use_middleware(&mut self, middleware: ParsedMiddleware<Self::Middleware>);

    /// Install a handler for one method on `path`.
    fn on(
        &mut self,
        method: HttpMethod,
        path: String,
        handler: Self::Handler,
        options: Option<HandlerOptions>,
    );

    /// Install a handler answering every method on `path`.
    fn all(&mut self, path: String, handler: Self::Handler, options: Option<HandlerOptions>);
}
