//! Registrar that records instructions instead of dispatching.
//!
//! Used to print a registration plan and to observe ordering in tests.

use std::fmt;

use crate::middleware::ParsedMiddleware;
use crate::registrar::Registrar;
use crate::routing::{HandlerOptions, HttpMethod, RouteMethod};

/// One recorded registrar call.
#[derive(Debug, Clone, PartialEq)]
pub enum Registration<H, M, P> {
    Plugin(P),
    Middleware(ParsedMiddleware<M>),
    Route {
        method: RouteMethod,
        path: String,
        handler: H,
        options: Option<HandlerOptions>,
    },
}

impl<H, M, P> Registration<H, M, P> {
    pub fn kind(&self) -> &'static str {
        match self {
            Registration::Plugin(_) => "plugin",
            Registration::Middleware(_) => "middleware",
            Registration::Route { .. } => "route",
        }
    }
}

impl<H: fmt::Display, M: fmt::Display, P: fmt::Display> fmt::Display for Registration<H, M, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Registration::Plugin(plugin) => write!(f, "register {}", plugin),
            Registration::Middleware(mw) => {
                write!(f, "use     ")?;
                if let Some(route) = mw.route() {
                    write!(f, "{} ", route)?;
                }
                write!(f, "{}", mw.handler())?;
                if let Some(options) = mw.options() {
                    write!(f, " {}", serde_json::Value::Object(options.as_map().clone()))?;
                }
                Ok(())
            }
            Registration::Route {
                method,
                path,
                handler,
                options,
            } => {
                write!(f, "{:<7} {} -> {}", method.as_str(), path, handler)?;
                if let Some(options) = options {
                    write!(f, " {}", serde_json::Value::Object(options.as_map().clone()))?;
                }
                Ok(())
            }
        }
    }
}

/// Registrar keeping every call in order.
#[derive(Debug, Clone)]
pub struct RecordingRegistrar<H, M, P> {
    calls: Vec<Registration<H, M, P>>,
}

impl<H, M, P> Default for RecordingRegistrar<H, M, P> {
    fn default() -> Self {
        Self { calls: Vec::new() }
    }
}

impl<H, M, P> RecordingRegistrar<H, M, P> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[Registration<H, M, P>] {
        &self.calls
    }

    pub fn into_calls(self) -> Vec<Registration<H, M, P>> {
        self.calls
    }
}

impl<H: Clone, M: Clone, P> Registrar for RecordingRegistrar<H, M, P> {
    type Handler = H;
    type Middleware = M;
    type Plugin = P;

    fn register(&mut self, plugin: P) {
        self.calls.push(Registration::Plugin(plugin));
    }

    fn use_middleware(&mut self, middleware: ParsedMiddleware<M>) {
        self.calls.push(Registration::Middleware(middleware));
    }

    fn on(
        &mut self,
        method: HttpMethod,
        path: String,
        handler: H,
        options: Option<HandlerOptions>,
    ) {
        self.calls.push(Registration::Route {
            method: method.into(),
            path,
            handler,
            options,
        });
    }

    fn all(&mut self, path: String, handler: H, options: Option<HandlerOptions>) {
        self.calls.push(Registration::Route {
            method: RouteMethod::All,
            path,
            handler,
            options,
        });
    }
}
