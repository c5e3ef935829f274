//! Startup orchestration: replaying declarations against a registrar.
//!
//! # Responsibilities
//! - Flatten routes and resolve middleware
//! - Register plugins, then middleware, then routes
//!
//! # Design Decisions
//! - The order is fixed: middleware installed before routes sees all of
//!   their traffic; plugins go first so explicit lists can layer on top
//! - Absent lists are skipped, never an error

use crate::middleware::{parse_middlewares, MiddlewareEntry};
use crate::observability::metrics;
use crate::registrar::Registrar;
use crate::routing::{parse_routes, RouteMethod, RouteTree};

/// Everything that can be registered on an app.
#[derive(Debug, Clone)]
pub struct AppOptions<H, M, P> {
    pub routes: Option<RouteTree<H>>,
    pub middlewares: Option<Vec<MiddlewareEntry<M>>>,
    pub plugins: Option<Vec<P>>,
}

impl<H, M, P> Default for AppOptions<H, M, P> {
    fn default() -> Self {
        Self {
            routes: None,
            middlewares: None,
            plugins: None,
        }
    }
}

impl<H, M, P> AppOptions<H, M, P> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn routes(mut self, routes: RouteTree<H>) -> Self {
        self.routes = Some(routes);
        self
    }

    pub fn middlewares(mut self, middlewares: Vec<MiddlewareEntry<M>>) -> Self {
        self.middlewares = Some(middlewares);
        self
    }

    pub fn plugins(mut self, plugins: Vec<P>) -> Self {
        self.plugins = Some(plugins);
        self
    }
}

/// Register every declaration on `app` and hand it back.
pub fn build<R: Registrar>(
    mut app: R,
    options: AppOptions<R::Handler, R::Middleware, R::Plugin>,
) -> R {
    let AppOptions {
        routes,
        middlewares,
        plugins,
    } = options;

    let plugins = plugins.unwrap_or_default();
    let plugin_count = plugins.len();
    for plugin in plugins {
        app.register(plugin);
        metrics::record_registration("plugin");
    }

    let parsed_middlewares = parse_middlewares(middlewares.as_deref().unwrap_or_default());
    let middleware_count = parsed_middlewares.len();
    for middleware in parsed_middlewares {
        tracing::debug!(
            route = middleware.route().unwrap_or("*"),
            arity = middleware.arity(),
            "Registering middleware"
        );
        app.use_middleware(middleware);
        metrics::record_registration("middleware");
    }

    let parsed_routes = routes.as_ref().map(parse_routes).unwrap_or_default();
    let route_count = parsed_routes.len();
    for route in parsed_routes {
        tracing::debug!(method = %route.method, path = %route.route, "Registering route");
        match route.method {
            RouteMethod::All => app.all(route.route, route.handler, route.options),
            RouteMethod::Method(method) => {
                app.on(method, route.route, route.handler, route.options)
            }
        }
        metrics::record_registration("route");
    }

    tracing::info!(
        plugins = plugin_count,
        middlewares = middleware_count,
        routes = route_count,
        "Registration complete"
    );

    app
}
