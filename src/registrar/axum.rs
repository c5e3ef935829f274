//! Axum-backed dispatch registrar.
//!
//! # Responsibilities
//! - Collect routes, middleware and plugins in registration order
//! - Translate route patterns into axum syntax
//! - Resolve duplicate and conflicting registrations (first one wins)
//! - Freeze everything into an `axum::Router` with the outer tower layers
//!
//! # Design Decisions
//! - Routes are buffered and layered at the end, so middleware observes
//!   every route regardless of when axum would apply a layer
//! - Middleware registered first runs first (outermost)
//! - A method-specific handler beats the `ALL` handler on the same path

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    http::Request,
    middleware::{from_fn, Next},
    response::{IntoResponse, Response},
    routing::{MethodFilter, MethodRouter},
    Router,
};
use futures_util::future::BoxFuture;
use indexmap::IndexMap;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::middleware::ParsedMiddleware;
use crate::observability::metrics;
use crate::registrar::matcher::{AndMatcher, Matcher};
use crate::registrar::path::{catch_all_parent, path_shape, to_axum_path};
use crate::registrar::Registrar;
use crate::routing::{HandlerOptions, HttpMethod, RouteMethod};

/// Type-erased route handler.
pub type BoxHandler = Arc<dyn Fn(Request<Body>) -> BoxFuture<'static, Response> + Send + Sync>;

/// Type-erased middleware. Call `next.run(req)` to continue the chain.
pub type BoxMiddleware =
    Arc<dyn Fn(Request<Body>, Next) -> BoxFuture<'static, Response> + Send + Sync>;

/// Wrap an async function as a [`BoxHandler`].
pub fn handler<F, Fut, R>(f: F) -> BoxHandler
where
    F: Fn(Request<Body>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse,
{
    Arc::new(move |req| {
        let fut = f(req);
        Box::pin(async move { fut.await.into_response() })
    })
}

/// Wrap an async function as a [`BoxMiddleware`].
pub fn middleware<F, Fut, R>(f: F) -> BoxMiddleware
where
    F: Fn(Request<Body>, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse,
{
    Arc::new(move |req, next| {
        let fut = f(req, next);
        Box::pin(async move { fut.await.into_response() })
    })
}

/// Registration details exposed to handlers as a request extension.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteMeta {
    /// Declared path, before syntax translation.
    pub path: String,
    pub method: RouteMethod,
    pub options: Option<HandlerOptions>,
}

/// A named unit that installs its own routes or middleware.
#[derive(Clone)]
pub struct Plugin {
    name: String,
    setup: Arc<dyn Fn(&mut AxumRegistrar) + Send + Sync>,
}

impl Plugin {
    pub fn new(
        name: impl Into<String>,
        setup: impl Fn(&mut AxumRegistrar) + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            setup: Arc::new(setup),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for Plugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plugin").field("name", &self.name).finish()
    }
}

/// A registration the registrar refused.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRoute {
    pub path: String,
    pub method: RouteMethod,
    pub reason: String,
}

/// Outer layer settings applied when the router is frozen.
#[derive(Debug, Clone, Default)]
pub struct DispatchSettings {
    pub request_timeout: Option<Duration>,
    pub request_id: bool,
}

impl From<&ServerConfig> for DispatchSettings {
    fn from(config: &ServerConfig) -> Self {
        Self {
            request_timeout: config.request_timeout_secs.map(Duration::from_secs),
            request_id: config.request_id,
        }
    }
}

#[derive(Clone)]
struct Endpoint {
    handler: BoxHandler,
    meta: RouteMeta,
    /// Installed on a catch-all's parent path rather than declared there.
    implicit: bool,
}

impl Endpoint {
    fn into_service(
        self,
    ) -> impl FnOnce(Request<Body>) -> BoxFuture<'static, Response> + Clone + Send + Sync + 'static
    {
        let Endpoint { handler, meta, .. } = self;
        move |mut req: Request<Body>| {
            req.extensions_mut().insert(meta);
            handler(req)
        }
    }
}

/// Endpoints sharing one path shape, served under the first axum path seen.
struct PathEntry {
    axum_path: String,
    methods: IndexMap<HttpMethod, Endpoint>,
    all: Option<Endpoint>,
}

struct MiddlewareLayer {
    matcher: AndMatcher,
    handler: BoxMiddleware,
}

impl MiddlewareLayer {
    async fn call(&self, req: Request<Body>, next: Next) -> Response {
        if self.matcher.matches(&req) {
            (self.handler)(req, next).await
        } else {
            next.run(req).await
        }
    }
}

/// Registrar building an `axum::Router`.
#[derive(Default)]
pub struct AxumRegistrar {
    paths: IndexMap<String, PathEntry>,
    conflicts: matchit::Router<()>,
    middlewares: Vec<Arc<MiddlewareLayer>>,
    plugins: Vec<String>,
    skipped: Vec<SkippedRoute>,
    settings: DispatchSettings,
}

impl AxumRegistrar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: DispatchSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    /// Names of registered plugins, in order.
    pub fn plugins(&self) -> &[String] {
        &self.plugins
    }

    pub fn skipped(&self) -> &[SkippedRoute] {
        &self.skipped
    }

    pub fn middleware_count(&self) -> usize {
        self.middlewares.len()
    }

    fn skip(&mut self, path: String, method: RouteMethod, reason: String) {
        tracing::warn!(
            path = %path,
            method = %method,
            reason = %reason,
            "Skipping route registration"
        );
        self.skipped.push(SkippedRoute {
            path,
            method,
            reason,
        });
    }

    fn add_endpoint(
        &mut self,
        path: String,
        method: RouteMethod,
        handler: BoxHandler,
        options: Option<HandlerOptions>,
    ) {
        let axum_path = match to_axum_path(&path) {
            Ok(p) => p,
            Err(e) => return self.skip(path, method, e.to_string()),
        };
        let parent = catch_all_parent(&path);

        let endpoint = Endpoint {
            handler,
            meta: RouteMeta {
                path,
                method,
                options,
            },
            implicit: false,
        };
        if let Err(reason) = self.install(axum_path, method, endpoint.clone()) {
            return self.skip(endpoint.meta.path, method, reason);
        }

        // A trailing `**` also answers on its parent path.
        let Some(parent) = parent else {
            return;
        };
        let implicit = Endpoint {
            implicit: true,
            ..endpoint
        };
        let installed = to_axum_path(&parent)
            .map_err(|e| e.to_string())
            .and_then(|parent_path| self.install(parent_path, method, implicit));
        if let Err(reason) = installed {
            tracing::debug!(
                path = %parent,
                method = %method,
                reason = %reason,
                "Catch-all parent not installed"
            );
        }
    }

    /// Place an endpoint under its path shape. Explicit endpoints replace
    /// implicit ones; otherwise the slot's first occupant stays.
    fn install(
        &mut self,
        axum_path: String,
        method: RouteMethod,
        endpoint: Endpoint,
    ) -> Result<(), String> {
        let shape = path_shape(&axum_path);
        if !self.paths.contains_key(&shape) {
            self.conflicts
                .insert(axum_path.clone(), ())
                .map_err(|e| e.to_string())?;
        }

        let entry = self.paths.entry(shape).or_insert_with(|| PathEntry {
            axum_path,
            methods: IndexMap::new(),
            all: None,
        });
        let current = match method {
            RouteMethod::All => entry.all.as_ref(),
            RouteMethod::Method(m) => entry.methods.get(&m),
        };
        if current.is_some_and(|current| !current.implicit || endpoint.implicit) {
            return Err("already registered".to_string());
        }

        match method {
            RouteMethod::All => entry.all = Some(endpoint),
            RouteMethod::Method(m) => {
                entry.methods.insert(m, endpoint);
            }
        }
        Ok(())
    }

    /// Freeze the registrations into a router.
    pub fn into_router(self) -> Router {
        let mut router = Router::new();

        for entry in self.paths.into_values() {
            let mut method_router: MethodRouter = MethodRouter::new();
            for (method, endpoint) in entry.methods {
                method_router = method_router.on(method_filter(method), endpoint.into_service());
            }
            if let Some(endpoint) = entry.all {
                method_router = method_router.fallback(endpoint.into_service());
            }
            router = router.route(&entry.axum_path, method_router);
        }

        // Later layers wrap earlier ones; reverse so the first registered runs first.
        for layer in self.middlewares.into_iter().rev() {
            router = router.layer(from_fn(move |req: Request<Body>, next: Next| {
                let layer = Arc::clone(&layer);
                async move { layer.call(req, next).await }
            }));
        }

        if let Some(timeout) = self.settings.request_timeout {
            #[allow(deprecated)]
            let timeout_layer = TimeoutLayer::new(timeout);
            router = router.layer(timeout_layer);
        }

        // Outside the timeout so timed-out requests are counted.
        router = router.layer(from_fn(track_metrics));

        if self.settings.request_id {
            router = router
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(TraceLayer::new_for_http())
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));
        } else {
            router = router.layer(TraceLayer::new_for_http());
        }

        router
    }
}

impl Registrar for AxumRegistrar {
    type Handler = BoxHandler;
    type Middleware = BoxMiddleware;
    type Plugin = Plugin;

    fn register(&mut self, plugin: Plugin) {
        tracing::debug!(plugin = %plugin.name, "Registering plugin");
        (plugin.setup)(self);
        self.plugins.push(plugin.name);
    }

    fn use_middleware(&mut self, middleware: ParsedMiddleware<BoxMiddleware>) {
        let matcher = AndMatcher::for_middleware(&middleware);
        tracing::debug!(
            route = middleware.route().unwrap_or("*"),
            global = matcher.is_empty(),
            "Registering middleware"
        );
        let (_, handler, _) = middleware.into_parts();
        self.middlewares
            .push(Arc::new(MiddlewareLayer { matcher, handler }));
    }

    fn on(
        &mut self,
        method: HttpMethod,
        path: String,
        handler: BoxHandler,
        options: Option<HandlerOptions>,
    ) {
        self.add_endpoint(path, method.into(), handler, options);
    }

    fn all(&mut self, path: String, handler: BoxHandler, options: Option<HandlerOptions>) {
        self.add_endpoint(path, RouteMethod::All, handler, options);
    }
}

fn method_filter(method: HttpMethod) -> MethodFilter {
    match method {
        HttpMethod::Get => MethodFilter::GET,
        HttpMethod::Post => MethodFilter::POST,
        HttpMethod::Put => MethodFilter::PUT,
        HttpMethod::Patch => MethodFilter::PATCH,
        HttpMethod::Delete => MethodFilter::DELETE,
    }
}

async fn track_metrics(req: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let response = next.run(req).await;
    metrics::record_request(&method, response.status().as_u16(), start);
    response
}
