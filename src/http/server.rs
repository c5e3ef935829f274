//! HTTP server setup and listener lifecycle.
//!
//! # Responsibilities
//! - Register plugins, middleware and routes on an axum registrar
//! - Bind a TCP listener and serve the frozen router
//! - Expose the bound port and URL while listening
//! - Drain in-flight requests on close
//!
//! # Design Decisions
//! - Construction fails without a route set; an empty route set is fine
//! - `listen` resolves once the socket is bound, serving runs on a task
//! - `close` on a server that is not listening is a no-op

use std::io;

use axum::Router;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::config::{validate, ConfigError, ServerConfig};
use crate::error::AppError;
use crate::http::url::{build_server_url, UrlError};
use crate::lifecycle::{build, AppOptions, Shutdown};
use crate::middleware::MiddlewareEntry;
use crate::registrar::{
    AxumRegistrar, BoxHandler, BoxMiddleware, DispatchSettings, Plugin, SkippedRoute,
};
use crate::routing::RouteTree;

/// Listener errors.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("server is already listening on port {0}")]
    AlreadyListening(u16),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Url(#[from] UrlError),

    #[error("serve task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Options for [`AppServer`].
#[derive(Clone, Default)]
pub struct AppServerOptions {
    pub routes: Option<RouteTree<BoxHandler>>,
    pub middlewares: Option<Vec<MiddlewareEntry<BoxMiddleware>>>,
    pub plugins: Option<Vec<Plugin>>,
    pub server: ServerConfig,
}

impl AppServerOptions {
    pub fn new(routes: RouteTree<BoxHandler>) -> Self {
        Self {
            routes: Some(routes),
            ..Self::default()
        }
    }

    pub fn middlewares(mut self, middlewares: Vec<MiddlewareEntry<BoxMiddleware>>) -> Self {
        self.middlewares = Some(middlewares);
        self
    }

    pub fn plugins(mut self, plugins: Vec<Plugin>) -> Self {
        self.plugins = Some(plugins);
        self
    }

    pub fn server(mut self, server: ServerConfig) -> Self {
        self.server = server;
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.server.port = port;
        self
    }

    pub fn hostname(mut self, hostname: impl Into<String>) -> Self {
        self.server.hostname = hostname.into();
        self
    }

    pub fn protocol(mut self, protocol: impl Into<String>) -> Self {
        self.server.protocol = protocol.into();
        self
    }

    pub fn auto_listen(mut self, auto_listen: bool) -> Self {
        self.server.auto_listen = auto_listen;
        self
    }
}

struct Running {
    port: u16,
    url: String,
    shutdown: Shutdown,
    task: JoinHandle<io::Result<()>>,
}

/// An app plus its listener.
pub struct AppServer {
    router: Router,
    config: ServerConfig,
    plugins: Vec<String>,
    skipped: Vec<SkippedRoute>,
    running: Option<Running>,
}

impl AppServer {
    /// Register everything and freeze the router. Does not listen.
    pub fn new(options: AppServerOptions) -> Result<Self, AppError> {
        let AppServerOptions {
            routes,
            middlewares,
            plugins,
            server,
        } = options;

        let routes = routes.ok_or(AppError::MissingRoutes)?;
        validate(&routes, &server).map_err(ConfigError::Validation)?;

        let registrar = build(
            AxumRegistrar::with_settings(DispatchSettings::from(&server)),
            AppOptions {
                routes: Some(routes),
                middlewares,
                plugins,
            },
        );
        let plugins = registrar.plugins().to_vec();
        let skipped = registrar.skipped().to_vec();

        Ok(Self {
            router: registrar.into_router(),
            config: server,
            plugins,
            skipped,
            running: None,
        })
    }

    /// Like [`new`](Self::new), then listen when `auto_listen` is set.
    pub async fn create(options: AppServerOptions) -> Result<Self, AppError> {
        let mut server = Self::new(options)?;
        if server.config.auto_listen {
            server.listen(None).await?;
        }
        Ok(server)
    }

    /// Bind and start serving. `port` overrides the configured port.
    pub async fn listen(&mut self, port: Option<u16>) -> Result<(), ServerError> {
        if let Some(running) = &self.running {
            return Err(ServerError::AlreadyListening(running.port));
        }

        let target = port.unwrap_or(self.config.port);
        let bind_host = self
            .config
            .hostname
            .trim_start_matches('[')
            .trim_end_matches(']');
        let listener = TcpListener::bind((bind_host, target)).await?;
        let local_addr = listener.local_addr()?;
        let url = build_server_url(
            &self.config.protocol,
            &self.config.hostname,
            Some(local_addr.port()),
        )?;

        let shutdown = Shutdown::new();
        let signal = shutdown.wait();
        let app = self.router.clone();
        let task = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(signal)
                .await
        });

        tracing::info!(address = %local_addr, url = %url, "Server listening");

        self.running = Some(Running {
            port: local_addr.port(),
            url,
            shutdown,
            task,
        });
        Ok(())
    }

    /// Stop accepting, wait for in-flight requests, reset port and URL.
    pub async fn close(&mut self) -> Result<(), ServerError> {
        let Some(running) = self.running.take() else {
            return Ok(());
        };

        running.shutdown.trigger();
        running.task.await??;

        tracing::info!(port = running.port, "Server closed");
        Ok(())
    }

    /// Bound port while listening.
    pub fn port(&self) -> Option<u16> {
        self.running.as_ref().map(|r| r.port)
    }

    /// Server URL while listening.
    pub fn url(&self) -> Option<&str> {
        self.running.as_ref().map(|r| r.url.as_str())
    }

    pub fn is_listening(&self) -> bool {
        self.running.is_some()
    }

    /// A handle to the frozen router, for in-process dispatch.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Names of the registered plugins.
    pub fn plugins(&self) -> &[String] {
        &self.plugins
    }

    /// Routes the registrar refused.
    pub fn skipped(&self) -> &[SkippedRoute] {
        &self.skipped
    }
}

impl Drop for AppServer {
    fn drop(&mut self) {
        if let Some(running) = &self.running {
            running.shutdown.trigger();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::RouteConfig;

    #[test]
    fn test_missing_routes() {
        let result = AppServer::new(AppServerOptions::default());
        assert!(matches!(result, Err(AppError::MissingRoutes)));
    }

    #[test]
    fn test_empty_route_config_rejected() {
        let routes = RouteTree::new().route("/x", RouteConfig::new());
        let result = AppServer::new(AppServerOptions::new(routes));
        assert!(matches!(
            result,
            Err(AppError::Config(ConfigError::Validation(_)))
        ));
    }

    #[tokio::test]
    async fn test_not_listening_until_listen() {
        let mut server = AppServer::new(AppServerOptions::new(RouteTree::new())).unwrap();
        assert!(!server.is_listening());
        assert_eq!(server.port(), None);
        assert_eq!(server.url(), None);

        server.close().await.unwrap();
        assert_eq!(server.port(), None);
    }
}
