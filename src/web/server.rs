//! Web server implementation
//!
//! Provides the main server struct and configuration.

use axum::extract::DefaultBodyLimit;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use super::routes::{api_routes, AppState};
use super::shutdown::wait_for_shutdown_signal;
use super::{DEFAULT_BIND, DEFAULT_PORT, DEFAULT_UPLOAD_LIMIT};
use crate::convert::HtmlRenderer;

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Port to listen on
    pub port: u16,
    /// Address to bind to
    pub bind: String,
    /// Number of runtime worker threads
    pub workers: usize,
    /// Maximum request body size in bytes
    pub upload_limit: usize,
    /// Answer cross-origin requests
    pub cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind: DEFAULT_BIND.to_string(),
            workers: num_cpus::get(),
            upload_limit: DEFAULT_UPLOAD_LIMIT,
            cors: true,
        }
    }
}

impl ServerConfig {
    /// Create a new server config with the given port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Create a new server config with the given bind address
    pub fn with_bind(mut self, bind: impl Into<String>) -> Self {
        self.bind = bind.into();
        self
    }

    /// Create a new server config with the given worker count (at least one)
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Create a new server config with the given upload limit
    pub fn with_upload_limit(mut self, limit: usize) -> Self {
        self.upload_limit = limit;
        self
    }

    /// Enable or disable CORS headers
    pub fn with_cors(mut self, cors: bool) -> Self {
        self.cors = cors;
        self
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.bind, self.port).parse()
    }
}

/// Web server instance
pub struct WebServer {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl WebServer {
    /// Create a new web server with default configuration
    pub fn new() -> Self {
        Self::with_config(ServerConfig::default())
    }

    /// Create a new web server with the given configuration
    pub fn with_config(config: ServerConfig) -> Self {
        Self {
            config,
            state: Arc::new(AppState::new()),
        }
    }

    /// Replace the rendering engine
    pub fn with_renderer(mut self, renderer: Arc<dyn HtmlRenderer>) -> Self {
        self.state = Arc::new(AppState::with_renderer(renderer));
        self
    }

    /// Get the server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Build the router with all middleware applied
    pub fn router(&self) -> Router {
        let router = api_routes()
            .layer(DefaultBodyLimit::disable())
            .layer(RequestBodyLimitLayer::new(self.config.upload_limit));

        let router = if self.config.cors {
            router.layer(CorsLayer::permissive())
        } else {
            router
        };

        router
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Run the server until SIGINT or SIGTERM
    pub async fn run(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let addr = self.config.socket_addr()?;
        let router = self.router();

        tracing::info!("Starting server on http://{}", addr);
        tracing::info!("  GET  /                     - Service status");
        tracing::info!("  GET  /health               - Health check");
        tracing::info!("  POST /convert              - Convert HTML to PDF");
        tracing::info!("  POST /convert-with-params  - Convert with page size/orientation");

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, router)
            .with_graceful_shutdown(wait_for_shutdown_signal())
            .await?;

        tracing::info!("Server stopped");
        Ok(())
    }
}

impl Default for WebServer {
    fn default() -> Self {
        Self::new()
    }
}
