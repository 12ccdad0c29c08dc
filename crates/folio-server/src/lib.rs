//! # Folio Server
//!
//! REST server for portfolio statement extraction.
//!
//! ## Features
//!
//! - PDF statement upload and extraction
//! - Question answering and what-if reweighting over a snapshot
//! - Health endpoint
//! - Configuration via TOML file
//!
//! ## Usage
//!
//! ```ignore
//! use folio_server::Server;
//!
//! let server = Server::from_config(config)?;
//! server.start().await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod handlers;
pub mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use folio_extract::Pipeline;
use folio_traits::DocumentParser;

pub use config::{ConfigError, ServerConfig};
pub use handlers::AppState;

/// The Folio server.
pub struct Server {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl Server {
    /// Create a server around an existing parser.
    pub fn new(config: ServerConfig, parser: Arc<dyn DocumentParser>) -> Self {
        let state = AppState::new(parser, Pipeline::new(config.extraction.clone()))
            .with_max_upload_bytes(config.max_upload_bytes);
        Self {
            config,
            state: Arc::new(state),
        }
    }

    /// Create a server with the parser named in the configuration.
    pub fn from_config(config: ServerConfig) -> Result<Self, ConfigError> {
        let parser = config.parser.build()?;
        Ok(Self::new(config, parser))
    }

    /// Build the router.
    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        routes::create_router(self.state.clone())
            .layer(TraceLayer::new_for_http())
            .layer(cors)
    }

    /// Start the server.
    pub async fn start(&self) -> Result<(), std::io::Error> {
        let addr = SocketAddr::new(
            self.config.host.parse().unwrap_or([0, 0, 0, 0].into()),
            self.config.port,
        );

        info!(
            "Starting Folio server on {} (parser: {}, mode: {:?})",
            addr,
            self.state.parser.name(),
            self.config.extraction.mode
        );

        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, self.router()).await
    }
}
