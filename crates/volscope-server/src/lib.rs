//! # Volscope Server
//!
//! HTTP server for options volatility analytics.
//!
//! ## Endpoints
//!
//! - `GET /health`
//! - `POST /analyze-volatility`: ATM IV, IV/HV spread and 25-delta skew
//! - `POST /analyze-volatility/batch`: many tickers, partial results inline
//! - `POST /historical-volatility`: close-to-close historical volatility
//! - `POST /analyze-index`: 52-week range rank
//!
//! Missing-data outcomes answer 404, malformed input 400. Both carry a
//! `{ticker, error, message}` body.
//!
//! ## Usage
//!
//! ```ignore
//! use volscope_server::{Server, ServerConfig};
//!
//! let server = Server::new(ServerConfig::default());
//! server.start().await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};

/// The Volscope server.
pub struct Server {
    config: ServerConfig,
}

impl Server {
    /// Create a new server.
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Build the router.
    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        routes::create_router(self.config.analysis.clone())
            .layer(TraceLayer::new_for_http())
            .layer(cors)
    }

    /// Start the server.
    pub async fn start(&self) -> ServerResult<()> {
        let addr = self.config.bind_addr()?;

        info!("Starting Volscope server on {}", addr);

        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, self.router()).await?;
        Ok(())
    }
}
