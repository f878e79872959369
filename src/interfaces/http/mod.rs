//! REST interface for the loan calculator.
//!
//! ```ignore
//! let server = Server::new(config.server, calculator);
//! server.start().await?;
//! ```

pub mod handlers;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::application::calculator::LoanCalculator;
use crate::config::ServerConfig;
use crate::error::Result;

/// The loan calculator HTTP server.
pub struct Server {
    config: ServerConfig,
    calculator: Arc<LoanCalculator>,
}

impl Server {
    pub fn new(config: ServerConfig, calculator: Arc<LoanCalculator>) -> Self {
        Self { config, calculator }
    }

    /// Build the router.
    pub fn router(&self) -> Router {
        routes::create_router(self.calculator.clone()).layer(TraceLayer::new_for_http())
    }

    /// Start the server.
    pub async fn start(&self) -> Result<()> {
        let listener = TcpListener::bind((self.config.host.as_str(), self.config.port)).await?;
        info!("Starting loan calculator server on {}", listener.local_addr()?);

        axum::serve(listener, self.router()).await?;
        Ok(())
    }
}
