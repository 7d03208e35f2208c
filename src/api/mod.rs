//! API module for the shorts catalog
//!
//! Serves search, shuffle and catalog statistics to the web frontend.

use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use crate::config::ServerConfig;
use crate::search::QueryService;

pub mod handlers;
pub mod models;
pub mod server;

/// API server for the query service
pub struct ApiServer {
    service: Arc<QueryService>,
    config: ServerConfig,
}

impl ApiServer {
    /// Create a new API server
    pub fn new(service: Arc<QueryService>, config: ServerConfig) -> Self {
        Self { service, config }
    }

    /// Start the API server
    pub async fn start(self) -> Result<()> {
        info!("🚀 Starting API server on port {}", self.config.port);
        server::start_http_server(self.service, &self.config).await
    }
}
