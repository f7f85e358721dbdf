//! Web server for cumulus.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use super::handlers::AppState;
use super::router::{create_health_router, create_router};
use crate::config::ServerConfig;
use crate::{CumulusError, Result};

/// Web server for the API.
pub struct WebServer {
    /// Server address.
    addr: SocketAddr,
    /// Application state.
    app_state: Arc<AppState>,
    /// Allowed CORS origins.
    cors_origins: Vec<String>,
}

impl WebServer {
    /// Create a new web server.
    pub fn new(config: &ServerConfig, app_state: Arc<AppState>) -> Result<Self> {
        let addr = format!("{}:{}", config.host, config.port)
            .parse()
            .map_err(|_| {
                CumulusError::Config(format!(
                    "invalid web server address {}:{}",
                    config.host, config.port
                ))
            })?;

        Ok(Self {
            addr,
            app_state,
            cors_origins: config.cors_origins.clone(),
        })
    }

    /// Run the server until the process exits.
    pub async fn run(self) -> Result<()> {
        let router = create_router(self.app_state, &self.cors_origins)
            .merge(create_health_router());

        let listener = TcpListener::bind(self.addr).await?;
        info!("Web API listening on {}", self.addr);

        axum::serve(listener, router)
            .await
            .map_err(CumulusError::Io)?;

        Ok(())
    }
}
