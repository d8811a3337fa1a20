//! Application state and HTTP server lifecycle.

use crate::api;
use crate::config::Config;
use crate::middleware::rate_limit::ClientRateLimiter;
use crate::services::node_manager::{LndNode, NodeRegistry};
use crate::services::resume::ResumeService;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

/// State shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub nodes: NodeRegistry,
    pub resume: ResumeService,
    pub jwt_secret: Arc<str>,
    pub rate_limiter: Arc<ClientRateLimiter>,
}

impl AppState {
    pub fn new(
        nodes: NodeRegistry,
        resume: ResumeService,
        jwt_secret: impl Into<Arc<str>>,
        rate_limit_per_minute: u32,
    ) -> Self {
        Self {
            nodes,
            resume,
            jwt_secret: jwt_secret.into(),
            rate_limiter: Arc::new(ClientRateLimiter::per_minute(rate_limit_per_minute)),
        }
    }

    /// Connects to the configured node and assembles the state.
    pub async fn from_config(config: &Config) -> anyhow::Result<Self> {
        let lnd = LndNode::new(config.lnd.clone()).await?;
        let nodes = NodeRegistry::new().register(config.node_id.clone(), Arc::new(lnd));

        Ok(Self::new(
            nodes,
            ResumeService::new(config.invoice_page_size),
            config.jwt_secret.as_str(),
            config.rate_limit_per_minute,
        ))
    }
}

pub fn create_app(state: AppState) -> Router {
    api::router(state)
}

/// Serves the app until ctrl-c.
pub async fn run_server(app: Router, listener: TcpListener) -> anyhow::Result<()> {
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
