//! Server Implementation
//!
//! HTTP + socket.io 服务器启动和管理

use std::net::SocketAddr;

use crate::api;
use crate::core::{Config, Result, ServerState};
use crate::realtime::RealtimeBridge;

/// HTTP Server
pub struct Server {
    config: Config,
    state: Option<ServerState>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// Create server with existing state
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self {
            config,
            state: Some(state),
        }
    }

    pub async fn run(&self) -> Result<()> {
        let state = match &self.state {
            Some(s) => s.clone(),
            None => ServerState::initialize(&self.config)?,
        };

        let tasks = state.start_background_tasks();

        let (socket_layer, _io) = RealtimeBridge::new(state.hub.clone()).layer();
        let app = api::build_realtime_app(state.clone(), socket_layer);

        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("🚕 Dispatch server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        if tokio::time::timeout(self.config.shutdown_timeout(), tasks.shutdown())
            .await
            .is_err()
        {
            tracing::warn!(
                timeout_ms = self.config.shutdown_timeout_ms,
                "Background tasks did not stop within the shutdown timeout"
            );
        }

        tracing::info!(rides = state.engine.store().len(), "Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("Shutting down...");
}
