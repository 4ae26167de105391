//! Server Implementation
//!
//! HTTP 服务器启动和管理

use crate::core::{AppState, Config};
use crate::routes;

/// HTTP Server
pub struct Server {
    config: Config,
    state: Option<AppState>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// 复用已构造的应用状态 (测试或嵌入场景)
    pub fn with_state(config: Config, state: AppState) -> Self {
        Self {
            config,
            state: Some(state),
        }
    }

    pub async fn run(&self) -> anyhow::Result<()> {
        let state = match &self.state {
            Some(s) => s.clone(),
            None => AppState::initialize(&self.config).await?,
        };

        let app = routes::build_app(state.clone());
        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        tracing::info!("Axora market server starting on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        let sync = state.sync.clone();
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = tokio::signal::ctrl_c().await;
                tracing::info!("Shutting down...");
                sync.shutdown();
            })
            .await?;

        Ok(())
    }
}
