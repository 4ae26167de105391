//! 健康检查路由
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/health | GET | 简单健康检查 |

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::core::AppState;

/// 健康检查路由 - 公共路由
pub fn router() -> Router<AppState> {
    Router::new().route("/api/health", get(health))
}

/// 健康检查响应
#[derive(Serialize)]
pub struct HealthResponse {
    /// 状态 (healthy)
    status: &'static str,
    /// 版本号
    version: &'static str,
    /// 生效的持久化后端
    backend: String,
    /// 服务器实例 epoch
    epoch: String,
}

/// 基础健康检查
///
/// 带上后端类型和 epoch，客户端可以据此判断是否连上了新实例。
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        backend: state.config.backend.to_string(),
        epoch: state.sync.epoch().to_string(),
    })
}
