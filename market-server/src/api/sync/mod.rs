//! 同步状态 API 模块
//!
//! 重连的上下文用 `/api/sync/status` 对比 epoch 和各资源版本号，
//! 判断自己错过了哪些刷新令牌。

mod handler;

use axum::{routing::get, Router};

use crate::core::AppState;

/// 同步路由
pub fn router() -> Router<AppState> {
    Router::new().route("/api/sync/status", get(handler::status))
}
