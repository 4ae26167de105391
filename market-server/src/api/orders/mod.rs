//! 订单 API 模块
//!
//! 结账流水线、三个角色的订单查询、状态流转与买家取消。

mod handler;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::core::AppState;

/// 订单路由
pub fn router() -> Router<AppState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        // 结账流水线
        .route("/checkout", post(handler::checkout))
        // 管理端全平台账本
        .route("/", get(handler::global_ledger))
        // 买家订单历史 (最新在前)
        .route("/buyer/{buyer_id}", get(handler::buyer_history))
        // 卖家订单行 + 营收汇总
        .route("/seller/{seller_id}", get(handler::seller_dashboard))
        // 状态流转 (卖家/管理端)
        .route("/{id}/status", put(handler::set_status))
        // 买家取消
        .route("/{id}/cancel", post(handler::cancel))
}
