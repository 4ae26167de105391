//! 商品 API 模块

mod handler;

use axum::{routing::get, Router};

use crate::core::AppState;

/// 商品路由
pub fn router() -> Router<AppState> {
    Router::new().nest("/api/products", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        // 商品目录：上架/更新走同一个 upsert
        .route("/", get(handler::list).post(handler::upsert))
        .route("/{id}", get(handler::get_by_id))
}
