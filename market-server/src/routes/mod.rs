use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::core::AppState;

/// 注册全部路由 (无中间件、无状态)
pub fn build_router() -> Router<AppState> {
    Router::new()
        .merge(api::health::router())
        .merge(api::orders::router())
        .merge(api::products::router())
        .merge(api::sync::router())
}

/// 构建带中间件的完整应用
pub fn build_app(state: AppState) -> Router {
    build_router()
        // CORS - 浏览上下文跨域访问
        .layer(CorsLayer::permissive())
        // Trace - 请求级日志
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
