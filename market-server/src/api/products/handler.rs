//! 商品 API 处理函数

use axum::{
    extract::{Path, State},
    Json,
};

use shared::error::StoreError;
use shared::message::SyncTopic;
use shared::models::Product;

use crate::core::{ApiResult, AppState};

/// 商品目录
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Product>>> {
    let products = state.adapter.list_products().await?;
    Ok(Json(products))
}

/// 按 id 查询商品
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Product>> {
    let product = state
        .adapter
        .get_product(&id)
        .await?
        .ok_or_else(|| StoreError::not_found(format!("product {id}")))?;
    Ok(Json(product))
}

/// 上架或更新商品，随后广播目录刷新
pub async fn upsert(
    State(state): State<AppState>,
    Json(product): Json<Product>,
) -> ApiResult<Json<Product>> {
    state.adapter.upsert_product(&product).await?;
    state.sync.broadcast(SyncTopic::RefreshProducts);
    Ok(Json(product))
}
