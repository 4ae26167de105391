//! 订单 API 处理函数

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use shared::models::{Address, Cart, CartItem, Order, OrderStatus, PaymentMethod};

use crate::core::{ApiResult, AppState};
use crate::orders::CheckoutRequest;
use crate::views;

/// 结账请求体
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutPayload {
    pub buyer_id: String,
    pub items: Vec<CartItem>,
    pub shipping_address: Address,
    pub payment_method: PaymentMethod,
}

/// 结账响应
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub orders: Vec<Order>,
    /// 部分结账时创建失败的卖家
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed_sellers: Vec<String>,
}

/// 执行结账流水线
pub async fn checkout(
    State(state): State<AppState>,
    Json(payload): Json<CheckoutPayload>,
) -> ApiResult<Json<CheckoutResponse>> {
    let outcome = state
        .orders
        .place_order(CheckoutRequest {
            buyer_id: payload.buyer_id,
            cart: Cart::from_items(payload.items),
            shipping_address: payload.shipping_address,
            payment_method: payload.payment_method,
        })
        .await?;
    Ok(Json(CheckoutResponse {
        orders: outcome.orders,
        failed_sellers: outcome.failed_sellers,
    }))
}

/// 管理端全平台账本
pub async fn global_ledger(State(state): State<AppState>) -> ApiResult<Json<Vec<Order>>> {
    let orders = views::global_ledger(state.adapter.as_ref()).await?;
    Ok(Json(orders))
}

/// 买家订单历史
pub async fn buyer_history(
    State(state): State<AppState>,
    Path(buyer_id): Path<String>,
) -> ApiResult<Json<Vec<Order>>> {
    let orders = views::order_history(state.adapter.as_ref(), &buyer_id).await?;
    Ok(Json(orders))
}

/// 卖家订单行与营收汇总
pub async fn seller_dashboard(
    State(state): State<AppState>,
    Path(seller_id): Path<String>,
) -> ApiResult<Json<views::SellerDashboard>> {
    let dashboard = views::seller_dashboard(state.adapter.as_ref(), &seller_id).await?;
    Ok(Json(dashboard))
}

/// 状态流转请求体
#[derive(Debug, Deserialize)]
pub struct SetStatusPayload {
    pub status: OrderStatus,
}

/// 推进订单状态
pub async fn set_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<SetStatusPayload>,
) -> ApiResult<Json<Order>> {
    let order = state.orders.set_status(&id, payload.status).await?;
    Ok(Json(order))
}

/// 取消请求体
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelPayload {
    pub buyer_id: String,
}

/// 买家取消订单
pub async fn cancel(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<CancelPayload>,
) -> ApiResult<Json<Order>> {
    let order = state.orders.cancel_order(&id, &payload.buyer_id).await?;
    Ok(Json(order))
}
