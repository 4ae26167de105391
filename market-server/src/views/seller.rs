//! 卖家履约视图
//!
//! 订单行是派生形状，不落库；营收汇总只计入未取消的订单，
//! 平台抽成固定 5%。

use chrono::{DateTime, Utc};
use serde::Serialize;

use shared::error::StoreResult;
use shared::models::{CartItem, Order, OrderStatus};

use crate::db::PersistenceAdapter;

/// 平台抽成比例 (5%)
pub const PLATFORM_TAX_RATE: f64 = 0.05;

/// 卖家订单行 (派生形状)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerOrderRow {
    pub order_id: String,
    pub customer_id: String,
    pub order_date: DateTime<Utc>,
    pub status: OrderStatus,
    pub items: Vec<CartItem>,
    pub total_amount: i64,
}

impl From<Order> for SellerOrderRow {
    fn from(order: Order) -> Self {
        Self {
            order_id: order.id,
            customer_id: order.buyer_id,
            order_date: order.date,
            status: order.status,
            items: order.items,
            total_amount: order.total,
        }
    }
}

/// 营收汇总
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueSummary {
    pub gross_revenue: i64,
    pub platform_tax: i64,
    pub net_revenue: i64,
}

impl RevenueSummary {
    /// 对未取消订单的总额求和，扣除平台抽成
    pub fn over<'a>(orders: impl IntoIterator<Item = &'a Order>) -> Self {
        let gross_revenue: i64 = orders
            .into_iter()
            .filter(|o| o.status != OrderStatus::Cancelled)
            .map(|o| o.total)
            .sum();
        let platform_tax = (gross_revenue as f64 * PLATFORM_TAX_RATE).round() as i64;
        Self {
            gross_revenue,
            platform_tax,
            net_revenue: gross_revenue - platform_tax,
        }
    }
}

/// 卖家面板数据
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerDashboard {
    pub orders: Vec<SellerOrderRow>,
    pub revenue: RevenueSummary,
}

/// 卖家的订单行与营收汇总，最新订单排在最前
pub async fn seller_dashboard(
    adapter: &dyn PersistenceAdapter,
    seller_id: &str,
) -> StoreResult<SellerDashboard> {
    let mut orders = adapter.orders_by_seller(seller_id).await?;
    orders.sort_by(|a, b| b.date.cmp(&a.date));
    let revenue = RevenueSummary::over(&orders);
    Ok(SellerDashboard {
        orders: orders.into_iter().map(SellerOrderRow::from).collect(),
        revenue,
    })
}
