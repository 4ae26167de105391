//! 买家订单历史

use shared::error::StoreResult;
use shared::models::Order;

use crate::db::PersistenceAdapter;

/// 买家自己的全部订单，最新的排在最前
pub async fn order_history(
    adapter: &dyn PersistenceAdapter,
    buyer_id: &str,
) -> StoreResult<Vec<Order>> {
    let mut orders = adapter.orders_by_buyer(buyer_id).await?;
    orders.sort_by(|a, b| b.date.cmp(&a.date));
    Ok(orders)
}
