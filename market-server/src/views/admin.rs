//! 管理端全平台账本
//!
//! 订单只有一份规范存储，管理视图就是账本的直接透视。按 id 去重
//! 仅作为防御保留，正常情况下不会命中。

use std::collections::HashSet;

use shared::error::StoreResult;
use shared::models::Order;

use crate::db::PersistenceAdapter;

/// 全平台订单，按 id 去重，最新的排在最前
pub async fn global_ledger(adapter: &dyn PersistenceAdapter) -> StoreResult<Vec<Order>> {
    let mut orders = adapter.all_orders().await?;
    let mut seen = HashSet::new();
    orders.retain(|o| seen.insert(o.id.clone()));
    orders.sort_by(|a, b| b.date.cmp(&a.date));
    Ok(orders)
}
