//! 购物车拆单
//!
//! 结账时把一个购物车按卖家拆成若干子订单。纯函数，不触碰持久化，
//! 不发送通知；副作用全部属于订单服务。

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use shared::error::{StoreError, StoreResult};
use shared::models::{Address, Cart, CartItem, Order, OrderStatus, PaymentMethod};

/// 预计送达窗口 (天)
const DELIVERY_WINDOW_DAYS: i64 = 5;

/// 生成订单 id: `AXO-` + 6 位随机数字
///
/// 不做全局去重；碰撞由存储层的 `AlreadyExists` 兜底，
/// 调用方换一个 id 重试。
pub fn generate_order_id() -> String {
    let digits: u32 = rand::thread_rng().gen_range(100_000..1_000_000);
    format!("AXO-{digits}")
}

/// 按卖家拆分购物车
///
/// 每个出现过的卖家产生一个子订单，顺序与卖家在购物车里首次出现的顺序
/// 一致。没有卖家的商品归平台卖家。所有子订单共享同一地址快照、
/// 支付方式和下单时间；各自的 `total` 只累计自己的条目。
///
/// 空购物车返回 `InvalidState`，不产生任何订单。
pub fn split_cart(
    cart: &Cart,
    buyer_id: &str,
    shipping_address: &Address,
    payment_method: PaymentMethod,
    placed_at: DateTime<Utc>,
) -> StoreResult<Vec<Order>> {
    if cart.is_empty() {
        return Err(StoreError::invalid_state("cannot check out an empty cart"));
    }

    // 保持首见顺序，卖家数量很小，线性查找即可
    let mut groups: Vec<(String, Vec<CartItem>)> = Vec::new();
    for item in cart.items() {
        let seller = item.seller();
        match groups.iter_mut().find(|(s, _)| s == seller) {
            Some((_, items)) => items.push(item.clone()),
            None => groups.push((seller.to_string(), vec![item.clone()])),
        }
    }

    let estimated_delivery = placed_at + Duration::days(DELIVERY_WINDOW_DAYS);
    let orders = groups
        .into_iter()
        .map(|(seller_id, items)| {
            let total = items.iter().map(CartItem::line_total).sum();
            Order {
                id: generate_order_id(),
                buyer_id: buyer_id.to_string(),
                seller_id,
                date: placed_at,
                items,
                total,
                status: OrderStatus::Processing,
                shipping_address: shipping_address.clone(),
                payment_method,
                estimated_delivery,
                updated_at: None,
            }
        })
        .collect();
    Ok(orders)
}
