//! 降级回退适配器
//!
//! 包装文档存储，以本地 redb 存储作为 last-known-good 缓存：
//!
//! - **读**：优先文档存储；`BackendUnreachable` 时记录告警并回退到缓存。
//!   成功的读顺带刷新缓存，保持缓存尽量新。
//! - **写**：只写文档存储；失败时记录告警后把错误向上传播 (不排队重试，
//!   已知的取舍)。成功的订单写入同步合并进缓存。
//!
//! 缓存永远不是事实来源 —— 它只在文档存储不可达时让读路径继续工作。

use std::sync::Arc;

use async_trait::async_trait;

use shared::error::{StoreError, StoreResult};
use shared::models::{Order, OrderStatus, Product, UserProfile};

use super::{LocalStore, PersistenceAdapter};

pub struct FallbackAdapter {
    remote: Arc<dyn PersistenceAdapter>,
    cache: LocalStore,
}

impl FallbackAdapter {
    pub fn new(remote: Arc<dyn PersistenceAdapter>, cache: LocalStore) -> Self {
        Self { remote, cache }
    }

    /// 缓存刷新失败只降级为告警，不影响主路径
    fn refresh_cache(&self, result: StoreResult<()>) {
        if let Err(e) = result {
            tracing::warn!(error = %e, "fallback cache refresh failed");
        }
    }
}

#[async_trait]
impl PersistenceAdapter for FallbackAdapter {
    async fn create_order(&self, order: &Order) -> StoreResult<Order> {
        match self.remote.create_order(order).await {
            Ok(stored) => {
                self.refresh_cache(self.cache.merge_orders(std::slice::from_ref(&stored)));
                Ok(stored)
            }
            Err(StoreError::BackendUnreachable(e)) => {
                tracing::warn!(
                    order_id = %order.id,
                    error = %e,
                    "document store unreachable, order write dropped"
                );
                Err(StoreError::BackendUnreachable(e))
            }
            Err(other) => Err(other),
        }
    }

    async fn get_order(&self, order_id: &str) -> StoreResult<Option<Order>> {
        match self.remote.get_order(order_id).await {
            Ok(Some(order)) => {
                self.refresh_cache(self.cache.merge_orders(std::slice::from_ref(&order)));
                Ok(Some(order))
            }
            Ok(None) => Ok(None),
            Err(StoreError::BackendUnreachable(e)) => {
                tracing::warn!(error = %e, "document store unreachable, serving cached order");
                self.cache.get_order(order_id).await
            }
            Err(other) => Err(other),
        }
    }

    async fn orders_by_buyer(&self, buyer_id: &str) -> StoreResult<Vec<Order>> {
        match self.remote.orders_by_buyer(buyer_id).await {
            Ok(orders) => {
                self.refresh_cache(self.cache.merge_orders(&orders));
                Ok(orders)
            }
            Err(StoreError::BackendUnreachable(e)) => {
                tracing::warn!(error = %e, "document store unreachable, serving cached buyer orders");
                self.cache.orders_by_buyer(buyer_id).await
            }
            Err(other) => Err(other),
        }
    }

    async fn orders_by_seller(&self, seller_id: &str) -> StoreResult<Vec<Order>> {
        match self.remote.orders_by_seller(seller_id).await {
            Ok(orders) => {
                self.refresh_cache(self.cache.merge_orders(&orders));
                Ok(orders)
            }
            Err(StoreError::BackendUnreachable(e)) => {
                tracing::warn!(error = %e, "document store unreachable, serving cached seller orders");
                self.cache.orders_by_seller(seller_id).await
            }
            Err(other) => Err(other),
        }
    }

    async fn all_orders(&self) -> StoreResult<Vec<Order>> {
        match self.remote.all_orders().await {
            Ok(orders) => {
                self.refresh_cache(self.cache.replace_orders(&orders));
                Ok(orders)
            }
            Err(StoreError::BackendUnreachable(e)) => {
                tracing::warn!(error = %e, "document store unreachable, serving cached ledger");
                self.cache.all_orders().await
            }
            Err(other) => Err(other),
        }
    }

    async fn update_order_status(
        &self,
        order_id: &str,
        status: OrderStatus,
    ) -> StoreResult<Order> {
        match self.remote.update_order_status(order_id, status).await {
            Ok(updated) => {
                self.refresh_cache(self.cache.merge_orders(std::slice::from_ref(&updated)));
                Ok(updated)
            }
            Err(StoreError::BackendUnreachable(e)) => {
                tracing::warn!(
                    order_id,
                    error = %e,
                    "document store unreachable, status update dropped"
                );
                Err(StoreError::BackendUnreachable(e))
            }
            Err(other) => Err(other),
        }
    }

    async fn get_user(&self, uid: &str) -> StoreResult<Option<UserProfile>> {
        match self.remote.get_user(uid).await {
            Ok(Some(user)) => {
                self.refresh_cache(self.cache.put_user(&user).await);
                Ok(Some(user))
            }
            Ok(None) => Ok(None),
            Err(StoreError::BackendUnreachable(e)) => {
                tracing::warn!(error = %e, "document store unreachable, serving cached user");
                self.cache.get_user(uid).await
            }
            Err(other) => Err(other),
        }
    }

    async fn put_user(&self, user: &UserProfile) -> StoreResult<()> {
        match self.remote.put_user(user).await {
            Ok(()) => {
                self.refresh_cache(self.cache.put_user(user).await);
                Ok(())
            }
            Err(StoreError::BackendUnreachable(e)) => {
                tracing::warn!(uid = %user.uid, error = %e, "document store unreachable, profile write dropped");
                Err(StoreError::BackendUnreachable(e))
            }
            Err(other) => Err(other),
        }
    }

    async fn list_products(&self) -> StoreResult<Vec<Product>> {
        match self.remote.list_products().await {
            Ok(products) => {
                for product in &products {
                    self.refresh_cache(self.cache.upsert_product(product).await);
                }
                Ok(products)
            }
            Err(StoreError::BackendUnreachable(e)) => {
                tracing::warn!(error = %e, "document store unreachable, serving cached catalog");
                self.cache.list_products().await
            }
            Err(other) => Err(other),
        }
    }

    async fn get_product(&self, product_id: &str) -> StoreResult<Option<Product>> {
        match self.remote.get_product(product_id).await {
            Ok(Some(product)) => {
                self.refresh_cache(self.cache.upsert_product(&product).await);
                Ok(Some(product))
            }
            Ok(None) => Ok(None),
            Err(StoreError::BackendUnreachable(e)) => {
                tracing::warn!(error = %e, "document store unreachable, serving cached product");
                self.cache.get_product(product_id).await
            }
            Err(other) => Err(other),
        }
    }

    async fn upsert_product(&self, product: &Product) -> StoreResult<()> {
        match self.remote.upsert_product(product).await {
            Ok(()) => {
                self.refresh_cache(self.cache.upsert_product(product).await);
                Ok(())
            }
            Err(StoreError::BackendUnreachable(e)) => {
                tracing::warn!(product_id = %product.id, error = %e, "document store unreachable, product write dropped");
                Err(StoreError::BackendUnreachable(e))
            }
            Err(other) => Err(other),
        }
    }
}
