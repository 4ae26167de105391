//! 持久化适配器
//!
//! 文档存储 (SurrealDB) 与本地 KV 存储 (redb) 之上的统一接口。上层调用者
//! 永远不知道哪个后端在工作；两个实现对每个操作满足相同的前后置条件，
//! 由共享契约测试套件保证 (见 `contract` 模块)。
//!
//! 后端在启动时根据配置选定一次 ([`crate::core::BackendKind`])，
//! 不按调用重新判断。

pub mod document;
pub mod fallback;
pub mod local;
pub mod sanitize;

#[cfg(test)]
pub(crate) mod contract;

pub use document::DocumentStore;
pub use fallback::FallbackAdapter;
pub use local::LocalStore;

use async_trait::async_trait;
use shared::error::StoreResult;
use shared::models::{Order, OrderStatus, Product, UserProfile};

/// 统一持久化契约
///
/// # 操作语义
///
/// - `create_order`: 存在同 id 订单时返回 `AlreadyExists`；成功时返回
///   已存储的订单 (`updated_at` 由后端赋值)。
/// - `update_order_status`: 未知 id 返回 `NotFound`；否则无条件写入新状态
///   并刷新 `updated_at`。状态机校验是订单服务的职责，不在适配器层。
/// - 查询操作返回快照；不保证排序 (排序属于读模型投影)。
#[async_trait]
pub trait PersistenceAdapter: Send + Sync {
    // ========== Orders ==========

    async fn create_order(&self, order: &Order) -> StoreResult<Order>;

    async fn get_order(&self, order_id: &str) -> StoreResult<Option<Order>>;

    async fn orders_by_buyer(&self, buyer_id: &str) -> StoreResult<Vec<Order>>;

    async fn orders_by_seller(&self, seller_id: &str) -> StoreResult<Vec<Order>>;

    /// 全平台订单 (管理端)
    async fn all_orders(&self) -> StoreResult<Vec<Order>>;

    async fn update_order_status(&self, order_id: &str, status: OrderStatus)
    -> StoreResult<Order>;

    // ========== Users ==========

    async fn get_user(&self, uid: &str) -> StoreResult<Option<UserProfile>>;

    async fn put_user(&self, user: &UserProfile) -> StoreResult<()>;

    // ========== Products ==========

    async fn list_products(&self) -> StoreResult<Vec<Product>>;

    async fn get_product(&self, product_id: &str) -> StoreResult<Option<Product>>;

    async fn upsert_product(&self, product: &Product) -> StoreResult<()>;
}
