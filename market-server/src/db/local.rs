//! redb 本地存储后端 ("simulation mode")
//!
//! # 表结构
//!
//! | Key | Value | 说明 |
//! |-----|-------|------|
//! | `orders` | JSON `Vec<Order>` | 订单账本，整体读写 |
//! | `users` | JSON `Vec<UserProfile>` | 用户档案 |
//! | `products` | JSON `Vec<Product>` | 商品目录 |
//!
//! 每个集合序列化为单个键下的 JSON 列表，每次变更整体重写。这和文档存储
//! 的逐记录模型在调用者看来行为一致 (共享契约测试保证)。
//!
//! # Durability
//!
//! redb 默认 `Durability::Immediate`：commit 返回即落盘，写时复制加原子
//! 指针交换，断电后文件仍处于一致状态。

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use serde::Serialize;
use serde::de::DeserializeOwned;

use shared::error::{StoreError, StoreResult};
use shared::models::{Order, OrderStatus, Product, UserProfile};

use super::PersistenceAdapter;

/// 所有集合共用一张表: key = 集合名, value = JSON 序列化的列表
const COLLECTIONS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("collections");

const ORDERS_KEY: &str = "orders";
const USERS_KEY: &str = "users";
const PRODUCTS_KEY: &str = "products";

fn storage_err(err: impl std::fmt::Display) -> StoreError {
    StoreError::internal(format!("local store: {err}"))
}

/// 本地存储服务 — 持有 redb 数据库
#[derive(Clone)]
pub struct LocalStore {
    db: Arc<Database>,
}

impl LocalStore {
    /// 打开或创建指定路径的数据库
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let db = Database::create(path).map_err(storage_err)?;
        Self::init(db)
    }

    /// 打开内存数据库 (测试用)
    pub fn open_in_memory() -> StoreResult<Self> {
        let db = Database::builder()
            .create_with_backend(redb::backends::InMemoryBackend::new())
            .map_err(storage_err)?;
        Self::init(db)
    }

    fn init(db: Database) -> StoreResult<Self> {
        // 建表，保证首次读不会因表不存在而失败
        let write_txn = db.begin_write().map_err(storage_err)?;
        {
            let _ = write_txn
                .open_table(COLLECTIONS_TABLE)
                .map_err(storage_err)?;
        }
        write_txn.commit().map_err(storage_err)?;
        Ok(Self { db: Arc::new(db) })
    }

    /// 整体读出一个集合；键不存在视为空集合
    fn read_collection<T: DeserializeOwned>(&self, key: &str) -> StoreResult<Vec<T>> {
        let read_txn = self.db.begin_read().map_err(storage_err)?;
        let table = read_txn.open_table(COLLECTIONS_TABLE).map_err(storage_err)?;
        match table.get(key).map_err(storage_err)? {
            Some(bytes) => Ok(serde_json::from_slice(bytes.value())?),
            None => Ok(Vec::new()),
        }
    }

    /// 整体重写一个集合
    fn write_collection<T: Serialize>(&self, key: &str, items: &[T]) -> StoreResult<()> {
        let bytes = serde_json::to_vec(items)?;
        let write_txn = self.db.begin_write().map_err(storage_err)?;
        {
            let mut table = write_txn
                .open_table(COLLECTIONS_TABLE)
                .map_err(storage_err)?;
            table.insert(key, bytes.as_slice()).map_err(storage_err)?;
        }
        write_txn.commit().map_err(storage_err)?;
        Ok(())
    }

    /// 按 id 合并订单到本地账本 (降级缓存刷新用)
    pub(crate) fn merge_orders(&self, orders: &[Order]) -> StoreResult<()> {
        let mut stored: Vec<Order> = self.read_collection(ORDERS_KEY)?;
        for order in orders {
            match stored.iter_mut().find(|o| o.id == order.id) {
                Some(existing) => *existing = order.clone(),
                None => stored.push(order.clone()),
            }
        }
        self.write_collection(ORDERS_KEY, &stored)
    }

    /// 整体替换订单账本 (降级缓存刷新用)
    pub(crate) fn replace_orders(&self, orders: &[Order]) -> StoreResult<()> {
        self.write_collection(ORDERS_KEY, orders)
    }
}

#[async_trait]
impl PersistenceAdapter for LocalStore {
    async fn create_order(&self, order: &Order) -> StoreResult<Order> {
        let mut orders: Vec<Order> = self.read_collection(ORDERS_KEY)?;
        if orders.iter().any(|o| o.id == order.id) {
            return Err(StoreError::already_exists(format!("order {}", order.id)));
        }
        let mut stored = order.clone();
        stored.updated_at = Some(Utc::now());
        orders.push(stored.clone());
        self.write_collection(ORDERS_KEY, &orders)?;
        Ok(stored)
    }

    async fn get_order(&self, order_id: &str) -> StoreResult<Option<Order>> {
        let orders: Vec<Order> = self.read_collection(ORDERS_KEY)?;
        Ok(orders.into_iter().find(|o| o.id == order_id))
    }

    async fn orders_by_buyer(&self, buyer_id: &str) -> StoreResult<Vec<Order>> {
        let orders: Vec<Order> = self.read_collection(ORDERS_KEY)?;
        Ok(orders.into_iter().filter(|o| o.buyer_id == buyer_id).collect())
    }

    async fn orders_by_seller(&self, seller_id: &str) -> StoreResult<Vec<Order>> {
        let orders: Vec<Order> = self.read_collection(ORDERS_KEY)?;
        Ok(orders
            .into_iter()
            .filter(|o| o.seller_id == seller_id)
            .collect())
    }

    async fn all_orders(&self) -> StoreResult<Vec<Order>> {
        self.read_collection(ORDERS_KEY)
    }

    async fn update_order_status(
        &self,
        order_id: &str,
        status: OrderStatus,
    ) -> StoreResult<Order> {
        let mut orders: Vec<Order> = self.read_collection(ORDERS_KEY)?;
        let order = orders
            .iter_mut()
            .find(|o| o.id == order_id)
            .ok_or_else(|| StoreError::not_found(format!("order {order_id}")))?;
        order.status = status;
        order.updated_at = Some(Utc::now());
        let updated = order.clone();
        self.write_collection(ORDERS_KEY, &orders)?;
        Ok(updated)
    }

    async fn get_user(&self, uid: &str) -> StoreResult<Option<UserProfile>> {
        let users: Vec<UserProfile> = self.read_collection(USERS_KEY)?;
        Ok(users.into_iter().find(|u| u.uid == uid))
    }

    async fn put_user(&self, user: &UserProfile) -> StoreResult<()> {
        let mut users: Vec<UserProfile> = self.read_collection(USERS_KEY)?;
        match users.iter_mut().find(|u| u.uid == user.uid) {
            Some(existing) => *existing = user.clone(),
            None => users.push(user.clone()),
        }
        self.write_collection(USERS_KEY, &users)
    }

    async fn list_products(&self) -> StoreResult<Vec<Product>> {
        self.read_collection(PRODUCTS_KEY)
    }

    async fn get_product(&self, product_id: &str) -> StoreResult<Option<Product>> {
        let products: Vec<Product> = self.read_collection(PRODUCTS_KEY)?;
        Ok(products.into_iter().find(|p| p.id == product_id))
    }

    async fn upsert_product(&self, product: &Product) -> StoreResult<()> {
        let mut products: Vec<Product> = self.read_collection(PRODUCTS_KEY)?;
        match products.iter_mut().find(|p| p.id == product.id) {
            Some(existing) => *existing = product.clone(),
            None => products.push(product.clone()),
        }
        self.write_collection(PRODUCTS_KEY, &products)
    }
}
