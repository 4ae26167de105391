//! SurrealDB 文档存储后端
//!
//! 每个订单在 `order` 表中对应一条记录 (记录键 = 订单 id)，文档字段使用
//! snake_case。域 id 同时作为文档字段存储，查询时不经过 RecordId 反序列化。
//! 所有写入先经过 [`super::sanitize`] 清洗。

use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

use shared::error::{StoreError, StoreResult};
use shared::models::{
    Address, CartItem, Order, OrderStatus, PaymentMethod, Product, UserProfile,
};

use super::PersistenceAdapter;
use super::sanitize::to_sanitized_value;

const NAMESPACE: &str = "axora";
const DATABASE: &str = "market";

const ORDER_TABLE: &str = "order";
const USER_TABLE: &str = "user";
const PRODUCT_TABLE: &str = "product";

/// 文档存储错误统一映射为 BackendUnreachable
fn db_err(err: surrealdb::Error) -> StoreError {
    StoreError::unreachable(err.to_string())
}

/// 存储的订单文档 (记录键与 `order_id` 字段同值)
#[derive(Debug, Clone, Serialize, Deserialize)]
struct OrderDoc {
    order_id: String,
    buyer_id: String,
    seller_id: String,
    date: DateTime<Utc>,
    items: Vec<CartItem>,
    total: i64,
    status: OrderStatus,
    shipping_address: Address,
    payment_method: PaymentMethod,
    estimated_delivery: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OrderDoc {
    fn from_order(order: &Order, updated_at: DateTime<Utc>) -> Self {
        Self {
            order_id: order.id.clone(),
            buyer_id: order.buyer_id.clone(),
            seller_id: order.seller_id.clone(),
            date: order.date,
            items: order.items.clone(),
            total: order.total,
            status: order.status,
            shipping_address: order.shipping_address.clone(),
            payment_method: order.payment_method,
            estimated_delivery: order.estimated_delivery,
            updated_at,
        }
    }

    fn into_order(self) -> Order {
        Order {
            id: self.order_id,
            buyer_id: self.buyer_id,
            seller_id: self.seller_id,
            date: self.date,
            items: self.items,
            total: self.total,
            status: self.status,
            shipping_address: self.shipping_address,
            payment_method: self.payment_method,
            estimated_delivery: self.estimated_delivery,
            updated_at: Some(self.updated_at),
        }
    }
}

/// 存储的商品文档
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ProductDoc {
    product_id: String,
    name: String,
    category: shared::models::Category,
    price: i64,
    description: String,
    images: Vec<String>,
    #[serde(default)]
    sizes: Option<Vec<String>>,
    #[serde(default)]
    colors: Option<Vec<String>>,
    availability: bool,
    #[serde(default)]
    seller_id: Option<String>,
    #[serde(default)]
    return_policy: Option<shared::models::ReturnPolicy>,
    #[serde(default)]
    return_period: Option<u32>,
    #[serde(default)]
    cod_available: Option<bool>,
}

impl ProductDoc {
    fn from_product(product: &Product) -> Self {
        Self {
            product_id: product.id.clone(),
            name: product.name.clone(),
            category: product.category,
            price: product.price,
            description: product.description.clone(),
            images: product.images.clone(),
            sizes: product.sizes.clone(),
            colors: product.colors.clone(),
            availability: product.availability,
            seller_id: product.seller_id.clone(),
            return_policy: product.return_policy,
            return_period: product.return_period,
            cod_available: product.cod_available,
        }
    }

    fn into_product(self) -> Product {
        Product {
            id: self.product_id,
            name: self.name,
            category: self.category,
            price: self.price,
            description: self.description,
            images: self.images,
            sizes: self.sizes,
            colors: self.colors,
            availability: self.availability,
            seller_id: self.seller_id,
            return_policy: self.return_policy,
            return_period: self.return_period,
            cod_available: self.cod_available,
        }
    }
}

/// 状态更新补丁 (merge 写入)
#[derive(Debug, Serialize)]
struct StatusPatch {
    status: OrderStatus,
    updated_at: DateTime<Utc>,
}

/// 文档存储服务 — 持有嵌入式 SurrealDB 连接
#[derive(Clone)]
pub struct DocumentStore {
    db: Surreal<Db>,
}

impl DocumentStore {
    /// 打开或创建指定目录下的文档存储
    pub async fn open(dir: &Path) -> StoreResult<Self> {
        let endpoint = dir.join("documents").to_string_lossy().into_owned();
        let db = Surreal::new::<RocksDb>(endpoint).await.map_err(db_err)?;
        db.use_ns(NAMESPACE).use_db(DATABASE).await.map_err(db_err)?;
        tracing::info!("Document store ready at {}", dir.display());
        Ok(Self { db })
    }

    /// 打开内存文档存储 (测试用)
    pub async fn open_in_memory() -> StoreResult<Self> {
        let db = Surreal::new::<Mem>(()).await.map_err(db_err)?;
        db.use_ns(NAMESPACE).use_db(DATABASE).await.map_err(db_err)?;
        Ok(Self { db })
    }
}

#[async_trait]
impl PersistenceAdapter for DocumentStore {
    async fn create_order(&self, order: &Order) -> StoreResult<Order> {
        let doc = OrderDoc::from_order(order, Utc::now());
        let content = to_sanitized_value(&doc)?;
        // CREATE 拒绝已存在的记录键；该错误必须映射为 AlreadyExists，
        // 订单服务才会换一个 id 重试而不是当作后端不可达
        let created: Option<OrderDoc> = self
            .db
            .create((ORDER_TABLE, order.id.as_str()))
            .content(content)
            .await
            .map_err(|e| {
                if e.to_string().contains("already exists") {
                    StoreError::already_exists(format!("order {}", order.id))
                } else {
                    db_err(e)
                }
            })?;
        created
            .map(OrderDoc::into_order)
            .ok_or_else(|| StoreError::internal(format!("order {} not persisted", order.id)))
    }

    async fn get_order(&self, order_id: &str) -> StoreResult<Option<Order>> {
        let doc: Option<OrderDoc> = self
            .db
            .select((ORDER_TABLE, order_id))
            .await
            .map_err(db_err)?;
        Ok(doc.map(OrderDoc::into_order))
    }

    async fn orders_by_buyer(&self, buyer_id: &str) -> StoreResult<Vec<Order>> {
        let docs: Vec<OrderDoc> = self
            .db
            .query("SELECT * FROM type::table($table) WHERE buyer_id = $buyer")
            .bind(("table", ORDER_TABLE))
            .bind(("buyer", buyer_id.to_string()))
            .await
            .map_err(db_err)?
            .take(0)
            .map_err(db_err)?;
        Ok(docs.into_iter().map(OrderDoc::into_order).collect())
    }

    async fn orders_by_seller(&self, seller_id: &str) -> StoreResult<Vec<Order>> {
        let docs: Vec<OrderDoc> = self
            .db
            .query("SELECT * FROM type::table($table) WHERE seller_id = $seller")
            .bind(("table", ORDER_TABLE))
            .bind(("seller", seller_id.to_string()))
            .await
            .map_err(db_err)?
            .take(0)
            .map_err(db_err)?;
        Ok(docs.into_iter().map(OrderDoc::into_order).collect())
    }

    async fn all_orders(&self) -> StoreResult<Vec<Order>> {
        let docs: Vec<OrderDoc> = self
            .db
            .query("SELECT * FROM type::table($table)")
            .bind(("table", ORDER_TABLE))
            .await
            .map_err(db_err)?
            .take(0)
            .map_err(db_err)?;
        Ok(docs.into_iter().map(OrderDoc::into_order).collect())
    }

    async fn update_order_status(
        &self,
        order_id: &str,
        status: OrderStatus,
    ) -> StoreResult<Order> {
        let patch = StatusPatch {
            status,
            updated_at: Utc::now(),
        };
        let updated: Option<OrderDoc> = self
            .db
            .update((ORDER_TABLE, order_id))
            .merge(patch)
            .await
            .map_err(db_err)?;
        updated
            .map(OrderDoc::into_order)
            .ok_or_else(|| StoreError::not_found(format!("order {order_id}")))
    }

    async fn get_user(&self, uid: &str) -> StoreResult<Option<UserProfile>> {
        let user: Option<UserProfile> =
            self.db.select((USER_TABLE, uid)).await.map_err(db_err)?;
        Ok(user)
    }

    async fn put_user(&self, user: &UserProfile) -> StoreResult<()> {
        let content = to_sanitized_value(user)?;
        let _: Option<UserProfile> = self
            .db
            .upsert((USER_TABLE, user.uid.as_str()))
            .content(content)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn list_products(&self) -> StoreResult<Vec<Product>> {
        let docs: Vec<ProductDoc> = self
            .db
            .query("SELECT * FROM type::table($table)")
            .bind(("table", PRODUCT_TABLE))
            .await
            .map_err(db_err)?
            .take(0)
            .map_err(db_err)?;
        Ok(docs.into_iter().map(ProductDoc::into_product).collect())
    }

    async fn get_product(&self, product_id: &str) -> StoreResult<Option<Product>> {
        let doc: Option<ProductDoc> = self
            .db
            .select((PRODUCT_TABLE, product_id))
            .await
            .map_err(db_err)?;
        Ok(doc.map(ProductDoc::into_product))
    }

    async fn upsert_product(&self, product: &Product) -> StoreResult<()> {
        let doc = ProductDoc::from_product(product);
        let content = to_sanitized_value(&doc)?;
        let _: Option<ProductDoc> = self
            .db
            .upsert((PRODUCT_TABLE, product.id.as_str()))
            .content(content)
            .await
            .map_err(db_err)?;
        Ok(())
    }
}
