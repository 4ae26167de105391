//! 订单服务
//!
//! 结账流水线与订单状态机的唯一入口。服务持有持久化适配器和同步总线，
//! 由应用状态在启动时构造并显式传递，不依赖任何模块级全局。
//!
//! # 结账流水线
//!
//! 1. 买家校验 (卖家账号不能下单) 与地址校验
//! 2. 空购物车在支付前拒绝
//! 3. 模拟支付网关的最小延迟
//! 4. 拆单，逐个创建子订单 (id 碰撞换新 id 重试)
//! 5. 地址快照写回买家档案并清空购物车
//! 6. 广播 `REFRESH_ORDERS`
//!
//! 子订单创建互相独立：部分失败不回滚已创建的兄弟订单，失败以 `warn`
//! 记录并体现在结账结果里。

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use validator::Validate;

use shared::error::{StoreError, StoreResult};
use shared::message::SyncTopic;
use shared::models::{Address, Cart, Order, OrderStatus, PaymentMethod, Role, Transition};

use crate::db::PersistenceAdapter;
use crate::sync::SyncBus;

use super::splitter::{generate_order_id, split_cart};

/// id 碰撞时的最大创建尝试次数
const CREATE_ATTEMPT_LIMIT: u32 = 3;

/// 结账请求
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    pub buyer_id: String,
    pub cart: Cart,
    pub shipping_address: Address,
    pub payment_method: PaymentMethod,
}

/// 结账结果
///
/// `failed_sellers` 非空表示部分结账：这些卖家的子订单没有创建成功，
/// 已创建的兄弟订单保持不变。
#[derive(Debug, Clone)]
pub struct CheckoutOutcome {
    pub orders: Vec<Order>,
    pub failed_sellers: Vec<String>,
}

/// 订单服务
#[derive(Clone)]
pub struct OrderService {
    adapter: Arc<dyn PersistenceAdapter>,
    bus: SyncBus,
    /// 模拟支付网关的最小结账延迟
    checkout_min_latency: Duration,
}

impl OrderService {
    pub fn new(
        adapter: Arc<dyn PersistenceAdapter>,
        bus: SyncBus,
        checkout_min_latency: Duration,
    ) -> Self {
        Self {
            adapter,
            bus,
            checkout_min_latency,
        }
    }

    /// 执行结账流水线
    ///
    /// 所有创建尝试结束后才写回档案、清空购物车并广播。全部子订单
    /// 都失败时整单失败，返回第一个错误。
    pub async fn place_order(&self, request: CheckoutRequest) -> StoreResult<CheckoutOutcome> {
        let user = self.adapter.get_user(&request.buyer_id).await?;
        if let Some(profile) = &user {
            if profile.role == Role::Seller {
                return Err(StoreError::invalid_state(
                    "seller accounts cannot place orders",
                ));
            }
        }
        request.shipping_address.validate()?;
        if request.cart.is_empty() {
            return Err(StoreError::invalid_state("cannot check out an empty cart"));
        }

        // 支付网关模拟：固定最小延迟
        if !self.checkout_min_latency.is_zero() {
            tokio::time::sleep(self.checkout_min_latency).await;
        }

        let placed_at = Utc::now();
        let sub_orders = split_cart(
            &request.cart,
            &request.buyer_id,
            &request.shipping_address,
            request.payment_method,
            placed_at,
        )?;

        let mut created = Vec::with_capacity(sub_orders.len());
        let mut failed_sellers = Vec::new();
        let mut first_error = None;
        for order in sub_orders {
            match self.create_with_retry(order).await {
                Ok(stored) => created.push(stored),
                Err((seller_id, err)) => {
                    tracing::warn!(
                        seller_id = %seller_id,
                        error = %err,
                        "sub-order creation failed, continuing checkout"
                    );
                    failed_sellers.push(seller_id);
                    first_error.get_or_insert(err);
                }
            }
        }

        if created.is_empty() {
            if let Some(err) = first_error {
                return Err(err);
            }
        }

        if let Some(mut profile) = user {
            profile.saved_address = Some(request.shipping_address.clone());
            profile.cart.clear();
            if let Err(err) = self.adapter.put_user(&profile).await {
                tracing::warn!(
                    uid = %profile.uid,
                    error = %err,
                    "failed to save address snapshot and clear cart"
                );
            } else {
                self.bus.broadcast(SyncTopic::RefreshUserData);
            }
        }

        self.bus.broadcast(SyncTopic::RefreshOrders);
        tracing::info!(
            buyer_id = %request.buyer_id,
            orders = created.len(),
            failures = failed_sellers.len(),
            "checkout complete"
        );
        Ok(CheckoutOutcome {
            orders: created,
            failed_sellers,
        })
    }

    /// 创建单个子订单，id 碰撞时换新 id 重试
    async fn create_with_retry(&self, mut order: Order) -> Result<Order, (String, StoreError)> {
        for attempt in 1..=CREATE_ATTEMPT_LIMIT {
            match self.adapter.create_order(&order).await {
                Ok(stored) => return Ok(stored),
                Err(StoreError::AlreadyExists(_)) if attempt < CREATE_ATTEMPT_LIMIT => {
                    tracing::debug!(order_id = %order.id, attempt, "order id collision, regenerating");
                    order.id = generate_order_id();
                }
                Err(err) => return Err((order.seller_id, err)),
            }
        }
        unreachable!("loop returns within CREATE_ATTEMPT_LIMIT iterations")
    }

    /// 推进订单状态 (卖家/管理端)
    ///
    /// 相同或倒退的目标状态是 no-op，返回未变的订单；终态之后的任何
    /// 请求是 `InvalidState`。
    pub async fn set_status(&self, order_id: &str, status: OrderStatus) -> StoreResult<Order> {
        let order = self
            .adapter
            .get_order(order_id)
            .await?
            .ok_or_else(|| StoreError::not_found(format!("order {order_id}")))?;

        match order.status.validate_transition(status)? {
            Transition::Noop => Ok(order),
            Transition::Apply => {
                let updated = self.adapter.update_order_status(order_id, status).await?;
                self.bus.broadcast(SyncTopic::RefreshOrders);
                tracing::info!(order_id = %order_id, from = %order.status, to = %status, "order status updated");
                Ok(updated)
            }
        }
    }

    /// 买家取消订单
    ///
    /// 只能取消自己的订单，且订单尚未出库 (`Processing` 或 `Shipped`)。
    pub async fn cancel_order(&self, order_id: &str, buyer_id: &str) -> StoreResult<Order> {
        let order = self
            .adapter
            .get_order(order_id)
            .await?
            .ok_or_else(|| StoreError::not_found(format!("order {order_id}")))?;
        // 归属校验不泄露他人订单的存在
        if order.buyer_id != buyer_id {
            return Err(StoreError::not_found(format!("order {order_id}")));
        }
        if !order.status.buyer_can_cancel() {
            return Err(StoreError::invalid_state(format!(
                "order is {}, cancellation window has closed",
                order.status
            )));
        }

        let cancelled = self
            .adapter
            .update_order_status(order_id, OrderStatus::Cancelled)
            .await?;
        self.bus.broadcast(SyncTopic::RefreshOrders);
        self.bus.broadcast(SyncTopic::RefreshUserData);
        tracing::info!(order_id = %order_id, buyer_id = %buyer_id, "order cancelled by buyer");
        Ok(cancelled)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::db::LocalStore;
    use shared::models::{Category, Product, UserProfile};

    fn product(id: &str, seller: Option<&str>, price: i64) -> Product {
        Product {
            id: id.into(),
            name: format!("Product {id}"),
            category: Category::Electronics,
            price,
            description: String::new(),
            images: vec![],
            sizes: None,
            colors: None,
            availability: true,
            seller_id: seller.map(Into::into),
            return_policy: None,
            return_period: None,
            cod_available: None,
        }
    }

    fn address() -> Address {
        Address {
            first_name: "Asha".into(),
            last_name: "Rao".into(),
            street: "1 Marine Drive".into(),
            city: "Mumbai".into(),
            state: "MH".into(),
            zip_code: "400001".into(),
            phone: "9999999999".into(),
        }
    }

    fn buyer_profile(uid: &str) -> UserProfile {
        let mut cart = Cart::new();
        cart.add(product("stale", None, 10), 1, None, None);
        UserProfile {
            uid: uid.into(),
            name: "Asha Rao".into(),
            email: "asha@example.com".into(),
            role: Role::Buyer,
            saved_address: None,
            cart,
        }
    }

    fn service() -> (OrderService, Arc<dyn PersistenceAdapter>, SyncBus) {
        let adapter: Arc<dyn PersistenceAdapter> = Arc::new(LocalStore::open_in_memory().unwrap());
        let bus = SyncBus::new();
        let service = OrderService::new(adapter.clone(), bus.clone(), Duration::ZERO);
        (service, adapter, bus)
    }

    fn two_seller_cart() -> Cart {
        let mut cart = Cart::new();
        cart.add(product("p1", Some("seller-a"), 1000), 2, None, None);
        cart.add(product("p2", Some("seller-b"), 500), 1, None, None);
        cart
    }

    #[tokio::test]
    async fn checkout_persists_one_order_per_seller() {
        let (service, adapter, _bus) = service();
        adapter.put_user(&buyer_profile("buyer-1")).await.unwrap();

        let outcome = service
            .place_order(CheckoutRequest {
                buyer_id: "buyer-1".into(),
                cart: two_seller_cart(),
                shipping_address: address(),
                payment_method: PaymentMethod::Upi,
            })
            .await
            .unwrap();

        assert_eq!(outcome.orders.len(), 2);
        assert!(outcome.failed_sellers.is_empty());
        assert_eq!(adapter.orders_by_buyer("buyer-1").await.unwrap().len(), 2);
        assert_eq!(adapter.orders_by_seller("seller-a").await.unwrap()[0].total, 2000);
        assert_eq!(adapter.orders_by_seller("seller-b").await.unwrap()[0].total, 500);
    }

    #[tokio::test]
    async fn checkout_snapshots_address_and_clears_cart() {
        let (service, adapter, _bus) = service();
        adapter.put_user(&buyer_profile("buyer-1")).await.unwrap();

        service
            .place_order(CheckoutRequest {
                buyer_id: "buyer-1".into(),
                cart: two_seller_cart(),
                shipping_address: address(),
                payment_method: PaymentMethod::Card,
            })
            .await
            .unwrap();

        let profile = adapter.get_user("buyer-1").await.unwrap().unwrap();
        assert_eq!(profile.saved_address, Some(address()));
        assert!(profile.cart.is_empty());
    }

    #[tokio::test]
    async fn empty_cart_is_rejected_before_payment() {
        let (service, _adapter, _bus) = service();
        let err = service
            .place_order(CheckoutRequest {
                buyer_id: "buyer-1".into(),
                cart: Cart::new(),
                shipping_address: address(),
                payment_method: PaymentMethod::Upi,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidState(_)));
    }

    #[tokio::test]
    async fn invalid_address_is_rejected() {
        let (service, _adapter, _bus) = service();
        let mut bad_address = address();
        bad_address.city = String::new();

        let err = service
            .place_order(CheckoutRequest {
                buyer_id: "buyer-1".into(),
                cart: two_seller_cart(),
                shipping_address: bad_address,
                payment_method: PaymentMethod::Upi,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[tokio::test]
    async fn seller_accounts_cannot_check_out() {
        let (service, adapter, _bus) = service();
        let mut profile = buyer_profile("seller-1");
        profile.role = Role::Seller;
        adapter.put_user(&profile).await.unwrap();

        let err = service
            .place_order(CheckoutRequest {
                buyer_id: "seller-1".into(),
                cart: two_seller_cart(),
                shipping_address: address(),
                payment_method: PaymentMethod::Upi,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidState(_)));
    }

    #[tokio::test]
    async fn checkout_notifies_other_contexts() {
        // 另一个浏览上下文订阅总线，结账后收到令牌并重新查询看到新订单
        let (service, adapter, bus) = service();
        let mut rx = bus.subscribe();

        service
            .place_order(CheckoutRequest {
                buyer_id: "buyer-1".into(),
                cart: two_seller_cart(),
                shipping_address: address(),
                payment_method: PaymentMethod::Upi,
            })
            .await
            .unwrap();

        assert_eq!(rx.recv().await.unwrap(), SyncTopic::RefreshOrders);
        assert_eq!(adapter.all_orders().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn noop_transition_returns_order_unchanged() {
        let (service, adapter, bus) = service();
        let order = place_single(&service, &adapter).await;

        let before = bus.version(SyncTopic::RefreshOrders);
        let same = service
            .set_status(&order.id, OrderStatus::Processing)
            .await
            .unwrap();
        assert_eq!(same.status, OrderStatus::Processing);
        // no-op 不广播
        assert_eq!(bus.version(SyncTopic::RefreshOrders), before);
    }

    #[tokio::test]
    async fn backwards_transition_is_a_noop() {
        let (service, adapter, _bus) = service();
        let order = place_single(&service, &adapter).await;

        service.set_status(&order.id, OrderStatus::Shipped).await.unwrap();
        let same = service
            .set_status(&order.id, OrderStatus::Processing)
            .await
            .unwrap();
        assert_eq!(same.status, OrderStatus::Shipped);
    }

    #[tokio::test]
    async fn delivered_orders_accept_no_transitions() {
        let (service, adapter, _bus) = service();
        let order = place_single(&service, &adapter).await;

        service.set_status(&order.id, OrderStatus::Delivered).await.unwrap();
        let err = service
            .set_status(&order.id, OrderStatus::Shipped)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidState(_)));
    }

    #[tokio::test]
    async fn unknown_order_status_update_is_not_found() {
        let (service, _adapter, _bus) = service();
        let err = service
            .set_status("AXO-000000", OrderStatus::Shipped)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn buyer_can_cancel_until_out_for_delivery() {
        let (service, adapter, bus) = service();
        let order = place_single(&service, &adapter).await;
        let mut rx = bus.subscribe();

        let cancelled = service.cancel_order(&order.id, "buyer-1").await.unwrap();
        assert_eq!(cancelled.status, OrderStatus::Cancelled);

        // 取消通知订单和用户数据两个主题
        assert_eq!(rx.recv().await.unwrap(), SyncTopic::RefreshOrders);
        assert_eq!(rx.recv().await.unwrap(), SyncTopic::RefreshUserData);
    }

    #[tokio::test]
    async fn cancellation_window_closes_at_out_for_delivery() {
        let (service, adapter, _bus) = service();
        let order = place_single(&service, &adapter).await;
        service
            .set_status(&order.id, OrderStatus::OutForDelivery)
            .await
            .unwrap();

        let err = service.cancel_order(&order.id, "buyer-1").await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidState(_)));
    }

    #[tokio::test]
    async fn buyers_cannot_cancel_someone_elses_order() {
        let (service, adapter, _bus) = service();
        let order = place_single(&service, &adapter).await;

        let err = service.cancel_order(&order.id, "buyer-2").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn sibling_orders_progress_independently() {
        let (service, adapter, _bus) = service();
        let outcome = service
            .place_order(CheckoutRequest {
                buyer_id: "buyer-1".into(),
                cart: two_seller_cart(),
                shipping_address: address(),
                payment_method: PaymentMethod::Upi,
            })
            .await
            .unwrap();

        let [first, second] = &outcome.orders[..] else {
            panic!("expected two sub-orders");
        };
        service.set_status(&first.id, OrderStatus::Shipped).await.unwrap();

        let untouched = adapter.get_order(&second.id).await.unwrap().unwrap();
        assert_eq!(untouched.status, OrderStatus::Processing);
    }

    /// 在真实存储外包一层故障注入：前 N 次建单报键冲突，
    /// 指定卖家的建单报后端不可达，其余操作全部透传。
    struct FaultyStore {
        inner: LocalStore,
        colliding_creates: AtomicU32,
        blocked_seller: Option<String>,
    }

    impl FaultyStore {
        fn new(colliding_creates: u32, blocked_seller: Option<&str>) -> Self {
            Self {
                inner: LocalStore::open_in_memory().unwrap(),
                colliding_creates: AtomicU32::new(colliding_creates),
                blocked_seller: blocked_seller.map(Into::into),
            }
        }
    }

    #[async_trait]
    impl PersistenceAdapter for FaultyStore {
        async fn create_order(&self, order: &Order) -> StoreResult<Order> {
            let collide = self
                .colliding_creates
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok();
            if collide {
                return Err(StoreError::already_exists(format!("order {}", order.id)));
            }
            if self.blocked_seller.as_deref() == Some(order.seller_id.as_str()) {
                return Err(StoreError::unreachable("connection refused"));
            }
            self.inner.create_order(order).await
        }

        async fn get_order(&self, order_id: &str) -> StoreResult<Option<Order>> {
            self.inner.get_order(order_id).await
        }

        async fn orders_by_buyer(&self, buyer_id: &str) -> StoreResult<Vec<Order>> {
            self.inner.orders_by_buyer(buyer_id).await
        }

        async fn orders_by_seller(&self, seller_id: &str) -> StoreResult<Vec<Order>> {
            self.inner.orders_by_seller(seller_id).await
        }

        async fn all_orders(&self) -> StoreResult<Vec<Order>> {
            self.inner.all_orders().await
        }

        async fn update_order_status(
            &self,
            order_id: &str,
            status: OrderStatus,
        ) -> StoreResult<Order> {
            self.inner.update_order_status(order_id, status).await
        }

        async fn get_user(&self, uid: &str) -> StoreResult<Option<UserProfile>> {
            self.inner.get_user(uid).await
        }

        async fn put_user(&self, user: &UserProfile) -> StoreResult<()> {
            self.inner.put_user(user).await
        }

        async fn list_products(&self) -> StoreResult<Vec<Product>> {
            self.inner.list_products().await
        }

        async fn get_product(&self, product_id: &str) -> StoreResult<Option<Product>> {
            self.inner.get_product(product_id).await
        }

        async fn upsert_product(&self, product: &Product) -> StoreResult<()> {
            self.inner.upsert_product(product).await
        }
    }

    fn faulty_service(store: FaultyStore) -> (OrderService, Arc<dyn PersistenceAdapter>) {
        let adapter: Arc<dyn PersistenceAdapter> = Arc::new(store);
        let service = OrderService::new(adapter.clone(), SyncBus::new(), Duration::ZERO);
        (service, adapter)
    }

    #[tokio::test]
    async fn checkout_retries_collided_ids_with_fresh_ones() {
        // 前两次建单撞键，第三次换上新 id 成功
        let (service, adapter) = faulty_service(FaultyStore::new(2, None));

        let mut cart = Cart::new();
        cart.add(product("p1", Some("seller-a"), 1000), 1, None, None);
        let outcome = service
            .place_order(CheckoutRequest {
                buyer_id: "buyer-1".into(),
                cart,
                shipping_address: address(),
                payment_method: PaymentMethod::Upi,
            })
            .await
            .unwrap();

        assert_eq!(outcome.orders.len(), 1);
        assert!(outcome.failed_sellers.is_empty());
        assert_eq!(adapter.all_orders().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn checkout_gives_up_after_exhausting_id_attempts() {
        let (service, adapter) = faulty_service(FaultyStore::new(3, None));

        let mut cart = Cart::new();
        cart.add(product("p1", Some("seller-a"), 1000), 1, None, None);
        let err = service
            .place_order(CheckoutRequest {
                buyer_id: "buyer-1".into(),
                cart,
                shipping_address: address(),
                payment_method: PaymentMethod::Upi,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::AlreadyExists(_)));
        assert!(adapter.all_orders().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn partial_checkout_keeps_created_siblings() {
        // seller-b 的建单失败，seller-a 的子订单仍然落库
        let (service, adapter) = faulty_service(FaultyStore::new(0, Some("seller-b")));

        let outcome = service
            .place_order(CheckoutRequest {
                buyer_id: "buyer-1".into(),
                cart: two_seller_cart(),
                shipping_address: address(),
                payment_method: PaymentMethod::Upi,
            })
            .await
            .unwrap();

        assert_eq!(outcome.orders.len(), 1);
        assert_eq!(outcome.orders[0].seller_id, "seller-a");
        assert_eq!(outcome.failed_sellers, vec!["seller-b".to_string()]);

        let persisted = adapter.all_orders().await.unwrap();
        assert_eq!(persisted.len(), 1);
        assert_eq!(persisted[0].seller_id, "seller-a");
    }

    async fn place_single(
        service: &OrderService,
        _adapter: &Arc<dyn PersistenceAdapter>,
    ) -> Order {
        let mut cart = Cart::new();
        cart.add(product("p1", Some("seller-a"), 1000), 1, None, None);
        let outcome = service
            .place_order(CheckoutRequest {
                buyer_id: "buyer-1".into(),
                cart,
                shipping_address: address(),
                payment_method: PaymentMethod::Upi,
            })
            .await
            .unwrap();
        outcome.orders.into_iter().next().unwrap()
    }
}
