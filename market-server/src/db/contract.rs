//! 双后端共享契约测试
//!
//! 同一套断言分别跑在文档存储和本地存储上：两个后端对每个操作必须满足
//! 相同的前后置条件，调用者才可以对后端无感。

use chrono::{Duration, Utc};

use shared::error::StoreError;
use shared::models::{
    Address, Cart, CartItem, Category, Order, OrderStatus, PaymentMethod, Product, Role,
    UserProfile,
};

use super::{DocumentStore, LocalStore, PersistenceAdapter};

pub(crate) fn sample_address() -> Address {
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

pub(crate) fn sample_product(id: &str, seller_id: Option<&str>, price: i64) -> Product {
    Product {
        id: id.into(),
        name: format!("Product {id}"),
        category: Category::Accessories,
        price,
        description: "A fine item".into(),
        images: vec![format!("https://img.example/{id}.jpg")],
        sizes: None,
        colors: None,
        availability: true,
        seller_id: seller_id.map(Into::into),
        return_policy: None,
        return_period: None,
        cod_available: None,
    }
}

pub(crate) fn sample_user(uid: &str) -> UserProfile {
    UserProfile {
        uid: uid.into(),
        name: "Asha Rao".into(),
        email: "asha@example.com".into(),
        role: Role::Buyer,
        saved_address: None,
        cart: Cart::new(),
    }
}

pub(crate) fn sample_order(id: &str, buyer_id: &str, seller_id: &str) -> Order {
    let now = Utc::now();
    let items = vec![CartItem {
        product: sample_product("p1", Some(seller_id), 1000),
        quantity: 2,
        selected_size: Some("M".into()),
        selected_color: None,
    }];
    let total = items.iter().map(CartItem::line_total).sum();
    Order {
        id: id.into(),
        buyer_id: buyer_id.into(),
        seller_id: seller_id.into(),
        date: now,
        items,
        total,
        status: OrderStatus::Processing,
        shipping_address: sample_address(),
        payment_method: PaymentMethod::Upi,
        estimated_delivery: now + Duration::days(5),
        updated_at: None,
    }
}

/// 除 `updated_at` (服务端赋值) 外所有字段一致
fn assert_same_order(stored: &Order, expected: &Order) {
    assert_eq!(stored.id, expected.id);
    assert_eq!(stored.buyer_id, expected.buyer_id);
    assert_eq!(stored.seller_id, expected.seller_id);
    assert_eq!(stored.date, expected.date);
    assert_eq!(stored.items, expected.items);
    assert_eq!(stored.total, expected.total);
    assert_eq!(stored.status, expected.status);
    assert_eq!(stored.shipping_address, expected.shipping_address);
    assert_eq!(stored.payment_method, expected.payment_method);
    assert_eq!(stored.estimated_delivery, expected.estimated_delivery);
    assert!(stored.updated_at.is_some());
}

async fn run_contract_suite(adapter: &dyn PersistenceAdapter) {
    // ===== create + round trip =====
    let order = sample_order("AXO-100001", "buyer-1", "seller-a");
    let stored = adapter.create_order(&order).await.unwrap();
    assert_same_order(&stored, &order);

    let by_buyer = adapter.orders_by_buyer("buyer-1").await.unwrap();
    assert_eq!(by_buyer.len(), 1);
    assert_same_order(&by_buyer[0], &order);

    let by_seller = adapter.orders_by_seller("seller-a").await.unwrap();
    assert_eq!(by_seller.len(), 1);

    assert!(adapter.orders_by_buyer("buyer-unknown").await.unwrap().is_empty());
    assert!(adapter.orders_by_seller("seller-unknown").await.unwrap().is_empty());

    let fetched = adapter.get_order("AXO-100001").await.unwrap();
    assert!(fetched.is_some());
    assert!(adapter.get_order("AXO-999999").await.unwrap().is_none());

    // ===== duplicate create is rejected =====
    let err = adapter.create_order(&order).await.unwrap_err();
    assert!(matches!(err, StoreError::AlreadyExists(_)), "got {err:?}");

    // ===== independent sibling orders =====
    let sibling = sample_order("AXO-100002", "buyer-1", "seller-b");
    adapter.create_order(&sibling).await.unwrap();
    assert_eq!(adapter.all_orders().await.unwrap().len(), 2);

    // ===== status update persists and stamps updated_at =====
    let updated = adapter
        .update_order_status("AXO-100001", OrderStatus::Shipped)
        .await
        .unwrap();
    assert_eq!(updated.status, OrderStatus::Shipped);
    let refetched = adapter.get_order("AXO-100001").await.unwrap().unwrap();
    assert_eq!(refetched.status, OrderStatus::Shipped);

    // updating one order never touches its sibling
    let sibling_after = adapter.get_order("AXO-100002").await.unwrap().unwrap();
    assert_eq!(sibling_after.status, OrderStatus::Processing);

    let err = adapter
        .update_order_status("AXO-999999", OrderStatus::Shipped)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)), "got {err:?}");

    // ===== user profiles =====
    assert!(adapter.get_user("buyer-1").await.unwrap().is_none());
    let mut user = sample_user("buyer-1");
    adapter.put_user(&user).await.unwrap();
    let fetched = adapter.get_user("buyer-1").await.unwrap().unwrap();
    assert_eq!(fetched, user);

    // overwrite with a saved address
    user.saved_address = Some(sample_address());
    adapter.put_user(&user).await.unwrap();
    let fetched = adapter.get_user("buyer-1").await.unwrap().unwrap();
    assert_eq!(fetched.saved_address, Some(sample_address()));

    // ===== products =====
    let product = sample_product("p-contract", Some("seller-a"), 750);
    adapter.upsert_product(&product).await.unwrap();
    let listed = adapter.list_products().await.unwrap();
    assert!(listed.iter().any(|p| p.id == "p-contract"));
    let fetched = adapter.get_product("p-contract").await.unwrap().unwrap();
    assert_eq!(fetched, product);

    // upsert overwrites in place
    let mut cheaper = product.clone();
    cheaper.price = 500;
    adapter.upsert_product(&cheaper).await.unwrap();
    let fetched = adapter.get_product("p-contract").await.unwrap().unwrap();
    assert_eq!(fetched.price, 500);
    assert!(adapter.get_product("p-missing").await.unwrap().is_none());
}

#[tokio::test]
async fn document_store_honors_contract() {
    let store = DocumentStore::open_in_memory().await.unwrap();
    run_contract_suite(&store).await;
}

#[tokio::test]
async fn local_store_honors_contract() {
    let store = LocalStore::open_in_memory().unwrap();
    run_contract_suite(&store).await;
}

#[tokio::test]
async fn local_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("market.redb");

    {
        let store = LocalStore::open(&path).unwrap();
        let order = sample_order("AXO-700001", "buyer-9", "seller-z");
        store.create_order(&order).await.unwrap();
    }

    let reopened = LocalStore::open(&path).unwrap();
    let orders = reopened.all_orders().await.unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].id, "AXO-700001");
}
