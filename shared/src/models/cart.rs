//! Cart Model
//!
//! The cart is transient: at checkout its items are copied (not moved) into
//! the resulting orders, then the cart is cleared.

use serde::{Deserialize, Serialize};

use super::product::Product;

/// A product snapshot plus purchase details
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    #[serde(flatten)]
    pub product: Product,
    /// Always >= 1
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_color: Option<String>,
}

impl CartItem {
    /// Price x quantity for this line
    pub fn line_total(&self) -> i64 {
        self.product.price * i64::from(self.quantity)
    }

    /// Effective seller id of the underlying product
    pub fn seller(&self) -> &str {
        self.product.seller()
    }
}

/// Ordered list of cart items, unique by (product id, selected size)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from raw items, merging duplicate (product, size) lines
    pub fn from_items(items: impl IntoIterator<Item = CartItem>) -> Self {
        let mut cart = Self::new();
        for item in items {
            cart.add(item.product, item.quantity, item.selected_size, item.selected_color);
        }
        cart
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Add a product to the cart
    ///
    /// An already-present (product, size) pair increments the existing
    /// quantity instead of duplicating the entry. Zero quantities are
    /// treated as 1.
    pub fn add(
        &mut self,
        product: Product,
        quantity: u32,
        selected_size: Option<String>,
        selected_color: Option<String>,
    ) {
        let quantity = quantity.max(1);
        if let Some(existing) = self
            .items
            .iter_mut()
            .find(|i| i.product.id == product.id && i.selected_size == selected_size)
        {
            existing.quantity += quantity;
            return;
        }
        self.items.push(CartItem {
            product,
            quantity,
            selected_size,
            selected_color,
        });
    }

    /// Remove a (product, size) line entirely
    pub fn remove(&mut self, product_id: &str, selected_size: Option<&str>) {
        self.items
            .retain(|i| !(i.product.id == product_id && i.selected_size.as_deref() == selected_size));
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of line totals across the whole cart
    pub fn subtotal(&self) -> i64 {
        self.items.iter().map(CartItem::line_total).sum()
    }
}
