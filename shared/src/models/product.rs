//! Product Model

use serde::{Deserialize, Serialize};

/// Seller identity assigned to catalog items that carry no explicit seller
pub const PLATFORM_SELLER_ID: &str = "system-seller";

/// Product category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Apparel,
    Accessories,
    Timepieces,
    Fragrance,
    Electronics,
    Home,
    Furniture,
    Footwear,
}

/// Return policy attached to a product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReturnPolicy {
    #[serde(rename = "No Returns")]
    NoReturns,
    #[serde(rename = "Returns Available")]
    ReturnsAvailable,
}

/// Product entity
///
/// Immutable once referenced by a placed order: orders embed a snapshot of
/// their items, so later edits or deletion never alter historical orders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub category: Category,
    /// Price in whole currency units
    pub price: i64,
    pub description: String,
    /// Ordered list of image URIs
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sizes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<String>>,
    pub availability: bool,
    /// Owning seller; absent means the platform seller
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seller_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_policy: Option<ReturnPolicy>,
    /// Return window in days
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_period: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cod_available: Option<bool>,
}

impl Product {
    /// Effective seller id, falling back to the platform seller
    pub fn seller(&self) -> &str {
        self.seller_id.as_deref().unwrap_or(PLATFORM_SELLER_ID)
    }
}
