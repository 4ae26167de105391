//! Order Model
//!
//! One order has exactly one seller. A single checkout spanning N sellers
//! produces N sibling orders sharing the same shipping address, payment
//! method, and timestamp, each with an independent id, status, and lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{StoreError, StoreResult};

use super::address::Address;
use super::cart::CartItem;

/// Order status
///
/// ```text
/// Processing -> Shipped -> Out for Delivery -> Delivered
///      \____________\__________ Cancelled
/// ```
///
/// `Delivered` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    #[default]
    Processing,
    Shipped,
    #[serde(rename = "Out for Delivery")]
    OutForDelivery,
    Delivered,
    Cancelled,
}

/// Outcome of a legal status transition request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Persist the new status
    Apply,
    /// Identical or backwards target: leave the order unchanged
    Noop,
}

impl OrderStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Position on the fulfillment track; `Cancelled` sits outside it
    fn progression(&self) -> u8 {
        match self {
            OrderStatus::Processing => 0,
            OrderStatus::Shipped => 1,
            OrderStatus::OutForDelivery => 2,
            OrderStatus::Delivered => 3,
            OrderStatus::Cancelled => 4,
        }
    }

    /// Whether the buyer may still cancel
    ///
    /// Cancellation is closed once the order is out for delivery or later.
    pub fn buyer_can_cancel(&self) -> bool {
        matches!(self, OrderStatus::Processing | OrderStatus::Shipped)
    }

    /// Check a transition out of this status
    ///
    /// Terminal states accept nothing. An identical or backwards target is a
    /// no-op, not an error: the caller returns the unchanged order.
    pub fn validate_transition(&self, next: OrderStatus) -> StoreResult<Transition> {
        if self.is_terminal() {
            return Err(StoreError::invalid_state(format!(
                "order is {self}, no further transitions are accepted"
            )));
        }
        if next == *self {
            return Ok(Transition::Noop);
        }
        if next == OrderStatus::Cancelled {
            return Ok(Transition::Apply);
        }
        if next.progression() < self.progression() {
            return Ok(Transition::Noop);
        }
        Ok(Transition::Apply)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OrderStatus::Processing => "Processing",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::OutForDelivery => "Out for Delivery",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        };
        f.write_str(label)
    }
}

/// Payment method chosen at checkout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[serde(rename = "Credit/Debit Card")]
    Card,
    #[serde(rename = "Net Banking")]
    NetBanking,
    #[serde(rename = "UPI")]
    Upi,
    #[serde(rename = "Cash on Delivery")]
    CashOnDelivery,
}

/// Order entity: one seller's portion of a checkout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Human-legible id, `AXO-` + 6 digits, assigned at creation
    pub id: String,
    pub buyer_id: String,
    /// Exactly one seller per order
    pub seller_id: String,
    pub date: DateTime<Utc>,
    /// Non-empty; every item belongs to this order's seller
    pub items: Vec<CartItem>,
    /// Sum of item price x quantity over this order's own items
    pub total: i64,
    pub status: OrderStatus,
    /// Address snapshot taken at checkout
    pub shipping_address: Address,
    pub payment_method: PaymentMethod,
    pub estimated_delivery: DateTime<Utc>,
    /// Server-assigned on every write
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Recompute the total from the embedded items
    pub fn computed_total(&self) -> i64 {
        self.items.iter().map(CartItem::line_total).sum()
    }
}
