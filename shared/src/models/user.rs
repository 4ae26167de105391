//! User Profile Model
//!
//! Authentication is an external collaborator; the profile only records what
//! the pipeline needs: role, the saved address snapshot source, and the
//! server-persisted cart.

use serde::{Deserialize, Serialize};

use super::address::Address;
use super::cart::Cart;

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Buyer,
    Seller,
    Admin,
}

/// User profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub uid: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    /// Most recent checkout address; edits never alter placed orders
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_address: Option<Address>,
    #[serde(default)]
    pub cart: Cart,
}
