//! Cross-context sync message vocabulary
//!
//! The sync bus carries a single token per message and no body: consumers
//! always re-query the persistence adapter instead of trusting an embedded
//! diff, which tolerates dropped and out-of-order deliveries.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Refresh topics broadcast between browsing contexts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SyncTopic {
    /// Product catalog changed
    RefreshProducts,
    /// Order ledger changed
    RefreshOrders,
    /// A user profile (cart, saved address, history) changed
    RefreshUserData,
}

impl SyncTopic {
    /// Wire token, exactly as broadcast on the channel
    pub const fn as_token(&self) -> &'static str {
        match self {
            SyncTopic::RefreshProducts => "REFRESH_PRODUCTS",
            SyncTopic::RefreshOrders => "REFRESH_ORDERS",
            SyncTopic::RefreshUserData => "REFRESH_USER_DATA",
        }
    }
}

impl fmt::Display for SyncTopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token())
    }
}

impl TryFrom<&str> for SyncTopic {
    type Error = ();

    fn try_from(token: &str) -> Result<Self, Self::Error> {
        match token {
            "REFRESH_PRODUCTS" => Ok(SyncTopic::RefreshProducts),
            "REFRESH_ORDERS" => Ok(SyncTopic::RefreshOrders),
            "REFRESH_USER_DATA" => Ok(SyncTopic::RefreshUserData),
            _ => Err(()),
        }
    }
}
