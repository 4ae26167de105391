//! Sync status response
//!
//! Lets a reconnecting context check resource versions against its own and
//! detect server restarts via the epoch.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncStatus {
    /// Server instance epoch (UUID generated at startup)
    pub epoch: String,
    /// Current version per refresh topic, keyed by wire token
    pub versions: HashMap<String, u64>,
}
