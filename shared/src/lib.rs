//! Shared types for the Axora marketplace
//!
//! Common types used by the market server and its clients: domain models
//! (products, carts, orders, user profiles), the cross-context sync message
//! vocabulary, and the unified error taxonomy.

pub mod error;
pub mod message;
pub mod models;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use error::{StoreError, StoreResult};
pub use message::SyncTopic;
