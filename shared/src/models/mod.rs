//! Domain models
//!
//! All external JSON uses camelCase field names to stay wire-compatible with
//! the document-store order records.

pub mod address;
pub mod cart;
pub mod order;
pub mod product;
pub mod sync;
pub mod user;

pub use address::Address;
pub use cart::{Cart, CartItem};
pub use order::{Order, OrderStatus, PaymentMethod, Transition};
pub use product::{Category, Product, ReturnPolicy, PLATFORM_SELLER_ID};
pub use sync::SyncStatus;
pub use user::{Role, UserProfile};
