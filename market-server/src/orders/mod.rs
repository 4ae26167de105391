//! 订单域
//!
//! `splitter` 负责纯粹的拆单计算；`service` 负责结账流水线和状态机，
//! 持有持久化适配器与同步总线。

pub mod service;
pub mod splitter;

pub use service::{CheckoutOutcome, CheckoutRequest, OrderService};
pub use splitter::{generate_order_id, split_cart};
