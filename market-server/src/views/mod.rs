//! 读模型投影
//!
//! 三个角色各自的订单视图，全部从唯一的规范订单账本派生，按需查询，
//! 不维护第二份可写副本。收到同步总线令牌的上下文重新调用这些投影。

pub mod admin;
pub mod buyer;
pub mod seller;

pub use admin::global_ledger;
pub use buyer::order_history;
pub use seller::{seller_dashboard, RevenueSummary, SellerDashboard, SellerOrderRow};
