//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`orders`] - 结账流水线、订单查询与状态流转
//! - [`products`] - 商品目录
//! - [`sync`] - 同步状态 (epoch + 各资源版本号)
//!
//! 所有处理函数返回 [`crate::core::ApiResult`]，错误由
//! [`crate::core::ApiError`] 统一映射为 HTTP 状态码。

pub mod health;
pub mod orders;
pub mod products;
pub mod sync;
