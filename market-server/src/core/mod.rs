//! 核心模块 - 服务器配置、状态和错误定义
//!
//! # 模块结构
//!
//! - [`Config`] - 服务器配置
//! - [`AppState`] - 应用状态 (显式依赖注入)
//! - [`Server`] - HTTP 服务器
//! - [`ApiError`] - HTTP 错误映射

pub mod config;
pub mod error;
pub mod server;
pub mod state;

pub use config::{BackendKind, Config};
pub use error::{ApiError, ApiResult};
pub use server::Server;
pub use state::AppState;
