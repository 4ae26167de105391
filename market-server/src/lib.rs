//! Axora Market Server - multi-seller order pipeline
//!
//! # 架构概述
//!
//! 本模块是 marketplace 后端的主入口，提供以下核心功能：
//!
//! - **持久化适配器** (`db`): 文档存储 (SurrealDB) 与本地 KV 存储 (redb)
//!   之上的统一接口，含降级回退
//! - **订单拆分** (`orders::splitter`): 购物车按卖家拆分为独立子订单
//! - **订单服务** (`orders::service`): 幂等创建、状态机、结算流水线
//! - **同步总线** (`sync`): 跨上下文广播刷新通知
//! - **读模型** (`views`): 买家/卖家/管理员三视图
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! market-server/src/
//! ├── core/          # 配置、状态、错误、服务器
//! ├── db/            # 持久化适配器 (document / local / fallback)
//! ├── orders/        # 拆分器与订单服务
//! ├── sync/          # 跨上下文同步总线
//! ├── views/         # 读模型投影
//! ├── api/           # HTTP 路由和处理器
//! └── utils/         # 日志等工具
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod orders;
pub mod routes;
pub mod sync;
pub mod utils;
pub mod views;

// Re-export 公共类型
pub use core::{AppState, Config, Server};
pub use db::{DocumentStore, FallbackAdapter, LocalStore, PersistenceAdapter};
pub use orders::{OrderService, split_cart};
pub use sync::SyncBus;

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};
