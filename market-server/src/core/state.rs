//! 应用状态
//!
//! 服务器启动时构造一次，持有持久化适配器、订单服务和同步总线，
//! 通过 axum 状态显式传给所有处理函数。没有模块级全局。

use std::sync::Arc;
use std::time::Duration;

use crate::core::{BackendKind, Config};
use crate::db::{DocumentStore, FallbackAdapter, LocalStore, PersistenceAdapter};
use crate::orders::OrderService;
use crate::sync::SyncBus;

/// 应用状态
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// 启动时选定的持久化后端，之后不再按调用判断
    pub adapter: Arc<dyn PersistenceAdapter>,
    pub orders: OrderService,
    pub sync: SyncBus,
}

impl AppState {
    /// 初始化应用状态
    ///
    /// 根据配置选定后端：`document` 走 SurrealDB 文档存储，redb 作
    /// 最近可用数据缓存兜底；`local` 走纯 redb 存储。
    pub async fn initialize(config: &Config) -> anyhow::Result<Self> {
        config.ensure_work_dir_structure()?;
        let db_dir = config.database_dir();

        let adapter: Arc<dyn PersistenceAdapter> = match config.backend {
            BackendKind::Document => {
                let remote = DocumentStore::open(&db_dir).await?;
                let cache = LocalStore::open(db_dir.join("cache.redb"))?;
                tracing::info!(dir = %db_dir.display(), "document store backend selected");
                Arc::new(FallbackAdapter::new(Arc::new(remote), cache))
            }
            BackendKind::Local => {
                let store = LocalStore::open(db_dir.join("market.redb"))?;
                tracing::info!(dir = %db_dir.display(), "local store backend selected");
                Arc::new(store)
            }
        };

        let sync = SyncBus::new();
        let orders = OrderService::new(
            adapter.clone(),
            sync.clone(),
            Duration::from_millis(config.checkout_min_latency_ms),
        );

        Ok(Self {
            config: config.clone(),
            adapter,
            orders,
            sync,
        })
    }
}
