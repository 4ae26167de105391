//! 跨上下文同步总线
//!
//! # 架构
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                  SyncBus                     │
//! │  ┌────────────────────────────────────────┐  │
//! │  │  broadcast::Sender<SyncTopic>          │  │
//! │  └────────────────────────────────────────┘  │
//! └──────────────────┬───────────────────────────┘
//!                    │
//!        ┌───────────┼───────────┐
//!        ▼           ▼           ▼
//!   买家视图      卖家视图     管理端视图
//!   (订阅者各自重新查询持久化适配器)
//! ```
//!
//! # 保证
//!
//! 通知是纯建议性的 (fire-and-forget)：不保证顺序和投递。错过消息的上下文
//! 会保持陈旧，直到下一次手动刷新或它自己的写入触发新广播。消息只携带
//! 主题令牌，不携带数据 —— 消费者总是重新查询持久化适配器作为事实来源。

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use shared::message::SyncTopic;
use shared::models::SyncStatus;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Capacity of the broadcast channel (default: 1024)
const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// 同步总线 - 同源所有浏览上下文共享的广播通道
#[derive(Debug, Clone)]
pub struct SyncBus {
    /// 广播发送端
    tx: broadcast::Sender<SyncTopic>,
    /// 各主题的单调递增版本号 (无锁并发)
    versions: Arc<DashMap<SyncTopic, u64>>,
    /// 服务器实例 epoch (启动时生成的 UUID)，用于检测重启
    epoch: String,
    /// 关闭信号令牌
    shutdown_token: CancellationToken,
}

impl SyncBus {
    /// 创建默认容量的同步总线
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// 创建指定容量的同步总线
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            tx,
            versions: Arc::new(DashMap::new()),
            epoch: Uuid::new_v4().to_string(),
            shutdown_token: CancellationToken::new(),
        }
    }

    /// 广播刷新通知 (fire-and-forget)
    ///
    /// 递增该主题的版本号并通知所有订阅者。没有订阅者不算错误。
    /// 返回新版本号。
    pub fn broadcast(&self, topic: SyncTopic) -> u64 {
        let version = {
            let mut entry = self.versions.entry(topic).or_insert(0);
            *entry += 1;
            *entry
        };
        // 忽略发送错误：没有活跃订阅者时通知自然丢弃
        let _ = self.tx.send(topic);
        tracing::debug!(topic = %topic, version, "sync broadcast");
        version
    }

    /// 订阅刷新通知
    ///
    /// 每个持有读模型的上下文在启动时订阅，收到令牌后重新查询投影。
    pub fn subscribe(&self) -> broadcast::Receiver<SyncTopic> {
        self.tx.subscribe()
    }

    /// 获取指定主题的当前版本号 (不存在返回 0)
    pub fn version(&self, topic: SyncTopic) -> u64 {
        self.versions.get(&topic).map(|v| *v).unwrap_or(0)
    }

    /// 服务器实例 epoch
    pub fn epoch(&self) -> &str {
        &self.epoch
    }

    /// 同步状态快照 (用于重连上下文检查资源版本)
    pub fn status(&self) -> SyncStatus {
        let versions: HashMap<String, u64> = self
            .versions
            .iter()
            .map(|entry| (entry.key().as_token().to_string(), *entry.value()))
            .collect();
        SyncStatus {
            epoch: self.epoch.clone(),
            versions,
        }
    }

    /// 获取关闭令牌 (用于监控关闭信号)
    pub fn shutdown_token(&self) -> &CancellationToken {
        &self.shutdown_token
    }

    /// 优雅关闭同步总线
    pub fn shutdown(&self) {
        tracing::info!("Shutting down sync bus");
        self.shutdown_token.cancel();
    }
}

impl Default for SyncBus {
    fn default() -> Self {
        Self::new()
    }
}
