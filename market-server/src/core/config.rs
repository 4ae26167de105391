use std::path::PathBuf;

/// 持久化后端选择
///
/// 启动时根据配置选定一次，之后不再按调用重新判断。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    /// SurrealDB 文档存储 (以 redb 本地缓存作降级回退)
    #[default]
    Document,
    /// 纯本地 redb 存储 ("simulation mode")
    Local,
}

impl BackendKind {
    fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "document" => Some(BackendKind::Document),
            "local" => Some(BackendKind::Local),
            _ => None,
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendKind::Document => f.write_str("document"),
            BackendKind::Local => f.write_str("local"),
        }
    }
}

/// 服务器配置
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | /var/lib/axora/market | 工作目录 |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | BACKEND | document | 持久化后端: document \| local |
/// | CHECKOUT_MIN_LATENCY_MS | 1500 | 结算最小延迟 (模拟支付网关) |
/// | ENVIRONMENT | development | 运行环境 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/axora BACKEND=local cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库、日志等文件
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 持久化后端
    pub backend: BackendKind,
    /// 结算最小延迟 (毫秒)，仅用于 UX 平滑，非正确性要求
    pub checkout_min_latency_ms: u64,
    /// 运行环境: development | staging | production
    pub environment: String,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/axora/market".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            backend: std::env::var("BACKEND")
                .ok()
                .and_then(|v| BackendKind::parse(&v))
                .unwrap_or_default(),
            checkout_min_latency_ms: std::env::var("CHECKOUT_MIN_LATENCY_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(1500),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(
        work_dir: impl Into<String>,
        http_port: u16,
        backend: BackendKind,
    ) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config.backend = backend;
        config.checkout_min_latency_ms = 0;
        config
    }

    /// 数据库目录 (work_dir/database)
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    /// 确保工作目录结构存在
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
