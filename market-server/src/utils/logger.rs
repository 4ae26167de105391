//! 日志初始化
//!
//! 默认输出到终端；给定日志目录时切换为按天滚动的文件输出。
//! `RUST_LOG` 优先于传入的级别。

use std::path::Path;

use tracing_subscriber::EnvFilter;

/// Initialize the logger
pub fn init_logger() {
    init_logger_with_file(None, None);
}

/// Initialize the logger with optional file output
pub fn init_logger_with_file(log_level: Option<&str>, log_dir: Option<&Path>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.unwrap_or("info")));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false);

    match log_dir {
        Some(dir) if dir.exists() => {
            let appender = tracing_appender::rolling::daily(dir, "market-server");
            builder.with_writer(appender).with_ansi(false).init();
        }
        _ => builder.init(),
    }
}
