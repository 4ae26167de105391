use market_server::{AppState, Config, Server, init_logger};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. 设置环境 (dotenv, 日志)
    dotenv::dotenv().ok();
    init_logger();

    tracing::info!("Axora market server starting...");

    // 2. 加载配置
    let config = Config::from_env();

    // 3. 初始化服务状态 (持久化适配器、同步总线、订单服务)
    let state = AppState::initialize(&config).await?;

    // 4. 启动 HTTP 服务器
    let server = Server::with_state(config, state);

    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
