mod settings;

use std::path::PathBuf;
use std::sync::Arc;

use sigrelay_api::server::{AppState, start_server};
use sigrelay_cache::mem::MemDedupStore;
use sigrelay_core::common::time::RealTimeProvider;
use sigrelay_core::dedup::Deduplicator;
use sigrelay_notify::telegram::TelegramNotifier;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// # Summary
/// 应用启动入口，纯粹的 DI 容器。
/// 负责实例化所有具体实现组件并通过 Arc<dyn Trait> 注入到 API 层。
///
/// # Logic
/// 1. 加载 .env 并初始化全局日志。
/// 2. 读取配置 (文件 + 环境变量)。
/// 3. 实例化基础设施层（去重表、Telegram 通知器）。
/// 4. 启动 HTTP 服务，等待外部信号退出。
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. 初始化日志
    let dotenv = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    info!("Signal relay starting...");
    if let Ok(path) = dotenv {
        info!("Loaded environment from {}", path.display());
    }

    // 2. 读取配置
    let config_path = std::env::var("SIGRELAY_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(settings::DEFAULT_CONFIG_FILE));
    let config = settings::load_settings(&config_path)?;

    // 3. 实例化基础设施层
    let store = Arc::new(MemDedupStore::new());
    let notifier = Arc::new(TelegramNotifier::from_config(&config.telegram)?);

    let state = AppState {
        secret: Arc::from(config.webhook.secret.as_str()),
        deduplicator: Deduplicator::new(store),
        notifier,
        clock: Arc::new(RealTimeProvider),
    };

    // 4. 启动服务，挂起直到退出信号
    start_server(state, &config.bind_addr(), shutdown_signal()).await?;
    info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        // 无法监听信号时保持运行，由进程管理器负责终止
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received. Exiting...");
}
