//! 查询代理服务入口

use anyhow::Context;
use common::config::{load_dotenv, AppConfig};
use common::logging::init_tracing;
use proxy_service::{create_router, AppState};
use tokio::net::TcpListener;
use tracing::info;

const SERVICE_NAME: &str = "proxy-service";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 必须先于配置读取加载
    load_dotenv();

    // 加载配置
    let config = AppConfig::load_with_service(SERVICE_NAME);

    // 初始化日志追踪
    init_tracing("info", config.json_logs);

    let state = AppState::new(config.clone());
    let app = create_router(state);

    // 启动服务
    let addr = config.bind_addr();
    info!(
        service = SERVICE_NAME,
        address = %addr,
        tls_mode = %config.tls_mode,
        connect_timeout_secs = ?config.connect_timeout_secs,
        "启动服务"
    );

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("绑定地址失败: {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("服务运行失败")?;

    info!(service = SERVICE_NAME, "服务已停止");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("收到停止信号，正在关闭");
}
