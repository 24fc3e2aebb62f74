//! # API 服务启动器
//!
//! 组装 axum 路由、挂载 Swagger UI、配置请求追踪并绑定 TCP 端口对外提供服务。
//! 本模块不直接启动 `main()`, 而是由 `crates/app` 的 DI 容器持有并调用。

use std::future::Future;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;
use utoipa_swagger_ui::SwaggerUi;

use sigrelay_core::common::time::TimeProvider;
use sigrelay_core::dedup::Deduplicator;
use sigrelay_core::notify::port::Notifier;

use crate::routes::{health, webhook};

// ============================================================
//  共享应用状态
// ============================================================

/// 全局应用状态，通过 axum 的 `State` 提取器注入到每个 Handler 中。
///
/// # Invariants
/// - 所有依赖在服务启动前由 DI 容器注入，生命周期与进程等同。
/// - 去重表只通过 `deduplicator` 访问，不存在全局可变状态。
#[derive(Clone)]
pub struct AppState {
    /// webhook 共享密钥
    pub secret: Arc<str>,
    /// 去重器 (包装注入的 `DedupStore`)
    pub deduplicator: Deduplicator,
    /// 通知发送端口
    pub notifier: Arc<dyn Notifier>,
    /// 时钟 (测试中替换为 `FakeClockProvider`)
    pub clock: Arc<dyn TimeProvider>,
}

// ============================================================
//  OpenAPI 文档定义
// ============================================================

/// 全局 OpenAPI 文档结构
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Signal Relay API",
        version = "0.1.0",
        description = "Receives trading-signal webhooks and relays them to a Telegram chat, suppressing duplicates.",
        license(name = "MIT")
    ),
    tags(
        (name = "告警 (Webhook)", description = "告警接收与转发"),
        (name = "系统 (System)", description = "存活检查")
    )
)]
pub struct ApiDoc;

// ============================================================
//  服务构建与启动
// ============================================================

/// 构建完整的 axum 应用路由树。
///
/// 测试直接调用本函数并自行绑定随机端口。
pub fn build_router(state: AppState) -> Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .routes(routes!(health::index))
        .routes(routes!(webhook::receive_webhook))
        .with_state(state)
        .split_for_parts();

    router
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api))
        .layer(TraceLayer::new_for_http())
}

/// 绑定端口并启动 HTTP 监听，直到 `shutdown` 完成。
///
/// # Arguments
/// * `state` - 由外部 DI 容器注入的共享状态
/// * `bind_addr` - 监听的地址与端口，如 `"0.0.0.0:5000"`
/// * `shutdown` - 优雅退出信号
pub async fn start_server<F>(
    state: AppState,
    bind_addr: &str,
    shutdown: F,
) -> Result<(), Box<dyn std::error::Error>>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_router(state);

    let listener = TcpListener::bind(bind_addr).await?;
    tracing::info!("🚀 Signal relay listening on {}", listener.local_addr()?);
    tracing::info!("📖 Swagger UI: http://{}/swagger-ui/", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
