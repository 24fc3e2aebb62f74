//! # `sigrelay-api` - HTTP 入口
//!
//! 本 crate 是信号转发服务的 HTTP 服务入口。
//! 使用 `axum` 构建路由与控制器，通过 `utoipa` 自动生成 OpenAPI 3.0 Swagger 文档。
//!
//! ## 架构职责
//! - 接收 TradingView 等告警源推送的 webhook
//! - 校验 JSON 格式与共享密钥
//! - 调用 `Deduplicator` 过滤重复告警，再交给 `Notifier` 发送

pub mod types;
pub mod error;
pub mod routes;
pub mod server;
