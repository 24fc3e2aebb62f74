//! # API 统一错误处理
//!
//! 将下层各 crate 的错误类型统一映射到 HTTP 状态码与 JSON 响应体。

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use sigrelay_core::cache::error::CacheError;
use sigrelay_core::notify::error::NotifyError;

use crate::types::ApiErrorResponse;

/// API 层统一错误枚举
#[derive(Error, Debug)]
pub enum ApiError {
    /// 请求体不是 JSON 对象 (400)
    #[error("Malformed request: {0}")]
    BadRequest(String),

    /// 共享密钥不匹配 (403)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// 通知发送失败 (502)
    #[error("Delivery failure: {0}")]
    Delivery(String),

    /// 下层存储等内部错误 (500)
    #[error("Internal error: {0}")]
    Internal(String),
}

/// 将 `ApiError` 转换为 axum 的 HTTP 响应
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            ApiError::Delivery(msg) => {
                // 发送失败只记录日志，不向告警源透传平台细节
                tracing::error!("Notification delivery failed: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    "Failed to deliver notification".to_string(),
                )
            }
            ApiError::Internal(msg) => {
                tracing::error!("Internal server error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ApiErrorResponse::from_msg(message));
        (status, body).into_response()
    }
}

/// 从 `NotifyError` 转换
impl From<NotifyError> for ApiError {
    fn from(err: NotifyError) -> Self {
        ApiError::Delivery(err.to_string())
    }
}

/// 从 `CacheError` 转换
impl From<CacheError> for ApiError {
    fn from(err: CacheError) -> Self {
        ApiError::Internal(err.to_string())
    }
}
