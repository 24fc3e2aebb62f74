//! # Webhook 路由控制器
//!
//! 实现 `POST /webhook`：校验 → 去重 → 格式化 → 发送。

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::header::CONTENT_TYPE;
use axum::Json;
use serde_json::Value;

use sigrelay_core::alert::entity::{Alert, Payload};
use sigrelay_core::alert::format::format_message;
use sigrelay_core::common::time::epoch_seconds;
use sigrelay_core::dedup::dedup_key;

use crate::error::ApiError;
use crate::server::AppState;
use crate::types::{ApiErrorResponse, WebhookRequest, WebhookResponse};

const EXPECTED_JSON: &str = "Expected JSON payload";
const INVALID_SECRET: &str = "Invalid secret";

/// 接收告警并转发到 Telegram
///
/// 同一 `symbol|action|timeframe` 在去重窗口内只转发一次。
/// 去重时间戳在发送之前写入，发送失败同样占用窗口。
#[utoipa::path(
    post,
    path = "/webhook",
    tag = "告警 (Webhook)",
    request_body(content = WebhookRequest, content_type = "application/json"),
    responses(
        (status = 200, description = "已发送或因重复被跳过", body = WebhookResponse),
        (status = 400, description = "请求体不是 JSON", body = ApiErrorResponse),
        (status = 403, description = "共享密钥错误", body = ApiErrorResponse),
        (status = 502, description = "Telegram 发送失败", body = ApiErrorResponse)
    )
)]
pub async fn receive_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookResponse>, ApiError> {
    let payload = parse_payload(&headers, &body)?;

    if payload.get("secret").and_then(Value::as_str) != Some(&*state.secret) {
        tracing::warn!("Rejected webhook with invalid secret");
        return Err(ApiError::Forbidden(INVALID_SECRET.into()));
    }

    let key = dedup_key(&payload);
    let now = state.clock.now();
    if state
        .deduplicator
        .should_suppress(&key, epoch_seconds(now))
        .await?
    {
        tracing::debug!(key = %key, "Duplicate alert suppressed");
        return Ok(Json(WebhookResponse::duplicate()));
    }

    let alert = Alert::from_payload(&payload);
    let message = format_message(&alert, now);

    let delivery = state.notifier.send(&message).await?;
    tracing::info!(
        symbol = %alert.symbol,
        action = %alert.action,
        message_id = ?delivery.message_id,
        "Alert forwarded"
    );

    Ok(Json(WebhookResponse::sent()))
}

/// # Summary
/// Accepts the body only when it is declared as JSON and decodes to an object.
///
/// # Logic
/// 1. `Content-Type` must be `application/json` or `application/*+json`.
/// 2. The body must parse as JSON.
/// 3. The top-level value must be an object.
fn parse_payload(headers: &HeaderMap, body: &[u8]) -> Result<Payload, ApiError> {
    if !is_json_content_type(headers) {
        tracing::warn!("Rejected webhook without JSON content type");
        return Err(ApiError::BadRequest(EXPECTED_JSON.into()));
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => {
            tracing::warn!("Rejected webhook whose JSON body is not an object");
            Err(ApiError::BadRequest(EXPECTED_JSON.into()))
        }
        Err(e) => {
            tracing::warn!("Rejected webhook with unparseable JSON: {}", e);
            Err(ApiError::BadRequest(EXPECTED_JSON.into()))
        }
    }
}

fn is_json_content_type(headers: &HeaderMap) -> bool {
    let Some(value) = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    let mime = value
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}
