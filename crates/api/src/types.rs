//! # DTO (Data Transfer Object) 层
//!
//! webhook 请求与响应的 JSON 结构。
//! 所有 DTO 必须派生 `utoipa::ToSchema` 以自动进入 Swagger 文档。

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ============================================================
//  Webhook 请求
// ============================================================

/// Webhook 请求体
///
/// 仅用于文档与测试客户端；handler 本身按无类型 JSON 对象解析，
/// 以便容忍字段类型不一致的告警源。
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct WebhookRequest {
    /// 共享密钥，必须与服务端配置完全一致
    #[schema(example = "s3cret")]
    pub secret: String,
    /// 交易标的
    #[schema(example = "BTCUSD")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    /// 方向 (BUY / SELL，大小写不敏感)
    #[schema(example = "sell")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    /// 交易所
    #[schema(example = "BINANCE")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange: Option<String>,
    /// K 线周期
    #[schema(example = "15m")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeframe: Option<String>,
    /// 建议有效期 (分钟)，0 视为未提供
    #[schema(example = 30)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_minutes: Option<f64>,
    /// 置信度 (0.0 - 1.0)，0 视为未提供
    #[schema(example = 0.82)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    /// 备注
    #[schema(example = "breakout")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

// ============================================================
//  通用响应 DTO
// ============================================================

/// Webhook 成功响应
///
/// `sent` 与 `skipped` 互斥，未使用的字段不会序列化。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WebhookResponse {
    /// 固定为 true
    pub ok: bool,
    /// 消息已成功发送
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sent: Option<bool>,
    /// 跳过原因 (目前只有 "duplicate")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "duplicate")]
    pub skipped: Option<String>,
}

impl WebhookResponse {
    /// 已发送
    pub fn sent() -> Self {
        Self {
            ok: true,
            sent: Some(true),
            skipped: None,
        }
    }

    /// 窗口内重复，已忽略
    pub fn duplicate() -> Self {
        Self {
            ok: true,
            sent: None,
            skipped: Some("duplicate".to_string()),
        }
    }
}

/// 失败响应
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// 固定为 false
    pub ok: bool,
    /// 错误描述信息
    #[schema(example = "Invalid secret")]
    pub error: String,
}

impl ApiErrorResponse {
    /// 从错误信息构建
    pub fn from_msg(msg: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: msg.into(),
        }
    }
}
