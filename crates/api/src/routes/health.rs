//! # 存活探针

/// 服务存活检查，返回纯文本
#[utoipa::path(
    get,
    path = "/",
    tag = "系统 (System)",
    responses(
        (status = 200, description = "服务正在运行", body = String, content_type = "text/plain")
    )
)]
pub async fn index() -> &'static str {
    "Telegram Signal Bot is running"
}
