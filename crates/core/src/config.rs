use serde::{Deserialize, Serialize};

/// Default Telegram Bot API endpoint.
pub const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// 全局应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub telegram: TelegramConfig,
    pub webhook: WebhookConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
    /// Base URL of the Bot API, overridable for local stubs.
    pub api_base: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Shared secret every webhook payload must echo in its `secret` field.
    pub secret: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5000,
            },
            telegram: TelegramConfig {
                bot_token: String::new(),
                chat_id: String::new(),
                api_base: TELEGRAM_API_BASE.to_string(),
            },
            webhook: WebhookConfig {
                secret: String::new(),
            },
        }
    }
}

impl AppConfig {
    /// # Summary
    /// Lists required values that are still empty.
    ///
    /// # Returns
    /// Names of the missing settings, in declaration order. Empty when the
    /// configuration is usable.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let required = [
            ("telegram_bot_token", &self.telegram.bot_token),
            ("telegram_chat_id", &self.telegram.chat_id),
            ("webhook_secret", &self.webhook.secret),
        ];
        required
            .into_iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| name)
            .collect()
    }

    /// `host:port` string handed to the TCP listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
