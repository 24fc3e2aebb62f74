use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use sigrelay_core::config::{TELEGRAM_API_BASE, TelegramConfig};
use sigrelay_core::notify::error::NotifyError;
use sigrelay_core::notify::port::{Delivery, Notifier};
use tracing::debug;

/// Upper bound for one `sendMessage` round trip.
pub const SEND_TIMEOUT: Duration = Duration::from_secs(8);

const PARSE_MODE: &str = "Markdown";

/// # Summary
/// A notifier implementation that sends messages via Telegram Bot API.
///
/// # Invariants
/// * `bot_token` must be valid.
/// * `chat_id` must be accessible by the bot.
/// * Every request is bounded by `SEND_TIMEOUT`; there is no retry.
pub struct TelegramNotifier {
    /// The Bot API token.
    bot_token: String,
    /// The target Chat ID.
    chat_id: String,
    /// Scheme and host of the Bot API.
    api_base: String,
    /// The HTTP client used for requests.
    client: reqwest::Client,
}

/// # Summary
/// Payload structure for Telegram `sendMessage` API.
#[derive(Serialize)]
struct TelegramMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
}

impl TelegramNotifier {
    /// # Summary
    /// Creates a new `TelegramNotifier` pointed at the public Bot API.
    ///
    /// # Logic
    /// 1. Rejects an empty token or chat id.
    /// 2. Installs the `ring` rustls provider if none is installed yet.
    /// 3. Builds an HTTP client carrying the fixed send timeout.
    ///
    /// # Arguments
    /// * `bot_token` - The Telegram Bot API token.
    /// * `chat_id` - The target chat ID to send messages to.
    ///
    /// # Returns
    /// * `Err(NotifyError::Config)` when a credential is empty or the client
    ///   cannot be built.
    pub fn new(bot_token: String, chat_id: String) -> Result<Self, NotifyError> {
        Self::build(bot_token, chat_id, SEND_TIMEOUT)
    }

    /// Builds a notifier from the `[telegram]` section of the app config.
    pub fn from_config(config: &TelegramConfig) -> Result<Self, NotifyError> {
        Ok(Self::new(config.bot_token.clone(), config.chat_id.clone())?
            .with_api_base(config.api_base.clone()))
    }

    /// Replaces the Bot API base URL (e.g. with a local stub).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    fn build(bot_token: String, chat_id: String, timeout: Duration) -> Result<Self, NotifyError> {
        if bot_token.trim().is_empty() {
            return Err(NotifyError::Config("Telegram bot token is empty".to_string()));
        }
        if chat_id.trim().is_empty() {
            return Err(NotifyError::Config("Telegram chat id is empty".to_string()));
        }

        ensure_crypto_provider();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NotifyError::Config(e.to_string()))?;

        Ok(Self {
            bot_token,
            chat_id,
            api_base: TELEGRAM_API_BASE.to_string(),
            client,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_base, self.bot_token)
    }
}

/// reqwest is built without a bundled provider; the process needs exactly
/// one installed before the first client is created.
fn ensure_crypto_provider() {
    if rustls::crypto::CryptoProvider::get_default().is_some() {
        return;
    }
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        debug!("rustls crypto provider installed concurrently");
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    /// # Summary
    /// Sends a notification to the configured Telegram chat.
    ///
    /// # Logic
    /// 1. Constructs the Telegram API URL.
    /// 2. POSTs `chat_id`, `text` and `parse_mode = Markdown` as JSON.
    /// 3. Fails on any transport error, timeout or non-success status.
    /// 4. Decodes the JSON body and extracts `result.message_id`.
    ///
    /// # Arguments
    /// * `message` - The rendered Markdown message.
    ///
    /// # Returns
    /// * `Ok(Delivery)` if the message was sent successfully.
    /// * `Err(NotifyError)` if a network error occurs or the API returns a non-success status.
    async fn send(&self, message: &str) -> Result<Delivery, NotifyError> {
        let payload = TelegramMessage {
            chat_id: &self.chat_id,
            text: message,
            parse_mode: PARSE_MODE,
        };

        // without_url(): the URL embeds the bot token and must not reach the logs
        let response = self
            .client
            .post(self.endpoint())
            .json(&payload)
            .send()
            .await
            .map_err(|e| NotifyError::Network(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(NotifyError::Platform(format!(
                "Telegram API error ({}): {}",
                status, error_text
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| NotifyError::Platform(format!("Invalid Telegram response: {}", e.without_url())))?;

        let message_id = body
            .get("result")
            .and_then(|r| r.get("message_id"))
            .and_then(Value::as_i64);

        Ok(Delivery {
            message_id,
            response: body,
        })
    }
}
