use crate::notify::error::NotifyError;
use async_trait::async_trait;
use serde_json::Value;

/// # Summary
/// Result of a successful delivery.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Delivery {
    /// Identifier the platform assigned to the message, when it reports one.
    pub message_id: Option<i64>,
    /// Decoded response body returned by the platform.
    pub response: Value,
}

/// # Summary
/// Interface for delivering a rendered alert message to an external chat.
///
/// # Invariants
/// - Implementations must be `Send` and `Sync` to serve concurrent webhooks.
/// - A non-success answer from the platform is an error, never a `Delivery`.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// # Summary
    /// Sends an already formatted message.
    ///
    /// # Arguments
    /// * `message` - Markdown text to deliver.
    ///
    /// # Returns
    /// * `Ok(Delivery)` on a 2xx answer.
    /// * `Err(NotifyError)` on transport failure, timeout or rejection.
    async fn send(&self, message: &str) -> Result<Delivery, NotifyError>;
}
