use thiserror::Error;

/// # Summary
/// Notification delivery failures.
///
/// # Invariants
/// - Every variant is terminal for the request that triggered it; nothing
///   in the relay retries.
#[derive(Error, Debug)]
pub enum NotifyError {
    /// Connection failure, TLS failure or timeout on the outbound call
    #[error("Network error: {0}")]
    Network(String),

    /// Notifier could not be constructed (e.g. missing token)
    #[error("Configuration error: {0}")]
    Config(String),

    /// The messaging platform answered with a non-success status
    #[error("Platform error: {0}")]
    Platform(String),
}
