//! Time-windowed suppression of repeated alerts.

use std::sync::Arc;

use crate::alert::entity::{Payload, text_field};
use crate::cache::error::CacheError;
use crate::cache::port::DedupStore;

/// Seconds during which a repeated key is suppressed.
pub const DEDUP_WINDOW_SECONDS: f64 = 6.0;

const KEY_SEPARATOR: &str = "|";

/// Segment used for an absent or `null` field. Differs from an explicit `""`.
pub const ABSENT_SEGMENT: &str = "None";

/// # Summary
/// Derives the dedup key `symbol|action|timeframe` from a raw payload.
///
/// # Invariants
/// - Uses the values exactly as received. No trimming and no case folding,
///   so `sell` and `SELL` produce different keys.
/// - Absent or `null` fields contribute `ABSENT_SEGMENT`, so a missing
///   timeframe and an empty one are different keys.
pub fn dedup_key(payload: &Payload) -> String {
    ["symbol", "action", "timeframe"]
        .iter()
        .map(|name| text_field(payload, name).unwrap_or_else(|| ABSENT_SEGMENT.to_string()))
        .collect::<Vec<_>>()
        .join(KEY_SEPARATOR)
}

/// # Summary
/// Window policy on top of an injected `DedupStore`.
///
/// # Invariants
/// - At most one accepted alert per key per rolling `DEDUP_WINDOW_SECONDS`.
/// - A suppressed alert never refreshes the stored timestamp.
#[derive(Clone)]
pub struct Deduplicator {
    store: Arc<dyn DedupStore>,
    window: f64,
}

impl Deduplicator {
    pub fn new(store: Arc<dyn DedupStore>) -> Self {
        Self {
            store,
            window: DEDUP_WINDOW_SECONDS,
        }
    }

    /// # Summary
    /// Decides whether an alert with `key` seen at `now` must be dropped.
    ///
    /// # Logic
    /// Delegates to the store's atomic check-and-record, so two concurrent
    /// requests with the same key cannot both be accepted.
    ///
    /// # Returns
    /// * `Ok(true)` - duplicate, suppress.
    /// * `Ok(false)` - accepted; `now` has been recorded under `key`.
    pub async fn should_suppress(&self, key: &str, now: f64) -> Result<bool, CacheError> {
        let accepted = self.store.record_if_expired(key, now, self.window).await?;
        Ok(!accepted)
    }

    pub fn window(&self) -> f64 {
        self.window
    }
}
