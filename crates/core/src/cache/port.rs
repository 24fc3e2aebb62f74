use crate::cache::error::CacheError;
use async_trait::async_trait;

/// # Summary
/// Key → last-accepted-timestamp store backing alert deduplication (Port).
///
/// # Invariants
/// - Timestamps are seconds since the Unix epoch as `f64`.
/// - Entries are only ever overwritten, never evicted; the store grows with
///   the number of distinct keys.
/// - Object safe, so the handler can hold an `Arc<dyn DedupStore>`.
#[async_trait]
pub trait DedupStore: Send + Sync {
    /// # Summary
    /// Atomically checks a key against the window and records `now` if the
    /// key is new or its previous timestamp has aged out.
    ///
    /// # Logic
    /// 1. Look up the last timestamp for `key`.
    /// 2. If present and `now - last < window`, leave it untouched and
    ///    report a duplicate.
    /// 3. Otherwise store `now` under `key`.
    ///
    /// # Arguments
    /// * `key`: derived dedup key.
    /// * `now`: current time in epoch seconds.
    /// * `window`: suppression window in seconds.
    ///
    /// # Returns
    /// `Ok(true)` when `now` was recorded (accept), `Ok(false)` when the key
    /// is still inside its window (suppress).
    async fn record_if_expired(&self, key: &str, now: f64, window: f64)
    -> Result<bool, CacheError>;

    /// # Summary
    /// Returns the last accepted timestamp for `key`, if any.
    async fn last_seen(&self, key: &str) -> Result<Option<f64>, CacheError>;
}
