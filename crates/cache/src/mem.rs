use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use sigrelay_core::cache::error::CacheError;
use sigrelay_core::cache::port::DedupStore;

/// # Summary
/// 基于 DashMap 的内存去重表。
///
/// # Invariants
/// - 所有操作均通过并发哈希表 `DashMap` 执行，保证多线程安全。
/// - check-and-record holds the shard lock of the key for its whole
///   duration, so it is atomic per key.
/// - 不提供自动过期或容量限制；entries are overwritten, never removed.
pub struct MemDedupStore {
    // key -> last accepted epoch seconds
    storage: DashMap<String, f64>,
}

impl MemDedupStore {
    /// # Summary
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            storage: DashMap::new(),
        }
    }

    /// Number of distinct keys ever accepted.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}

impl Default for MemDedupStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DedupStore for MemDedupStore {
    /// # Summary
    /// Atomic check-and-record.
    ///
    /// # Logic
    /// Takes the entry for `key`. An occupied entry younger than `window` is
    /// left untouched; anything else is overwritten with `now`.
    ///
    /// # Returns
    /// * `Ok(true)` when `now` was stored, `Ok(false)` for a duplicate.
    async fn record_if_expired(
        &self,
        key: &str,
        now: f64,
        window: f64,
    ) -> Result<bool, CacheError> {
        match self.storage.entry(key.to_string()) {
            Entry::Occupied(mut entry) => {
                if now - *entry.get() < window {
                    return Ok(false);
                }
                entry.insert(now);
                Ok(true)
            }
            Entry::Vacant(entry) => {
                entry.insert(now);
                Ok(true)
            }
        }
    }

    async fn last_seen(&self, key: &str) -> Result<Option<f64>, CacheError> {
        Ok(self.storage.get(key).map(|v| *v.value()))
    }
}
