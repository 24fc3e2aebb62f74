use thiserror::Error;

/// # Summary
/// Failures raised by a dedup store backend.
///
/// # Invariants
/// - Derives `Error` through `thiserror`.
#[derive(Error, Debug)]
pub enum CacheError {
    // 底层存储引擎故障 (e.g. a remote TTL cache being unreachable)
    #[error("Storage error: {0}")]
    Storage(String),
}
