//! In-memory adapters for the `sigrelay-core` cache port.

pub mod mem;
