//! # `sigrelay-core`
//!
//! Domain entities and ports of the signal relay. Adapters (the in-memory
//! dedup store, the Telegram notifier) live in their own crates and are
//! injected through the traits declared here.

pub mod alert;
pub mod cache;
pub mod common;
pub mod config;
pub mod dedup;
pub mod notify;
