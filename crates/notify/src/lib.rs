//! Outbound notification adapters.

pub mod telegram;
