//! Screen modules: per-tab state, key handling, and rendering.

pub mod chat;
pub mod schedule;
pub mod today;
pub mod wallet;
pub mod wellness;
