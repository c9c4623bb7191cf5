//! Shared types for the AgentDeck consoles.
//!
//! Two kinds of types live here:
//! - `record`: plain display records owned by a single screen (events,
//!   candidates, transactions, log lines). Nothing is persisted; every
//!   record dies with the process.
//! - `agent`: payload shapes returned by the remote agents. These
//!   deserialize tolerantly; agents drift, so missing fields become
//!   defaults instead of errors.

pub mod agent;
pub mod record;
