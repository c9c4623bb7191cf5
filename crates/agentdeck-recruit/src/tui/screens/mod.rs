//! One module per tab. Each screen owns its state, key handling, and
//! rendering; cross-screen effects travel back as action enums.

pub mod activity;
pub mod candidates;
pub mod outreach;
pub mod postings;
