//! Lifecycle states of a mention.
//!
//! ```text
//! absent ──receive──▶ pending ──valid──▶ current
//!                        │                  │
//!                        └──invalid──▶ invalidated ◀──invalid
//! ```
//!
//! `pending` only exists in memory between lookup and the first persist, so
//! a stored record is always either current or invalidated.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MentionState {
  Current,
  Invalidated,
}

impl MentionState {
  pub fn is_current(&self) -> bool { matches!(self, Self::Current) }
}
