//! The mention record — one claimed (source, target) relationship and the
//! outcome of its latest verification or delivery.
//!
//! There is exactly one record per (source, target) pair. Records are never
//! deleted by normal operation; invalidation flips `current` and keeps the
//! last fetched `body` and `status_code` for auditing.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::lifecycle::MentionState;

/// A claimed reference from `source` to `target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mention {
  /// Opaque external lookup key; assigned once at creation.
  pub id:          Uuid,
  /// Page making the claim, exactly as received.
  pub source:      String,
  /// Page being referenced, exactly as received.
  pub target:      String,
  /// Last HTTP status observed, e.g. `"200"`. Empty until first fetch.
  pub status_code: String,
  /// Raw content of the last fetch.
  pub body:        String,
  /// `true` while the most recent verification succeeded.
  pub current:     bool,
  /// Operator gate for public display.
  pub reviewed:    bool,
  pub created_at:  DateTime<Utc>,
  pub modified_at: DateTime<Utc>,
}

impl Mention {
  /// Build a pending record for a pair that has never been seen.
  pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
    let now = Utc::now();
    Self {
      id:          Uuid::new_v4(),
      source:      source.into(),
      target:      target.into(),
      status_code: String::new(),
      body:        String::new(),
      current:     false,
      reviewed:    false,
      created_at:  now,
      modified_at: now,
    }
  }

  pub fn state(&self) -> MentionState {
    if self.current {
      MentionState::Current
    } else {
      MentionState::Invalidated
    }
  }

  /// Store the outcome of a successful source verification.
  pub fn record_verification(&mut self, status: u16, body: String) {
    self.status_code = status.to_string();
    self.body = body;
    self.current = true;
    self.touch();
  }

  /// Mark the record as no longer live. Prior content is retained.
  pub fn invalidate(&mut self) {
    self.current = false;
    self.touch();
  }

  /// Store the endpoint's answer to an outbound notification. The remote
  /// status is recorded as-is and does not affect `current`.
  pub fn record_delivery(&mut self, status: u16, body: String) {
    self.status_code = status.to_string();
    self.body = body;
    self.touch();
  }

  pub fn set_reviewed(&mut self, reviewed: bool) {
    self.reviewed = reviewed;
    self.touch();
  }

  /// Advance `modified_at`; strictly monotonic even when the clock is
  /// coarser than two consecutive mutations.
  fn touch(&mut self) {
    let floor = self.modified_at + Duration::microseconds(1);
    self.modified_at = Utc::now().max(floor);
  }
}

impl std::fmt::Display for Mention {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(&self.source)
  }
}
