//! Encoding and decoding helpers between [`Mention`] and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings with full sub-second precision
//! so `modified_at` ordering survives a round trip. UUIDs are stored as
//! hyphenated lowercase strings.

use backlink_core::mention::Mention;
use chrono::{DateTime, SecondsFormat, Utc};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list shared by every `SELECT` and `RETURNING` clause; the order
/// matches [`RawMention::from_row`].
pub const MENTION_COLUMNS: &str = "mention_id, source, target, status_code, body, \
                                   current, reviewed, created_at, modified_at";

/// Raw values read directly from a `mentions` row.
pub struct RawMention {
  pub mention_id:  String,
  pub source:      String,
  pub target:      String,
  pub status_code: String,
  pub body:        String,
  pub current:     bool,
  pub reviewed:    bool,
  pub created_at:  String,
  pub modified_at: String,
}

impl RawMention {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      mention_id:  row.get(0)?,
      source:      row.get(1)?,
      target:      row.get(2)?,
      status_code: row.get(3)?,
      body:        row.get(4)?,
      current:     row.get(5)?,
      reviewed:    row.get(6)?,
      created_at:  row.get(7)?,
      modified_at: row.get(8)?,
    })
  }

  pub fn into_mention(self) -> Result<Mention> {
    Ok(Mention {
      id:          decode_uuid(&self.mention_id)?,
      source:      self.source,
      target:      self.target,
      status_code: self.status_code,
      body:        self.body,
      current:     self.current,
      reviewed:    self.reviewed,
      created_at:  decode_dt(&self.created_at)?,
      modified_at: decode_dt(&self.modified_at)?,
    })
  }
}
