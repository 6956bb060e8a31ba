//! [`SqliteStore`] — the SQLite implementation of [`MentionStore`].

use std::path::Path;

use backlink_core::{
  mention::Mention,
  store::{MentionQuery, MentionStore},
};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use crate::{
  Result,
  encode::{MENTION_COLUMNS, RawMention, encode_dt, encode_uuid},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A mention store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── MentionStore impl ───────────────────────────────────────────────────────

impl MentionStore for SqliteStore {
  type Error = crate::Error;

  async fn get(&self, source: &str, target: &str) -> Result<Option<Mention>> {
    let source = source.to_owned();
    let target = target.to_owned();

    let raw: Option<RawMention> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!(
              "SELECT {MENTION_COLUMNS} FROM mentions WHERE source = ?1 AND target = ?2"
            ),
            rusqlite::params![source, target],
            RawMention::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawMention::into_mention).transpose()
  }

  async fn get_by_id(&self, id: Uuid) -> Result<Option<Mention>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawMention> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {MENTION_COLUMNS} FROM mentions WHERE mention_id = ?1"),
            rusqlite::params![id_str],
            RawMention::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawMention::into_mention).transpose()
  }

  async fn upsert(&self, mention: Mention) -> Result<Mention> {
    let id_str          = encode_uuid(mention.id);
    let created_at_str  = encode_dt(mention.created_at);
    let modified_at_str = encode_dt(mention.modified_at);
    let Mention { source, target, status_code, body, current, reviewed, .. } = mention;

    // A conflicting row keeps its id, created_at and review flag; the pair
    // is the identity, so concurrent writers converge on one record. The
    // review flag is only written by `set_reviewed`.
    let raw: RawMention = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          &format!(
            "INSERT INTO mentions (
               mention_id, source, target, status_code, body,
               current, reviewed, created_at, modified_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
             ON CONFLICT (source, target) DO UPDATE SET
               status_code = excluded.status_code,
               body        = excluded.body,
               current     = excluded.current,
               modified_at = max(mentions.modified_at, excluded.modified_at)
             RETURNING {MENTION_COLUMNS}"
          ),
          rusqlite::params![
            id_str,
            source,
            target,
            status_code,
            body,
            current,
            reviewed,
            created_at_str,
            modified_at_str,
          ],
          RawMention::from_row,
        )?)
      })
      .await?;

    raw.into_mention()
  }

  async fn list(&self, query: &MentionQuery) -> Result<Vec<Mention>> {
    let source     = query.source.clone();
    let target     = query.target.clone();
    let current    = query.current;
    let reviewed   = query.reviewed;
    // SQLite treats a negative LIMIT as "no limit".
    let limit_val  = query.limit.map_or(-1, |l| l as i64);
    let offset_val = query.offset.unwrap_or(0) as i64;

    let raws: Vec<RawMention> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {MENTION_COLUMNS}
           FROM mentions
           WHERE (?1 IS NULL OR source   = ?1)
             AND (?2 IS NULL OR target   = ?2)
             AND (?3 IS NULL OR current  = ?3)
             AND (?4 IS NULL OR reviewed = ?4)
           ORDER BY modified_at DESC
           LIMIT ?5 OFFSET ?6"
        ))?;

        let rows = stmt
          .query_map(
            rusqlite::params![source, target, current, reviewed, limit_val, offset_val],
            RawMention::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawMention::into_mention).collect()
  }

  async fn set_reviewed(&self, id: Uuid, reviewed: bool) -> Result<Option<Mention>> {
    let id_str = encode_uuid(id);

    // Read and write inside one call so nothing lands in between; only the
    // flag and modified_at change.
    let raw: Option<RawMention> = self
      .conn
      .call(move |conn| {
        let existing = conn
          .query_row(
            &format!("SELECT {MENTION_COLUMNS} FROM mentions WHERE mention_id = ?1"),
            rusqlite::params![id_str],
            RawMention::from_row,
          )
          .optional()?;
        let Some(existing) = existing else {
          return Ok(None);
        };

        let mut mention = existing
          .into_mention()
          .map_err(|e| tokio_rusqlite::Error::Other(Box::new(e)))?;
        mention.set_reviewed(reviewed);

        Ok(Some(conn.query_row(
          &format!(
            "UPDATE mentions SET reviewed = ?2, modified_at = ?3
             WHERE mention_id = ?1
             RETURNING {MENTION_COLUMNS}"
          ),
          rusqlite::params![id_str, mention.reviewed, encode_dt(mention.modified_at)],
          RawMention::from_row,
        )?))
      })
      .await?;

    raw.map(RawMention::into_mention).transpose()
  }
}
