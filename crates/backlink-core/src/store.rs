//! The `MentionStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g.
//! `backlink-store-sqlite`). The protocol and HTTP layers depend on this
//! abstraction, not on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::mention::Mention;

// ─── Query type ──────────────────────────────────────────────────────────────

/// Parameters for [`MentionStore::list`]. Unset fields do not filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MentionQuery {
  pub source:   Option<String>,
  pub target:   Option<String>,
  pub current:  Option<bool>,
  pub reviewed: Option<bool>,
  pub limit:    Option<usize>,
  pub offset:   Option<usize>,
}

impl MentionQuery {
  /// Reviewed, live mentions of `target` — what a page may display.
  pub fn displayable(target: impl Into<String>) -> Self {
    Self {
      target: Some(target.into()),
      current: Some(true),
      reviewed: Some(true),
      ..Self::default()
    }
  }

  /// Every record whose source is `source` — what a page has sent.
  pub fn sent_from(source: impl Into<String>) -> Self {
    Self { source: Some(source.into()), ..Self::default() }
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a mention store backend.
///
/// Implementations must enforce uniqueness of the (`source`, `target`) pair
/// and must never delete records.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait MentionStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Look up the record for a (source, target) pair.
  fn get<'a>(
    &'a self,
    source: &'a str,
    target: &'a str,
  ) -> impl Future<Output = Result<Option<Mention>, Self::Error>> + Send + 'a;

  /// Look up a record by its external id.
  fn get_by_id(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Mention>, Self::Error>> + Send + '_;

  /// Insert `mention`, or overwrite the record already stored for its pair.
  ///
  /// On conflict the stored `id` and `created_at` win; every other field is
  /// taken from `mention`. Returns the record as stored.
  fn upsert(
    &self,
    mention: Mention,
  ) -> impl Future<Output = Result<Mention, Self::Error>> + Send + '_;

  /// Records matching `query`, most recently modified first.
  fn list<'a>(
    &'a self,
    query: &'a MentionQuery,
  ) -> impl Future<Output = Result<Vec<Mention>, Self::Error>> + Send + 'a;

  /// Flip the operator review flag. Returns `None` if `id` is unknown.
  fn set_reviewed(
    &self,
    id: Uuid,
    reviewed: bool,
  ) -> impl Future<Output = Result<Option<Mention>, Self::Error>> + Send + '_;
}
