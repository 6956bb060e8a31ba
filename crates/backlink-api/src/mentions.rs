//! Handlers for `/mentions` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/mentions` | Optional `source`, `target`, `current`, `reviewed`, `limit`, `offset` |
//! | `GET`  | `/mentions/{id}` | Single record; status lookup by id |
//! | `POST` | `/mentions/{id}/review` | Body: `{"reviewed":true}` |

use axum::{
  Json,
  extract::{Path, Query, State},
};
use backlink_core::{
  mention::Mention,
  store::{MentionQuery, MentionStore},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

/// Page size when the caller does not ask for one.
pub const DEFAULT_LIMIT: usize = 100;

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
  pub source:   Option<String>,
  pub target:   Option<String>,
  pub current:  Option<bool>,
  /// `true` for what may be displayed, `false` for the review queue.
  pub reviewed: Option<bool>,
  pub limit:    Option<usize>,
  pub offset:   Option<usize>,
}

impl From<ListParams> for MentionQuery {
  fn from(p: ListParams) -> Self {
    MentionQuery {
      source:   p.source,
      target:   p.target,
      current:  p.current,
      reviewed: p.reviewed,
      limit:    Some(p.limit.unwrap_or(DEFAULT_LIMIT)),
      offset:   p.offset,
    }
  }
}

/// `GET /mentions[?target=...][&reviewed=false][&limit=20]`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Mention>>, ApiError>
where
  S: MentionStore + 'static,
{
  let query = MentionQuery::from(params);
  let mentions = state
    .store
    .list(&query)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(mentions))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /mentions/{id}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Mention>, ApiError>
where
  S: MentionStore + 'static,
{
  let mention = state
    .store
    .get_by_id(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("mention {id} not found")))?;
  Ok(Json(mention))
}

// ─── Review ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ReviewBody {
  pub reviewed: bool,
}

/// `POST /mentions/{id}/review`
pub async fn review<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<ReviewBody>,
) -> Result<Json<Mention>, ApiError>
where
  S: MentionStore + 'static,
{
  let mention = state
    .store
    .set_reviewed(id, body.reviewed)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("mention {id} not found")))?;
  Ok(Json(mention))
}
