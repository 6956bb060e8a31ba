//! Handlers for `/send` endpoints: outbound webmentions on the operator's
//! behalf.

use axum::{
  Form, Json,
  extract::State,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use backlink_core::{mention::Mention, store::MentionStore};
use backlink_protocol::{SendOutcome, send, send_all, validate::parse_http_url};
use serde::{Deserialize, Serialize};

use crate::{AppState, error::ApiError};

// ─── Single ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SendForm {
  pub source: String,
  pub target: String,
}

/// `POST /send` — form `source=…&target=…`.
///
/// Returns the updated record, or `204 No Content` when the target
/// advertises no endpoint.
pub async fn single<S>(
  State(state): State<AppState<S>>,
  Form(form): Form<SendForm>,
) -> Result<Response, ApiError>
where
  S: MentionStore + 'static,
{
  parse_http_url("source", &form.source).map_err(|e| ApiError::BadRequest(e.to_string()))?;

  let mention = state
    .store
    .get(&form.source, &form.target)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .unwrap_or_else(|| Mention::new(form.source.as_str(), form.target.as_str()));

  match send(state.store.as_ref(), &state.fetcher, mention).await? {
    SendOutcome::Delivered { mention, .. } => Ok(Json(mention).into_response()),
    SendOutcome::NoEndpoint => Ok(StatusCode::NO_CONTENT.into_response()),
  }
}

// ─── Batch ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct BatchBody {
  /// URL of the page that `content` belongs to.
  pub source:  String,
  /// The page's HTML.
  pub content: String,
}

/// One attempted target of a batch send.
#[derive(Debug, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum BatchEntry {
  Delivered {
    target:   String,
    endpoint: String,
    mention:  Mention,
  },
  NoEndpoint {
    target: String,
  },
  Failed {
    target: String,
    error:  String,
  },
}

impl From<(String, backlink_protocol::Result<SendOutcome>)> for BatchEntry {
  fn from((target, outcome): (String, backlink_protocol::Result<SendOutcome>)) -> Self {
    match outcome {
      Ok(SendOutcome::Delivered { endpoint, mention }) => BatchEntry::Delivered {
        target,
        endpoint: endpoint.into(),
        mention,
      },
      Ok(SendOutcome::NoEndpoint) => BatchEntry::NoEndpoint { target },
      Err(e) => BatchEntry::Failed { target, error: e.to_string() },
    }
  }
}

/// `POST /send/batch` — body: `{"source":"…","content":"<html>…"}`
pub async fn batch<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<BatchBody>,
) -> Result<Json<Vec<BatchEntry>>, ApiError>
where
  S: MentionStore + 'static,
{
  let outcomes = send_all(state.store.as_ref(), &state.fetcher, &body.source, &body.content).await?;
  Ok(Json(outcomes.into_iter().map(BatchEntry::from).collect()))
}
