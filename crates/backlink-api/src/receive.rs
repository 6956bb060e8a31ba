//! `POST /receive`: the public webmention endpoint.
//!
//! Takes a form-encoded `source` and `target` and answers in plain text:
//! `200` when the mention is verified, `400` for anything the sender can fix,
//! `500` when the store or the network failed underneath us.

use axum::{
  Form,
  extract::{State, rejection::FormRejection},
  http::StatusCode,
};
use backlink_core::store::MentionStore;
use backlink_protocol::{
  ReceiveOutcome, receive,
  receive::RECEIVED,
};
use serde::Deserialize;
use tracing::error;

use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ReceiveForm {
  pub source: Option<String>,
  pub target: Option<String>,
}

/// `POST /receive` — form body `source=…&target=…`.
///
/// A body that is not a form at all is treated like one missing both fields.
pub async fn handler<S>(
  State(state): State<AppState<S>>,
  form: Result<Form<ReceiveForm>, FormRejection>,
) -> (StatusCode, String)
where
  S: MentionStore + 'static,
{
  let form = form.map(|Form(f)| f).unwrap_or_default();

  let outcome = receive(
    state.store.as_ref(),
    state.local.as_ref(),
    &state.fetcher,
    form.source.as_deref(),
    form.target.as_deref(),
  )
  .await;

  match outcome {
    Ok(ReceiveOutcome::Accepted(_)) => (StatusCode::OK, RECEIVED.to_owned()),
    Ok(ReceiveOutcome::Rejected { message, .. }) => (StatusCode::BAD_REQUEST, message),
    Err(e) => {
      error!(error = %e, source = ?form.source, target = ?form.target, "webmention receive failed");
      (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    }
  }
}
