//! HTTP surface for backlink.
//!
//! Two axum routers over any [`backlink_core::store::MentionStore`]:
//!
//! - [`receive_router`]: the public webmention endpoint;
//! - [`api_router`]: the operator JSON API (listing, review, sending).
//!
//! Auth, TLS, and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! Router::new()
//!   .merge(backlink_api::receive_router(state.clone()))
//!   .nest("/api", backlink_api::api_router(state))
//! ```

pub mod error;
pub mod mentions;
pub mod receive;
pub mod send;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use backlink_core::{local::LocalTargets, store::MentionStore};
use backlink_protocol::Fetcher;

pub use error::ApiError;

/// Shared state threaded through all handlers.
pub struct AppState<S> {
  pub store:   Arc<S>,
  /// Paths this site serves; consulted before accepting a notification.
  pub local:   Arc<dyn LocalTargets>,
  pub fetcher: Fetcher,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      store:   Arc::clone(&self.store),
      local:   Arc::clone(&self.local),
      fetcher: self.fetcher.clone(),
    }
  }
}

/// `POST /receive`.
pub fn receive_router<S>(state: AppState<S>) -> Router<()>
where
  S: MentionStore + 'static,
{
  Router::new()
    .route("/receive", post(receive::handler::<S>))
    .with_state(state)
}

/// The operator API. Nest it under a prefix and put auth in front of it.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: MentionStore + 'static,
{
  Router::new()
    // Mentions
    .route("/mentions", get(mentions::list::<S>))
    .route("/mentions/{id}", get(mentions::get_one::<S>))
    .route("/mentions/{id}/review", post(mentions::review::<S>))
    // Sending
    .route("/send", post(send::single::<S>))
    .route("/send/batch", post(send::batch::<S>))
    .with_state(state)
}
