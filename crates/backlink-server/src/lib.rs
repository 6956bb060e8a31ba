//! The backlink server: public webmention endpoint plus the operator API.
//!
//! Wires a [`MentionStore`], the site's [`RouteTable`] and a [`Fetcher`]
//! into the routers from `backlink-api`, guarding `/api` with HTTP Basic
//! auth.

pub mod auth;
pub mod error;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{Router, middleware, routing::get};
use backlink_api::AppState;
use backlink_core::store::MentionStore;
use backlink_protocol::{FetcherConfig, RouteTable};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use auth::{AuthConfig, require_auth};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `backlink.toml` and
/// `BACKLINK_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:               String,
  pub port:               u16,
  pub store_path:         PathBuf,
  pub auth_username:      String,
  pub auth_password_hash: String,
  /// Route patterns served by the site, e.g. `/blog/{slug}`.
  #[serde(default)]
  pub routes:             Vec<String>,
  /// Flat pages served by the site, e.g. `/about/`.
  #[serde(default)]
  pub pages:              Vec<String>,
  pub user_agent:         Option<String>,
  pub max_redirects:      Option<usize>,
  pub timeout_secs:       Option<u64>,
}

impl ServerConfig {
  pub fn route_table(&self) -> RouteTable { RouteTable::new(&self.routes, &self.pages) }

  pub fn fetcher_config(&self) -> FetcherConfig {
    let defaults = FetcherConfig::default();
    FetcherConfig {
      user_agent: self.user_agent.clone().unwrap_or(defaults.user_agent),
      max_redirects: self.max_redirects.unwrap_or(defaults.max_redirects),
      timeout_secs: self.timeout_secs.unwrap_or(defaults.timeout_secs),
      ..defaults
    }
  }

  pub fn auth_config(&self) -> AuthConfig {
    AuthConfig {
      username:      self.auth_username.clone(),
      password_hash: self.auth_password_hash.clone(),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the complete application router.
pub fn router<S>(state: AppState<S>, auth: Arc<AuthConfig>) -> Router
where
  S: MentionStore + 'static,
{
  let api = backlink_api::api_router(state.clone())
    .layer(middleware::from_fn_with_state(auth, require_auth));

  Router::new()
    .route("/health", get(health))
    .merge(backlink_api::receive_router(state))
    .nest("/api", api)
    .layer(TraceLayer::new_for_http())
}

async fn health() -> &'static str { "ok" }
