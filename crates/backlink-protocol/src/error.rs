//! Error type for `backlink-protocol`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Core(#[from] backlink_core::Error),

  #[error("transport error: {0}")]
  Transport(#[from] reqwest::Error),

  #[error("invalid URL: {0}")]
  Url(#[from] url::ParseError),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub(crate) fn store(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Store(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
