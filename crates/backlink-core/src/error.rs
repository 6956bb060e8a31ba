//! Error taxonomy shared by every backlink crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The source did not answer with a successful status.
  #[error("Could not fetch source URL")]
  SourceFetch { status: u16 },

  /// The source was fetched but never mentions the target.
  #[error("Source URL did not contain target URL")]
  TargetNotFound,

  #[error("No webmention endpoint could be found for the target URL.")]
  EndpointNotFound,

  #[error("Target URL did not resolve to a resource on the server")]
  LocalTargetInvalid,

  #[error("Invalid URL for {param}: {url}")]
  InvalidUrl { param: &'static str, url: String },
}

impl Error {
  /// `true` for the failures the receive protocol turns into an
  /// invalidated record rather than a server error.
  pub fn invalidates(&self) -> bool {
    matches!(self, Self::SourceFetch { .. } | Self::TargetNotFound)
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
