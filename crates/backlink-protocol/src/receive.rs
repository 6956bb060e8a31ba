//! The receiving side: turn an inbound `(source, target)` notification into
//! a verified or invalidated [`Mention`].
//!
//! ```text
//!   (absent) ──► pending ──► validate ──┬─► current      → Accepted
//!                                       ├─► invalidated  → Rejected
//!                                       └─► (unchanged)  → Err
//! ```
//!
//! Notifications for the same pair converge on one record; repeating one
//! only advances `modified_at` and overwrites the fetched content.

use backlink_core::{
  Error as CoreError,
  local::{LocalTargets, is_local_resource},
  mention::Mention,
  store::MentionStore,
};
use tracing::{info, warn};

use crate::{
  Error, Result,
  fetch::Fetcher,
  validate::{parse_http_url, validate_source},
};

/// Body sent back for an accepted notification.
pub const RECEIVED: &str = "The webmention was successfully received";

/// Rejection for a request that lacks either parameter.
pub const MISSING_PARAMS: &str = "webmention source and/or target not in request";

/// How a well-formed notification was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReceiveOutcome {
  /// The source references the target; the stored record is current.
  Accepted(Mention),
  /// A client-side problem. `mention` is the persisted record when the
  /// rejection came from validation, and `None` when nothing was touched.
  Rejected {
    message: String,
    mention: Option<Mention>,
  },
}

impl ReceiveOutcome {
  fn rejected(message: impl Into<String>) -> Self {
    Self::Rejected { message: message.into(), mention: None }
  }

  pub fn is_accepted(&self) -> bool { matches!(self, Self::Accepted(_)) }

  pub fn mention(&self) -> Option<&Mention> {
    match self {
      Self::Accepted(mention) => Some(mention),
      Self::Rejected { mention, .. } => mention.as_ref(),
    }
  }
}

fn present(value: Option<&str>) -> Option<&str> { value.filter(|v| !v.trim().is_empty()) }

/// Handle one inbound notification.
///
/// Store and transport failures come back as `Err` and leave the store
/// untouched; everything the sender can fix is a [`ReceiveOutcome::Rejected`].
pub async fn receive<S, L>(
  store: &S,
  local: &L,
  fetcher: &Fetcher,
  source: Option<&str>,
  target: Option<&str>,
) -> Result<ReceiveOutcome>
where
  S: MentionStore,
  L: LocalTargets + ?Sized,
{
  let (Some(source), Some(target)) = (present(source), present(target)) else {
    warn!("webmention missing source or target");
    return Ok(ReceiveOutcome::rejected(MISSING_PARAMS));
  };

  let source_url = match parse_http_url("source", source).and_then(|url| {
    parse_http_url("target", target)?;
    Ok(url)
  }) {
    Ok(url) => url,
    Err(e) => {
      warn!(source, target, error = %e, "webmention with malformed URL");
      return Ok(ReceiveOutcome::rejected(e.to_string()));
    }
  };

  if !is_local_resource(local, target) {
    warn!(source, target, "webmention for a target this site does not serve");
    return Ok(ReceiveOutcome::rejected(CoreError::LocalTargetInvalid.to_string()));
  }

  let mut mention = match store.get(source, target).await.map_err(Error::store)? {
    Some(existing) => existing,
    None => Mention::new(source, target),
  };

  match validate_source(fetcher, &source_url, target).await {
    Ok(verified) => {
      mention.record_verification(verified.status, verified.body);
      let stored = store.upsert(mention).await.map_err(Error::store)?;
      info!(id = %stored.id, source, target, "webmention received");
      Ok(ReceiveOutcome::Accepted(stored))
    }
    Err(Error::Core(e)) if e.invalidates() => {
      mention.invalidate();
      let stored = store.upsert(mention).await.map_err(Error::store)?;
      warn!(id = %stored.id, source, target, reason = %e, "webmention invalidated");
      Ok(ReceiveOutcome::Rejected {
        message: e.to_string(),
        mention: Some(stored),
      })
    }
    Err(e) => Err(e),
  }
}
