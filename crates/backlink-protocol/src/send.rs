//! The sending side: announce that `source` links to `target`.
//!
//! The sender is a courier. Whatever the remote endpoint answers is stored
//! on the record; the remote status is never interpreted.

use std::collections::HashSet;

use backlink_core::{
  Error as CoreError,
  mention::Mention,
  store::{MentionQuery, MentionStore},
};
use backlink_discovery::webmention_links;
use tracing::{debug, info, warn};
use url::Url;

use crate::{Error, Result, fetch::Fetcher, resolve::resolve_endpoint, validate::parse_http_url};

/// Result of a single send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
  /// The endpoint was notified; `mention` holds its answer as stored.
  Delivered { endpoint: Url, mention: Mention },
  /// The target advertises no endpoint. Nothing was sent or stored.
  NoEndpoint,
}

/// Notify the endpoint of `mention.target` and store its answer.
pub async fn send<S: MentionStore>(
  store: &S,
  fetcher: &Fetcher,
  mut mention: Mention,
) -> Result<SendOutcome> {
  let target = parse_http_url("target", &mention.target)?;

  let endpoint = match resolve_endpoint(fetcher, &target).await {
    Ok(endpoint) => endpoint,
    Err(Error::Core(CoreError::EndpointNotFound)) => {
      debug!(source = %mention.source, %target, "target has no webmention endpoint");
      return Ok(SendOutcome::NoEndpoint);
    }
    Err(e) => return Err(e),
  };

  let delivery = fetcher
    .post_form(&endpoint, &[("source", mention.source.as_str()), ("target", mention.target.as_str())])
    .await?;

  mention.record_delivery(delivery.status.as_u16(), delivery.body);
  let mention = store.upsert(mention).await.map_err(Error::store)?;
  info!(
    id = %mention.id,
    source = %mention.source,
    target = %mention.target,
    %endpoint,
    status = %delivery.status,
    "webmention sent"
  );

  Ok(SendOutcome::Delivered { endpoint, mention })
}

/// Parsed and re-serialised form of `raw`, so `http://host` and
/// `http://host/` compare equal. Unparseable values compare as written.
fn comparison_key(raw: &str) -> String {
  Url::parse(raw).map(String::from).unwrap_or_else(|_| raw.to_owned())
}

/// Send a webmention for every `rel=webmention` link in `content` that has
/// not been sent from `source` before.
///
/// Targets are visited in document order. Absolute links are sent as
/// written; relative links resolve against `source`. Duplicates, links back
/// to `source` and targets already recorded for `source` are skipped, all
/// compared in parsed form. Each attempted target gets its own result, so
/// one failure does not stop the rest.
pub async fn send_all<S: MentionStore>(
  store: &S,
  fetcher: &Fetcher,
  source: &str,
  content: &str,
) -> Result<Vec<(String, Result<SendOutcome>)>> {
  let base = parse_http_url("source", source)?;
  let recorded: HashSet<String> = store
    .list(&MentionQuery::sent_from(source))
    .await
    .map_err(Error::store)?
    .iter()
    .map(|m| comparison_key(&m.target))
    .collect();
  let mut seen = HashSet::new();
  let mut outcomes = Vec::new();

  for href in webmention_links(content) {
    let url = match base.join(&href) {
      Ok(url) => url,
      Err(e) => {
        debug!(source, %href, error = %e, "skipping unresolvable link");
        continue;
      }
    };
    if url == base || !seen.insert(url.clone()) {
      continue;
    }
    if recorded.contains(url.as_str()) {
      debug!(source, target = %href, "already sent");
      continue;
    }

    let target = if Url::parse(&href).is_ok() { href } else { String::from(url) };
    let outcome = send(store, fetcher, Mention::new(source, target.as_str())).await;
    if let Err(e) = &outcome {
      warn!(source, target = %target, error = %e, "webmention send failed");
    }
    outcomes.push((target, outcome));
  }

  Ok(outcomes)
}
