//! Webmention endpoint discovery.
//!
//! Precedence, first match wins:
//!
//! 1. `Link` headers of a `HEAD` response;
//! 2. `<link>`/`<a>` elements of the `GET` response, in document order;
//! 3. the target itself, when only `href`-less `rel=webmention` elements
//!    exist.
//!
//! Relative references resolve against the URL the response was actually
//! served from, after redirects.

use backlink_core::Error as CoreError;
use backlink_discovery::{Candidate, find_in_html, find_in_link_headers};
use reqwest::header::LINK;
use tracing::debug;
use url::Url;

use crate::{Result, fetch::Fetcher};

/// Determine the webmention endpoint for `target`.
///
/// Fails with [`CoreError::EndpointNotFound`] when neither the headers nor
/// the document advertise one.
pub async fn resolve_endpoint(fetcher: &Fetcher, target: &Url) -> Result<Url> {
  let head = fetcher.head(target).await?;
  let header_values = head
    .headers
    .get_all(LINK)
    .iter()
    .filter_map(|value| value.to_str().ok());

  if let Some(uri) = find_in_link_headers(header_values) {
    let endpoint = head.final_url.join(&uri)?;
    debug!(%target, %endpoint, "endpoint advertised in Link header");
    return Ok(endpoint);
  }
  debug!(%target, status = %head.status, "no webmention Link header, reading document");

  let document = fetcher.get(target).await?;
  let endpoint = match find_in_html(&document.body) {
    Some(Candidate::Href(href)) => document.final_url.join(&href)?,
    Some(Candidate::SelfReference) => target.clone(),
    None => {
      debug!(%target, status = %document.status, "no webmention endpoint advertised");
      return Err(CoreError::EndpointNotFound.into());
    }
  };

  debug!(%target, %endpoint, final_url = %document.final_url, "endpoint advertised in HTML");
  Ok(endpoint)
}
