//! Source validation: does the page at `source` mention `target`?
//!
//! The check is a plain substring search for the literal target URL in the
//! fetched body. The same fetched body is what gets stored on the record.

use backlink_core::Error as CoreError;
use tracing::debug;
use url::Url;

use crate::{Result, fetch::Fetcher};

/// A source page that was fetched and references the target.
#[derive(Debug, Clone)]
pub struct Verified {
  pub status: u16,
  pub body:   String,
}

/// Parse `raw` as an absolute `http`/`https` URL with a host.
pub fn parse_http_url(param: &'static str, raw: &str) -> Result<Url, CoreError> {
  let invalid = || CoreError::InvalidUrl { param, url: raw.to_owned() };
  let url = Url::parse(raw).map_err(|_| invalid())?;
  if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
    return Err(invalid());
  }
  Ok(url)
}

/// Fetch `source` and confirm it contains `target`.
///
/// Fails with [`CoreError::SourceFetch`] on a non-2xx answer and with
/// [`CoreError::TargetNotFound`] when the body lacks the target text.
pub async fn validate_source(fetcher: &Fetcher, source: &Url, target: &str) -> Result<Verified> {
  let document = fetcher.get(source).await?;

  if !document.status.is_success() {
    debug!(%source, status = %document.status, "source fetch failed");
    return Err(CoreError::SourceFetch { status: document.status.as_u16() }.into());
  }

  if !document.body.contains(target) {
    debug!(%source, target, "source does not mention target");
    return Err(CoreError::TargetNotFound.into());
  }

  Ok(Verified {
    status: document.status.as_u16(),
    body:   document.body,
  })
}

#[cfg(test)]
mod tests {
  use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
  };

  use super::*;
  use crate::{Error, fetch::FetcherConfig};

  const TARGET: &str = "http://mysite.com";

  fn fetcher() -> Fetcher { Fetcher::new(&FetcherConfig::default()).unwrap() }

  async fn source_page(server: &MockServer, status: u16, body: &str) -> Url {
    Mock::given(method("GET"))
      .and(path("/post"))
      .respond_with(ResponseTemplate::new(status).set_body_string(body))
      .mount(server)
      .await;
    Url::parse(&format!("{}/post", server.uri())).unwrap()
  }

  #[tokio::test]
  async fn happy_path_returns_fetched_content() {
    let server = MockServer::start().await;
    let body = format!("<a href=\"{TARGET}\">{TARGET}</a>");
    let source = source_page(&server, 200, &body).await;

    let verified = validate_source(&fetcher(), &source, TARGET).await.unwrap();
    assert_eq!(verified.status, 200);
    assert_eq!(verified.body, body);
  }

  #[tokio::test]
  async fn unavailable_source() {
    let server = MockServer::start().await;
    let source = source_page(&server, 404, "gone").await;

    let err = validate_source(&fetcher(), &source, TARGET).await.unwrap_err();
    assert!(matches!(err, Error::Core(CoreError::SourceFetch { status: 404 })));
  }

  #[tokio::test]
  async fn source_without_target() {
    let server = MockServer::start().await;
    let source = source_page(&server, 200, "foo").await;

    let err = validate_source(&fetcher(), &source, TARGET).await.unwrap_err();
    assert!(matches!(err, Error::Core(CoreError::TargetNotFound)));
  }

  #[tokio::test]
  async fn any_2xx_is_success() {
    let server = MockServer::start().await;
    let source = source_page(&server, 203, &format!("see {TARGET}/")).await;

    let verified = validate_source(&fetcher(), &source, TARGET).await.unwrap();
    assert_eq!(verified.status, 203);
  }

  #[tokio::test]
  async fn unreachable_source_is_a_transport_error() {
    let source = Url::parse("http://127.0.0.1:1/post").unwrap();
    let err = validate_source(&fetcher(), &source, TARGET).await.unwrap_err();
    assert!(matches!(err, Error::Transport(_)));
  }

  #[test]
  fn url_shape_checks() {
    assert!(parse_http_url("source", "https://example.com/post").is_ok());
    assert!(parse_http_url("source", "http://example.com").is_ok());

    for bad in ["kaboom", "ftp://example.com/file", "javascript:alert(1)", "file:///etc/passwd"] {
      let err = parse_http_url("source", bad).unwrap_err();
      assert!(
        matches!(err, CoreError::InvalidUrl { param: "source", .. }),
        "{bad} should be rejected"
      );
    }
  }
}
