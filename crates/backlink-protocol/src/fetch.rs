//! [`Fetcher`] — the outbound HTTP client used by every protocol.
//!
//! Follows redirects up to a small bound and applies connect and total
//! timeouts. Non-2xx answers are returned, not raised; only transport
//! failures (DNS, refused connections, timeouts, redirect loops) are errors.

use std::time::Duration;

use reqwest::{Client, StatusCode, header::HeaderMap, redirect::Policy};
use serde::Deserialize;
use url::Url;

use crate::Result;

/// Connection settings for outbound requests.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
  pub user_agent:           String,
  /// Redirect hops followed before giving up.
  pub max_redirects:        usize,
  pub connect_timeout_secs: u64,
  pub timeout_secs:         u64,
}

impl Default for FetcherConfig {
  fn default() -> Self {
    Self {
      user_agent:           concat!("backlink/", env!("CARGO_PKG_VERSION")).to_owned(),
      max_redirects:        5,
      connect_timeout_secs: 10,
      timeout_secs:         30,
    }
  }
}

/// Response to a `HEAD` request.
#[derive(Debug, Clone)]
pub struct Head {
  /// URL after redirects.
  pub final_url: Url,
  pub status:    StatusCode,
  pub headers:   HeaderMap,
}

/// Response to a `GET` request, body decoded as text.
#[derive(Debug, Clone)]
pub struct Document {
  /// URL after redirects; the base for relative references in `body`.
  pub final_url: Url,
  pub status:    StatusCode,
  pub body:      String,
}

/// Response to a form `POST`.
#[derive(Debug, Clone)]
pub struct Delivery {
  pub status: StatusCode,
  pub body:   String,
}

/// Async HTTP client for fetching sources and targets.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Debug, Clone)]
pub struct Fetcher {
  client: Client,
}

impl Fetcher {
  pub fn new(config: &FetcherConfig) -> Result<Self> {
    let client = Client::builder()
      .user_agent(config.user_agent.clone())
      .redirect(Policy::limited(config.max_redirects))
      .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
      .timeout(Duration::from_secs(config.timeout_secs))
      .build()?;
    Ok(Self { client })
  }

  pub async fn head(&self, url: &Url) -> Result<Head> {
    let resp = self.client.head(url.clone()).send().await?;
    Ok(Head {
      final_url: resp.url().clone(),
      status:    resp.status(),
      headers:   resp.headers().clone(),
    })
  }

  /// `GET url`. Bytes that are not valid UTF-8 are replaced, so the body
  /// is always storable as text.
  pub async fn get(&self, url: &Url) -> Result<Document> {
    let resp = self.client.get(url.clone()).send().await?;
    let final_url = resp.url().clone();
    let status = resp.status();
    let bytes = resp.bytes().await?;
    Ok(Document {
      final_url,
      status,
      body: String::from_utf8_lossy(&bytes).into_owned(),
    })
  }

  /// `POST url` with an `application/x-www-form-urlencoded` body.
  pub async fn post_form(&self, url: &Url, fields: &[(&str, &str)]) -> Result<Delivery> {
    let resp = self.client.post(url.clone()).form(fields).send().await?;
    let status = resp.status();
    let bytes = resp.bytes().await?;
    Ok(Delivery {
      status,
      body: String::from_utf8_lossy(&bytes).into_owned(),
    })
  }
}

#[cfg(test)]
mod tests {
  use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
  };

  use super::*;

  fn fetcher() -> Fetcher { Fetcher::new(&FetcherConfig::default()).unwrap() }

  #[tokio::test]
  async fn head_follows_redirects_and_keeps_status() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
      .and(path("/old"))
      .respond_with(ResponseTemplate::new(301).insert_header("Location", "/new"))
      .mount(&server)
      .await;
    Mock::given(method("HEAD"))
      .and(path("/new"))
      .respond_with(ResponseTemplate::new(404))
      .mount(&server)
      .await;

    let url = Url::parse(&format!("{}/old", server.uri())).unwrap();
    let head = fetcher().head(&url).await.unwrap();
    assert_eq!(head.status, StatusCode::NOT_FOUND);
    assert_eq!(head.final_url.path(), "/new");
  }

  #[tokio::test]
  async fn get_replaces_invalid_utf8() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/page"))
      .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ok \xff".to_vec()))
      .mount(&server)
      .await;

    let url = Url::parse(&format!("{}/page", server.uri())).unwrap();
    let document = fetcher().get(&url).await.unwrap();
    assert_eq!(document.status, StatusCode::OK);
    assert_eq!(document.body, "ok \u{fffd}");
  }
}
