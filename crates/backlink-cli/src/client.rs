//! Async HTTP client wrapping the backlink operator API.

use anyhow::{Context, Result, anyhow};
use backlink_core::{mention::Mention, store::MentionQuery};
use reqwest::{Client, Response, StatusCode};
use serde_json::json;
use std::time::Duration;
use uuid::Uuid;

/// Connection settings for the backlink API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
  pub username: String,
  pub password: String,
}

/// Async HTTP client for the backlink operator API.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!(
      "{}/api{}",
      self.config.base_url.trim_end_matches('/'),
      path
    )
  }

  fn auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    if self.config.username.is_empty() {
      req
    } else {
      req.basic_auth(&self.config.username, Some(&self.config.password))
    }
  }

  // ── Mentions ──────────────────────────────────────────────────────────────

  /// `GET /api/mentions[?source=…][&target=…][&current=…][&reviewed=…]`
  pub async fn list_mentions(&self, query: &MentionQuery) -> Result<Vec<Mention>> {
    let mut params: Vec<(&str, String)> = Vec::new();
    if let Some(source) = &query.source {
      params.push(("source", source.clone()));
    }
    if let Some(target) = &query.target {
      params.push(("target", target.clone()));
    }
    if let Some(current) = query.current {
      params.push(("current", current.to_string()));
    }
    if let Some(reviewed) = query.reviewed {
      params.push(("reviewed", reviewed.to_string()));
    }
    if let Some(limit) = query.limit {
      params.push(("limit", limit.to_string()));
    }
    if let Some(offset) = query.offset {
      params.push(("offset", offset.to_string()));
    }

    let resp = self
      .auth(self.client.get(self.url("/mentions")))
      .query(&params)
      .send()
      .await
      .context("GET /mentions failed")?;

    let resp = check(resp, "GET /mentions").await?;
    resp.json().await.context("deserialising mentions")
  }

  /// `GET /api/mentions/{id}` — `None` when the server does not know `id`.
  pub async fn get_mention(&self, id: Uuid) -> Result<Option<Mention>> {
    let resp = self
      .auth(self.client.get(self.url(&format!("/mentions/{id}"))))
      .send()
      .await
      .context("GET /mentions/{id} failed")?;

    if resp.status() == StatusCode::NOT_FOUND {
      return Ok(None);
    }
    let resp = check(resp, "GET /mentions/{id}").await?;
    resp.json().await.map(Some).context("deserialising mention")
  }

  /// `POST /api/mentions/{id}/review`
  pub async fn review(&self, id: Uuid, reviewed: bool) -> Result<Mention> {
    let resp = self
      .auth(self.client.post(self.url(&format!("/mentions/{id}/review"))))
      .json(&json!({ "reviewed": reviewed }))
      .send()
      .await
      .context("POST /mentions/{id}/review failed")?;

    let resp = check(resp, "POST /mentions/{id}/review").await?;
    resp.json().await.context("deserialising mention")
  }
}

/// Turn a non-2xx response into an error carrying the server's message.
async fn check(resp: Response, what: &str) -> Result<Response> {
  let status = resp.status();
  if status.is_success() {
    return Ok(resp);
  }
  let message = resp
    .json::<serde_json::Value>()
    .await
    .ok()
    .and_then(|v| v["error"].as_str().map(str::to_owned))
    .unwrap_or_default();
  Err(anyhow!("{what} → {status} {message}"))
}

#[cfg(test)]
mod tests {
  use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header_exists, method, path, query_param},
  };

  use super::*;

  fn client(server: &MockServer) -> ApiClient {
    ApiClient::new(ApiConfig {
      base_url: format!("{}/", server.uri()),
      username: "user".into(),
      password: "secret".into(),
    })
    .unwrap()
  }

  fn mention() -> Mention {
    let mut m = Mention::new("http://example.com/reply", "http://mysite.com/post");
    m.record_verification(200, "http://mysite.com/post".into());
    m
  }

  #[tokio::test]
  async fn list_sends_filters_and_credentials() {
    let server = MockServer::start().await;
    let m = mention();
    Mock::given(method("GET"))
      .and(path("/api/mentions"))
      .and(query_param("reviewed", "false"))
      .and(query_param("target", "http://mysite.com/post"))
      .and(header_exists("authorization"))
      .respond_with(ResponseTemplate::new(200).set_body_json(vec![m.clone()]))
      .expect(1)
      .mount(&server)
      .await;

    let query = MentionQuery {
      target: Some("http://mysite.com/post".into()),
      reviewed: Some(false),
      ..MentionQuery::default()
    };
    let listed = client(&server).list_mentions(&query).await.unwrap();
    assert_eq!(listed, vec![m]);
  }

  #[tokio::test]
  async fn unknown_mention_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "error": "mention not found" })))
      .mount(&server)
      .await;

    let found = client(&server).get_mention(Uuid::new_v4()).await.unwrap();
    assert!(found.is_none());
  }

  #[tokio::test]
  async fn server_errors_carry_the_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
      .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "error": "disk full" })))
      .mount(&server)
      .await;

    let err = client(&server).review(Uuid::new_v4(), true).await.unwrap_err();
    assert!(err.to_string().contains("disk full"), "{err}");
  }
}
