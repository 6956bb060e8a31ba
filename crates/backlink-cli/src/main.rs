//! `backlink` — operator command line for the backlink webmention service.
//!
//! # Usage
//!
//! ```text
//! backlink discover https://example.com/post
//! backlink send https://mysite.com/notes/1 https://example.com/post
//! backlink --url http://localhost:8080 --user alice --password secret list --reviewed false
//! backlink --config ~/.config/backlink/cli.toml review <id>
//! ```
//!
//! `discover` and `send` talk to the remote site directly; the other
//! commands go through the server's operator API.

mod client;

use anyhow::{Context, Result, bail};
use backlink_core::{mention::Mention, store::MentionQuery};
use backlink_protocol::{Fetcher, FetcherConfig, resolve_endpoint, validate::parse_http_url};
use clap::{Parser, Subcommand};
use client::{ApiClient, ApiConfig};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "backlink", about = "Send webmentions and review received ones")]
struct Args {
  /// Path to a TOML config file (url, username, password).
  #[arg(short, long, value_name = "FILE")]
  config: Option<std::path::PathBuf>,

  /// Base URL of the backlink server (default: http://localhost:8080).
  #[arg(long, env = "BACKLINK_URL")]
  url: Option<String>,

  /// API username.
  #[arg(long, env = "BACKLINK_USER")]
  user: Option<String>,

  /// API password (plaintext).
  #[arg(long, env = "BACKLINK_PASSWORD")]
  password: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Print the webmention endpoint advertised by a page.
  Discover { target: String },
  /// Notify `target` that `source` links to it.
  Send { source: String, target: String },
  /// List recorded mentions.
  List {
    #[arg(long)]
    source:   Option<String>,
    #[arg(long)]
    target:   Option<String>,
    #[arg(long)]
    current:  Option<bool>,
    #[arg(long)]
    reviewed: Option<bool>,
    #[arg(long, default_value_t = 50)]
    limit:    usize,
  },
  /// Show one mention, including the fetched body.
  Show { id: Uuid },
  /// Approve a mention for display.
  Review {
    id: Uuid,
    /// Withdraw approval instead.
    #[arg(long)]
    unset: bool,
  },
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url:      String,
  #[serde(default)]
  username: String,
  #[serde(default)]
  password: String,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let args = Args::parse();
  let api = api_config(&args)?;

  match args.command {
    Command::Discover { target } => discover(&target).await,
    Command::Send { source, target } => send_direct(&source, &target).await,
    Command::List { source, target, current, reviewed, limit } => {
      let query = MentionQuery {
        source,
        target,
        current,
        reviewed,
        limit: Some(limit),
        offset: None,
      };
      list(&ApiClient::new(api)?, &query).await
    }
    Command::Show { id } => show(&ApiClient::new(api)?, id).await,
    Command::Review { id, unset } => review(&ApiClient::new(api)?, id, !unset).await,
  }
}

/// CLI flags override config file, which overrides defaults.
fn api_config(args: &Args) -> Result<ApiConfig> {
  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  let pick = |flag: &Option<String>, file: &str| {
    flag.clone().or_else(|| (!file.is_empty()).then(|| file.to_owned()))
  };

  Ok(ApiConfig {
    base_url: pick(&args.url, &file_cfg.url).unwrap_or_else(|| "http://localhost:8080".to_string()),
    username: pick(&args.user, &file_cfg.username).unwrap_or_default(),
    password: pick(&args.password, &file_cfg.password).unwrap_or_default(),
  })
}

// ─── Direct commands ──────────────────────────────────────────────────────────

async fn discover(target: &str) -> Result<()> {
  let target = parse_http_url("target", target)?;
  let fetcher = Fetcher::new(&FetcherConfig::default())?;
  let endpoint = resolve_endpoint(&fetcher, &target).await?;
  println!("{endpoint}");
  Ok(())
}

async fn send_direct(source: &str, target: &str) -> Result<()> {
  parse_http_url("source", source)?;
  let target_url = parse_http_url("target", target)?;
  let fetcher = Fetcher::new(&FetcherConfig::default())?;

  let endpoint = resolve_endpoint(&fetcher, &target_url).await?;
  let delivery = fetcher
    .post_form(&endpoint, &[("source", source), ("target", target)])
    .await?;

  println!("{endpoint} → {}", delivery.status);
  if !delivery.body.is_empty() {
    println!("{}", delivery.body);
  }
  if !delivery.status.is_success() {
    bail!("endpoint answered {}", delivery.status);
  }
  Ok(())
}

// ─── API commands ─────────────────────────────────────────────────────────────

async fn list(client: &ApiClient, query: &MentionQuery) -> Result<()> {
  for mention in client.list_mentions(query).await? {
    println!("{}", summary(&mention));
  }
  Ok(())
}

async fn show(client: &ApiClient, id: Uuid) -> Result<()> {
  let Some(mention) = client.get_mention(id).await? else {
    bail!("no mention with id {id}");
  };
  println!("{}", summary(&mention));
  println!("status:   {}", mention.status_code);
  println!("created:  {}", mention.created_at);
  println!("modified: {}", mention.modified_at);
  println!();
  println!("{}", mention.body);
  Ok(())
}

async fn review(client: &ApiClient, id: Uuid, reviewed: bool) -> Result<()> {
  let mention = client.review(id, reviewed).await?;
  println!("{}", summary(&mention));
  Ok(())
}

/// One line per mention: id, live flag, review flag, and the link.
fn summary(m: &Mention) -> String {
  format!(
    "{}  {:<11}  {:<10}  {} → {}",
    m.id,
    if m.state().is_current() { "current" } else { "invalidated" },
    if m.reviewed { "reviewed" } else { "unreviewed" },
    m.source,
    m.target,
  )
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn summary_shows_lifecycle_state() {
    let mut m = Mention::new("http://a.example/post", "http://b.example/");
    assert!(summary(&m).contains("invalidated"));

    m.record_verification(200, "links to http://b.example/".into());
    let line = summary(&m);
    assert!(line.contains("current"), "{line}");
    assert!(!line.contains("invalidated"), "{line}");
    assert!(line.contains("http://a.example/post → http://b.example/"), "{line}");
  }
}
