//! Integration tests for `SqliteStore` against an in-memory database.

use backlink_core::{
  mention::Mention,
  store::{MentionQuery, MentionStore},
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

const SOURCE: &str = "http://example.com/reply";
const TARGET: &str = "http://mysite.com/article";

fn verified(source: &str, target: &str) -> Mention {
  let mut m = Mention::new(source, target);
  m.record_verification(200, format!("<a href=\"{target}\">ref</a>"));
  m
}

// ─── Lookup ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn upsert_and_get() {
  let s = store().await;

  let stored = s.upsert(verified(SOURCE, TARGET)).await.unwrap();
  assert_eq!(stored.status_code, "200");
  assert!(stored.current);

  let fetched = s.get(SOURCE, TARGET).await.unwrap().expect("stored");
  assert_eq!(fetched, stored);
}

#[tokio::test]
async fn get_missing_returns_none() {
  let s = store().await;
  assert!(s.get(SOURCE, TARGET).await.unwrap().is_none());
  assert!(s.get_by_id(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn get_by_id_finds_record() {
  let s = store().await;
  let stored = s.upsert(verified(SOURCE, TARGET)).await.unwrap();

  let fetched = s.get_by_id(stored.id).await.unwrap().expect("by id");
  assert_eq!(fetched.source, SOURCE);
  assert_eq!(fetched.target, TARGET);
}

#[tokio::test]
async fn pair_lookup_is_exact() {
  let s = store().await;
  s.upsert(verified(SOURCE, TARGET)).await.unwrap();

  assert!(s.get(SOURCE, "http://mysite.com/article/").await.unwrap().is_none());
  assert!(s.get(TARGET, SOURCE).await.unwrap().is_none());
}

// ─── Uniqueness ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn upsert_same_pair_keeps_one_record() {
  let s = store().await;
  let first = s.upsert(verified(SOURCE, TARGET)).await.unwrap();

  // A second, independently-created record for the same pair.
  let mut second = Mention::new(SOURCE, TARGET);
  second.record_verification(200, "newer body".into());
  let second = s.upsert(second).await.unwrap();

  assert_eq!(second.id, first.id, "stored id wins on conflict");
  assert_eq!(second.created_at, first.created_at);
  assert_eq!(second.body, "newer body");

  let all = s.list(&MentionQuery::default()).await.unwrap();
  assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn invalidation_is_persisted_not_deleted() {
  let s = store().await;
  let mut m = s.upsert(verified(SOURCE, TARGET)).await.unwrap();
  let before = m.modified_at;

  m.invalidate();
  let stored = s.upsert(m).await.unwrap();

  assert!(!stored.current);
  assert_eq!(stored.status_code, "200");
  assert!(stored.body.contains(TARGET));
  assert!(stored.modified_at > before);
  assert_eq!(s.list(&MentionQuery::default()).await.unwrap().len(), 1);
}

// ─── Listing ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_filters() {
  let s = store().await;
  s.upsert(verified("http://a.example/1", TARGET)).await.unwrap();
  s.upsert(verified("http://b.example/1", TARGET)).await.unwrap();
  s.upsert(verified("http://a.example/1", "http://mysite.com/other")).await.unwrap();

  let mut dead = Mention::new("http://c.example/1", TARGET);
  dead.invalidate();
  s.upsert(dead).await.unwrap();

  let for_target = s
    .list(&MentionQuery { target: Some(TARGET.into()), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(for_target.len(), 3);

  let live = s
    .list(&MentionQuery {
      target: Some(TARGET.into()),
      current: Some(true),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(live.len(), 2);

  let from_a = s.list(&MentionQuery::sent_from("http://a.example/1")).await.unwrap();
  assert_eq!(from_a.len(), 2);
  assert!(from_a.iter().all(|m| m.source == "http://a.example/1"));
}

#[tokio::test]
async fn displayable_requires_review() {
  let s = store().await;
  let a = s.upsert(verified("http://a.example/1", TARGET)).await.unwrap();
  s.upsert(verified("http://b.example/1", TARGET)).await.unwrap();

  assert!(s.list(&MentionQuery::displayable(TARGET)).await.unwrap().is_empty());

  let reviewed = s.set_reviewed(a.id, true).await.unwrap().expect("exists");
  assert!(reviewed.reviewed);
  assert!(reviewed.modified_at > a.modified_at);

  let shown = s.list(&MentionQuery::displayable(TARGET)).await.unwrap();
  assert_eq!(shown.len(), 1);
  assert_eq!(shown[0].id, a.id);
}

#[tokio::test]
async fn set_reviewed_unknown_id() {
  let s = store().await;
  assert!(s.set_reviewed(Uuid::new_v4(), true).await.unwrap().is_none());
}

#[tokio::test]
async fn review_survives_a_stale_write() {
  let s = store().await;
  let stale = s.upsert(verified(SOURCE, TARGET)).await.unwrap();

  // The operator approves while a receive still holds the old copy.
  s.set_reviewed(stale.id, true).await.unwrap().expect("exists");

  let mut reverified = stale.clone();
  reverified.record_verification(200, format!("updated {TARGET}"));
  let stored = s.upsert(reverified).await.unwrap();

  assert!(stored.reviewed, "review flag is not overwritten by a content write");
  assert_eq!(stored.body, format!("updated {TARGET}"));
}

#[tokio::test]
async fn review_leaves_content_alone() {
  let s = store().await;
  let first = s.upsert(verified(SOURCE, TARGET)).await.unwrap();

  let mut newer = first.clone();
  newer.record_verification(201, "newer body".into());
  let newer = s.upsert(newer).await.unwrap();

  let reviewed = s.set_reviewed(first.id, true).await.unwrap().expect("exists");
  assert_eq!(reviewed.body, "newer body");
  assert_eq!(reviewed.status_code, "201");
  assert!(reviewed.reviewed);
  assert!(reviewed.modified_at > newer.modified_at);
}

#[tokio::test]
async fn stale_write_never_moves_modified_at_backwards() {
  let s = store().await;
  let stale = s.upsert(verified(SOURCE, TARGET)).await.unwrap();
  let reviewed = s.set_reviewed(stale.id, true).await.unwrap().expect("exists");

  // Same content, older timestamp.
  let stored = s.upsert(stale).await.unwrap();
  assert_eq!(stored.modified_at, reviewed.modified_at);
}

#[tokio::test]
async fn list_orders_by_most_recent_modification() {
  let s = store().await;
  let a = s.upsert(verified("http://a.example/1", TARGET)).await.unwrap();
  s.upsert(verified("http://b.example/1", TARGET)).await.unwrap();
  s.set_reviewed(a.id, true).await.unwrap();

  let all = s.list(&MentionQuery::default()).await.unwrap();
  assert_eq!(all[0].id, a.id);
}

#[tokio::test]
async fn list_limit_and_offset() {
  let s = store().await;
  for i in 0..5 {
    s.upsert(verified(&format!("http://example.com/{i}"), TARGET))
      .await
      .unwrap();
  }

  let page = s
    .list(&MentionQuery { limit: Some(2), offset: Some(1), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(page.len(), 2);
  assert_eq!(page[0].source, "http://example.com/3");

  let unbounded = s.list(&MentionQuery::default()).await.unwrap();
  assert_eq!(unbounded.len(), 5);
}

#[tokio::test]
async fn reopening_file_store_keeps_records() {
  let dir = std::env::temp_dir().join(format!("backlink-{}", Uuid::new_v4()));
  std::fs::create_dir_all(&dir).unwrap();
  let path = dir.join("mentions.db");

  let id = {
    let s = SqliteStore::open(&path).await.unwrap();
    s.upsert(verified(SOURCE, TARGET)).await.unwrap().id
  };

  let s = SqliteStore::open(&path).await.unwrap();
  assert_eq!(s.get_by_id(id).await.unwrap().map(|m| m.source), Some(SOURCE.to_owned()));

  std::fs::remove_dir_all(&dir).ok();
}
