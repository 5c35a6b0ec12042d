//! Live integration tests for newsdesk-db using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated Postgres database from the sqlx
//! test harness, so they need `DATABASE_URL` and are ignored by default:
//! `cargo test -p newsdesk-db -- --ignored`.

use newsdesk_db::{collections, DbError, DocumentStore, PgDocumentStore, RunSnapshot};
use serde_json::json;

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn replace_many_overwrites_the_whole_collection(pool: sqlx::PgPool) {
    let store = PgDocumentStore::new(pool);

    store
        .replace_many(
            collections::HEADLINES,
            vec![json!({ "title": "one" }), json!({ "title": "two" })],
        )
        .await
        .expect("first replace failed");
    store
        .replace_many(collections::HEADLINES, vec![json!({ "title": "three" })])
        .await
        .expect("second replace failed");

    let docs = store
        .fetch_all(collections::HEADLINES)
        .await
        .expect("fetch_all failed");
    assert_eq!(docs, vec![json!({ "title": "three" })]);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn fetch_all_keeps_insertion_order(pool: sqlx::PgPool) {
    let store = PgDocumentStore::new(pool);
    let docs: Vec<_> = (0..12).map(|i| json!({ "n": i })).collect();

    store
        .replace_many(collections::CATEGORISED, docs.clone())
        .await
        .expect("replace failed");

    assert_eq!(
        store.fetch_all(collections::CATEGORISED).await.unwrap(),
        docs
    );
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn commit_replaces_every_collection_in_one_transaction(pool: sqlx::PgPool) {
    let store = PgDocumentStore::new(pool);
    store
        .replace_one(collections::STATUS, json!({ "status": "stale" }))
        .await
        .unwrap();

    let snapshot = RunSnapshot::new()
        .one(collections::TOP_KEYWORDS, json!({ "oil": 3, "gas": 1 }))
        .many(collections::HEADLINES, vec![json!({ "title": "a" })])
        .many(collections::CATEGORISED, Vec::new())
        .one(collections::STATUS, json!({ "status": "ok" }));
    store.commit(snapshot).await.expect("commit failed");

    assert_eq!(
        store.fetch_all(collections::TOP_KEYWORDS).await.unwrap(),
        vec![json!({ "oil": 3, "gas": 1 })]
    );
    assert!(store
        .fetch_all(collections::CATEGORISED)
        .await
        .unwrap()
        .is_empty());
    assert_eq!(
        store.fetch_all(collections::STATUS).await.unwrap(),
        vec![json!({ "status": "ok" })]
    );
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn invalid_snapshot_leaves_store_untouched(pool: sqlx::PgPool) {
    let store = PgDocumentStore::new(pool);
    store
        .replace_one(collections::HEADLINES, json!({ "title": "kept" }))
        .await
        .unwrap();

    let snapshot = RunSnapshot::new()
        .many(collections::HEADLINES, Vec::new())
        .many(collections::CATEGORISED, vec![json!([1, 2, 3])]);
    let err = store.commit(snapshot).await.unwrap_err();

    assert!(matches!(err, DbError::NotAnObject { .. }), "got: {err:?}");
    assert_eq!(
        store.fetch_all(collections::HEADLINES).await.unwrap(),
        vec![json!({ "title": "kept" })]
    );
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn ping_succeeds_on_live_pool(pool: sqlx::PgPool) {
    newsdesk_db::ping(&pool).await.expect("ping failed");
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn fetch_all_keeps_object_key_order(pool: sqlx::PgPool) {
    let store = PgDocumentStore::new(pool);
    let snapshot = RunSnapshot::new()
        .one(collections::TOP_KEYWORDS, json!({ "markets": 3, "oil": 1, "gas": 1 }))
        .many(
            collections::HEADLINES,
            vec![json!({ "title": "Stocks rise", "description": "Markets up", "language": "en" })],
        );
    store.commit(snapshot).await.expect("commit failed");

    let top = store.fetch_all(collections::TOP_KEYWORDS).await.unwrap();
    let keys: Vec<&str> = top[0].as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["markets", "oil", "gas"]);

    let headlines = store.fetch_all(collections::HEADLINES).await.unwrap();
    let keys: Vec<&str> = headlines[0]
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys, vec!["title", "description", "language"]);
}
