//! Postgres-backed [`DocumentStore`]: one JSON row per document.
//!
//! Bodies are bound and read as text: a bound `serde_json::Value` is sent as
//! JSONB, which reorders object keys.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::{PgPool, Postgres, Transaction};

use crate::store::{ensure_objects, DocumentStore, RunSnapshot};
use crate::DbError;

#[derive(Debug, Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Delete every document of `collection`, then insert `documents` in order.
async fn replace_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    collection: &str,
    documents: &[Value],
) -> Result<(), DbError> {
    let deleted = sqlx::query("DELETE FROM documents WHERE collection = $1")
        .bind(collection)
        .execute(&mut **tx)
        .await?
        .rows_affected();

    for (position, document) in documents.iter().enumerate() {
        let position = i32::try_from(position).unwrap_or(i32::MAX);
        let body = serde_json::to_string(document)?;
        sqlx::query(
            "INSERT INTO documents (collection, position, body) VALUES ($1, $2, $3::json)",
        )
        .bind(collection)
        .bind(position)
        .bind(body)
        .execute(&mut **tx)
        .await?;
    }

    tracing::debug!(
        collection,
        deleted,
        inserted = documents.len(),
        "replaced collection"
    );
    Ok(())
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn replace_many(&self, collection: &str, documents: Vec<Value>) -> Result<(), DbError> {
        ensure_objects(collection, &documents)?;

        let mut tx = self.pool.begin().await?;
        replace_in_tx(&mut tx, collection, &documents).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn commit(&self, snapshot: RunSnapshot) -> Result<(), DbError> {
        snapshot.validate()?;

        let mut tx = self.pool.begin().await?;
        for (collection, documents) in snapshot.writes() {
            replace_in_tx(&mut tx, collection, documents).await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn fetch_all(&self, collection: &str) -> Result<Vec<Value>, DbError> {
        let rows = sqlx::query_scalar::<_, String>(
            "SELECT body::text FROM documents WHERE collection = $1 ORDER BY position",
        )
        .bind(collection)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|body| serde_json::from_str(body).map_err(DbError::from))
            .collect()
    }
}
