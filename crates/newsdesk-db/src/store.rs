use async_trait::async_trait;
use serde_json::Value;

use crate::DbError;

/// Collection names written by a pipeline run.
pub mod collections {
    pub const TOP_KEYWORDS: &str = "top_keywords";
    pub const HEADLINES: &str = "headlines";
    pub const CATEGORISED: &str = "categorised";
    pub const STATUS: &str = "status";
}

/// Every collection written by one run, persisted together by
/// [`DocumentStore::commit`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSnapshot {
    writes: Vec<(String, Vec<Value>)>,
}

impl RunSnapshot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace `collection` with a single document.
    #[must_use]
    pub fn one(self, collection: &str, document: Value) -> Self {
        self.many(collection, vec![document])
    }

    /// Replace `collection` with `documents`, in order.
    #[must_use]
    pub fn many(mut self, collection: &str, documents: Vec<Value>) -> Self {
        self.writes.push((collection.to_string(), documents));
        self
    }

    pub fn writes(&self) -> impl Iterator<Item = (&str, &[Value])> {
        self.writes.iter().map(|(c, d)| (c.as_str(), d.as_slice()))
    }

    #[must_use]
    pub fn into_writes(self) -> Vec<(String, Vec<Value>)> {
        self.writes
    }

    /// Checks that every document is a JSON object.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::NotAnObject`] naming the first offending collection.
    pub fn validate(&self) -> Result<(), DbError> {
        for (collection, documents) in self.writes() {
            ensure_objects(collection, documents)?;
        }
        Ok(())
    }
}

pub(crate) fn ensure_objects(collection: &str, documents: &[Value]) -> Result<(), DbError> {
    if documents.iter().all(Value::is_object) {
        Ok(())
    } else {
        Err(DbError::NotAnObject {
            collection: collection.to_string(),
        })
    }
}

/// A store of named collections of JSON object documents.
///
/// Writes always replace: after a successful write the collection holds
/// exactly the documents written, none of the previous ones.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Replace `collection` with `documents`.
    async fn replace_many(&self, collection: &str, documents: Vec<Value>) -> Result<(), DbError>;

    /// Replace `collection` with a single document.
    async fn replace_one(&self, collection: &str, document: Value) -> Result<(), DbError> {
        self.replace_many(collection, vec![document]).await
    }

    /// Replace every collection in `snapshot` as one unit: either all of them
    /// change or none do.
    async fn commit(&self, snapshot: RunSnapshot) -> Result<(), DbError>;

    /// All documents of `collection` in insertion order.
    async fn fetch_all(&self, collection: &str) -> Result<Vec<Value>, DbError>;
}
