//! In-process [`DocumentStore`] for tests and dry runs.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use serde_json::Value;

use crate::store::{ensure_objects, DocumentStore, RunSnapshot};
use crate::DbError;

#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    collections: Mutex<HashMap<String, Vec<Value>>>,
}

impl MemoryDocumentStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of every collection written so far, sorted.
    #[must_use]
    pub fn collection_names(&self) -> Vec<String> {
        let guard = self
            .collections
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = guard.keys().cloned().collect();
        names.sort();
        names
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn replace_many(&self, collection: &str, documents: Vec<Value>) -> Result<(), DbError> {
        ensure_objects(collection, &documents)?;
        self.collections
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(collection.to_string(), documents);
        Ok(())
    }

    async fn commit(&self, snapshot: RunSnapshot) -> Result<(), DbError> {
        snapshot.validate()?;
        let mut guard = self
            .collections
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        for (collection, documents) in snapshot.into_writes() {
            guard.insert(collection, documents);
        }
        Ok(())
    }

    async fn fetch_all(&self, collection: &str) -> Result<Vec<Value>, DbError> {
        Ok(self
            .collections
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(collection)
            .cloned()
            .unwrap_or_default())
    }
}
