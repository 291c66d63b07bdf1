//! Almacén de documentos en memoria
//!
//! Usado por los tests de integración y para levantar el servidor sin
//! PostgreSQL (`STORE=memory`).

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::document_store::{DocumentStore, COUNTERS_COLLECTION};
use crate::utils::errors::AppResult;

#[derive(Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<String, Vec<(String, Value)>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn list(&self, collection: &str) -> AppResult<Vec<Value>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|docs| docs.iter().map(|(_, doc)| doc.clone()).collect())
            .unwrap_or_default())
    }

    async fn get(&self, collection: &str, key: &str) -> AppResult<Option<Value>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|(k, _)| k == key))
            .map(|(_, doc)| doc.clone()))
    }

    async fn insert(&self, collection: &str, key: &str, document: Value) -> AppResult<bool> {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();
        if docs.iter().any(|(k, _)| k == key) {
            return Ok(false);
        }
        docs.push((key.to_string(), document));
        Ok(true)
    }

    async fn replace(&self, collection: &str, key: &str, document: Value) -> AppResult<bool> {
        let mut collections = self.collections.write().await;
        let slot = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|(k, _)| k == key));
        match slot {
            Some((_, existing)) => {
                *existing = document;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, collection: &str, key: &str) -> AppResult<bool> {
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(false);
        };
        let before = docs.len();
        docs.retain(|(k, _)| k != key);
        Ok(docs.len() != before)
    }

    async fn next_sequence(&self, name: &str) -> AppResult<u64> {
        let mut collections = self.collections.write().await;
        let counters = collections
            .entry(COUNTERS_COLLECTION.to_string())
            .or_default();

        match counters.iter_mut().find(|(k, _)| k == name) {
            Some((_, counter)) => {
                let next = counter["value"].as_u64().unwrap_or(0) + 1;
                *counter = json!({ "name": name, "value": next });
                Ok(next)
            }
            None => {
                counters.push((name.to_string(), json!({ "name": name, "value": 1 })));
                Ok(1)
            }
        }
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}
