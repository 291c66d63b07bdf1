//! Repositorios
//!
//! `Repository<T>` es el único CRUD del sistema: vehículos, conductores,
//! órdenes, schedules, registros de combustible, controles de calidad y
//! usuarios lo comparten. Cada entidad declara su colección con `Entity`.

pub mod document_store;
pub mod memory_store;
pub mod postgres_store;

pub use document_store::DocumentStore;
pub use memory_store::MemoryDocumentStore;
pub use postgres_store::PgDocumentStore;

use serde::{de::DeserializeOwned, Serialize};
use std::{marker::PhantomData, sync::Arc};

use crate::utils::errors::{conflict_error, not_found_error, AppError, AppResult};

/// Entidad persistible en una colección
pub trait Entity: Serialize + DeserializeOwned + Send + Sync {
    /// Nombre de la colección
    const COLLECTION: &'static str;
    /// Nombre legible usado en los mensajes de error
    const LABEL: &'static str;

    fn key(&self) -> &str;
}

pub struct Repository<T> {
    store: Arc<dyn DocumentStore>,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _entity: PhantomData,
        }
    }
}

impl<T: Entity> Repository<T> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    pub async fn list(&self) -> AppResult<Vec<T>> {
        self.store
            .list(T::COLLECTION)
            .await?
            .into_iter()
            .map(decode::<T>)
            .collect()
    }

    pub async fn find(&self, key: &str) -> AppResult<Option<T>> {
        self.store
            .get(T::COLLECTION, key)
            .await?
            .map(decode::<T>)
            .transpose()
    }

    /// Como `find`, pero un documento ausente es `NotFound`
    pub async fn get(&self, key: &str) -> AppResult<T> {
        self.find(key)
            .await?
            .ok_or_else(|| not_found_error(T::LABEL, key))
    }

    pub async fn insert(&self, entity: &T) -> AppResult<()> {
        let inserted = self
            .store
            .insert(T::COLLECTION, entity.key(), encode(entity)?)
            .await?;
        if !inserted {
            return Err(conflict_error(T::LABEL, "id", entity.key()));
        }
        Ok(())
    }

    /// Reemplaza el documento completo (last write wins)
    pub async fn save(&self, entity: &T) -> AppResult<()> {
        let replaced = self
            .store
            .replace(T::COLLECTION, entity.key(), encode(entity)?)
            .await?;
        if !replaced {
            return Err(not_found_error(T::LABEL, entity.key()));
        }
        Ok(())
    }

    pub async fn delete(&self, key: &str) -> AppResult<()> {
        if !self.store.delete(T::COLLECTION, key).await? {
            return Err(not_found_error(T::LABEL, key));
        }
        Ok(())
    }
}

fn encode<T: Entity>(entity: &T) -> AppResult<serde_json::Value> {
    serde_json::to_value(entity)
        .map_err(|e| AppError::Internal(format!("Error encoding {}: {}", T::LABEL, e)))
}

fn decode<T: Entity>(document: serde_json::Value) -> AppResult<T> {
    serde_json::from_value(document)
        .map_err(|e| AppError::Internal(format!("Corrupt {} document: {}", T::LABEL, e)))
}
