//! Contrato del almacén de documentos
//!
//! Cada entidad vive en una colección con nombre, indexada por una clave
//! string. El almacén trabaja con JSON crudo; la conversión tipada la hace
//! `Repository<T>`.

use async_trait::async_trait;
use serde_json::Value;

use crate::utils::errors::AppResult;

/// Colección de los contadores de `next_sequence`
pub const COUNTERS_COLLECTION: &str = "counters";

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Todos los documentos de la colección, en orden de inserción
    async fn list(&self, collection: &str) -> AppResult<Vec<Value>>;

    async fn get(&self, collection: &str, key: &str) -> AppResult<Option<Value>>;

    /// Inserta un documento nuevo. Devuelve `false` si la clave ya existe.
    async fn insert(&self, collection: &str, key: &str, document: Value) -> AppResult<bool>;

    /// Reemplaza un documento existente. Devuelve `false` si no existe.
    async fn replace(&self, collection: &str, key: &str, document: Value) -> AppResult<bool>;

    /// Devuelve `false` si no existía.
    async fn delete(&self, collection: &str, key: &str) -> AppResult<bool>;

    /// Incrementa de forma atómica el contador `name` y devuelve el nuevo
    /// valor (el primero es 1). Los contadores viven en la colección
    /// `counters` y nunca retroceden.
    async fn next_sequence(&self, name: &str) -> AppResult<u64>;

    /// Verificar que el almacén responde
    async fn ping(&self) -> AppResult<()>;
}
