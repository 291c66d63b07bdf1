//! Almacén de documentos sobre PostgreSQL
//!
//! Todas las colecciones comparten la tabla `documents`; el cuerpo de cada
//! documento se guarda como JSONB.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;

use super::document_store::{DocumentStore, COUNTERS_COLLECTION};
use crate::utils::errors::AppResult;

pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn list(&self, collection: &str) -> AppResult<Vec<Value>> {
        let rows: Vec<(Value,)> = sqlx::query_as(
            "SELECT body FROM documents WHERE collection = $1 ORDER BY seq ASC",
        )
        .bind(collection)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(body,)| body).collect())
    }

    async fn get(&self, collection: &str, key: &str) -> AppResult<Option<Value>> {
        let row: Option<(Value,)> = sqlx::query_as(
            "SELECT body FROM documents WHERE collection = $1 AND key = $2",
        )
        .bind(collection)
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(body,)| body))
    }

    async fn insert(&self, collection: &str, key: &str, document: Value) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO documents (collection, key, body, created_at, updated_at)
            VALUES ($1, $2, $3, NOW(), NOW())
            ON CONFLICT (collection, key) DO NOTHING
            "#,
        )
        .bind(collection)
        .bind(key)
        .bind(document)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn replace(&self, collection: &str, key: &str, document: Value) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE documents
            SET body = $3, updated_at = NOW()
            WHERE collection = $1 AND key = $2
            "#,
        )
        .bind(collection)
        .bind(key)
        .bind(document)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn delete(&self, collection: &str, key: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND key = $2")
            .bind(collection)
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn next_sequence(&self, name: &str) -> AppResult<u64> {
        // El UPSERT bloquea la fila, dos llamadas concurrentes no comparten valor
        let value: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO documents (collection, key, body, created_at, updated_at)
            VALUES ($1, $2, jsonb_build_object('name', $2::text, 'value', 1), NOW(), NOW())
            ON CONFLICT (collection, key) DO UPDATE
            SET body = jsonb_set(
                    documents.body,
                    '{value}',
                    to_jsonb((documents.body->>'value')::bigint + 1)
                ),
                updated_at = NOW()
            RETURNING (body->>'value')::bigint
            "#,
        )
        .bind(COUNTERS_COLLECTION)
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(value as u64)
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
