//! Configuración de conexión a PostgreSQL
//!
//! Este módulo maneja la conexión a la base de datos y crea el esquema de
//! documentos si todavía no existe.

use anyhow::Result;
use sqlx::PgPool;
use tracing::info;

use crate::config::DatabaseConfig;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS documents (
    seq         BIGSERIAL,
    collection  TEXT        NOT NULL,
    key         TEXT        NOT NULL,
    body        JSONB       NOT NULL,
    created_at  TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at  TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    PRIMARY KEY (collection, key)
)
"#;

const SEQ_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS documents_collection_seq_idx ON documents (collection, seq)";

/// Conexión a la base de datos
#[derive(Clone)]
pub struct DatabaseConnection {
    pool: PgPool,
}

impl DatabaseConnection {
    /// Crear el pool de conexiones
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        info!("🔌 Conectando a {}", mask_database_url(&config.url));
        let pool = config.create_pool().await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Ejecutar migraciones de la base de datos
    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::query(SCHEMA).execute(&self.pool).await?;
        sqlx::query(SEQ_INDEX).execute(&self.pool).await?;
        info!("✅ Esquema de documentos listo");
        Ok(())
    }
}

/// Función helper para enmascarar la URL de la base de datos en logs
fn mask_database_url(url: &str) -> String {
    if let Some(at_pos) = url.find('@') {
        if url[..at_pos].rfind(':').is_some() {
            let protocol = &url[..url.find("://").map(|p| p + 3).unwrap_or(0)];
            let host = &url[at_pos + 1..];
            format!("{}***:***@{}", protocol, host)
        } else {
            url.to_string()
        }
    } else {
        url.to_string()
    }
}
