//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::environment::EnvironmentConfig;
use crate::repositories::{DocumentStore, Entity, Repository};
use crate::services::notification_service::NotificationCenter;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub config: EnvironmentConfig,
    pub notifications: NotificationCenter,
    /// `jti` revocados en logout, con su expiración original
    pub revoked_tokens: Arc<RwLock<HashMap<String, DateTime<Utc>>>>,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, config: EnvironmentConfig) -> Self {
        Self {
            store,
            config,
            notifications: NotificationCenter::default(),
            revoked_tokens: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Repositorio tipado sobre el almacén compartido
    pub fn repo<T: Entity>(&self) -> Repository<T> {
        Repository::new(Arc::clone(&self.store))
    }

    /// Revocar un token hasta su expiración
    pub async fn revoke_token(&self, token_id: &str, expires_at: DateTime<Utc>) {
        let mut revoked = self.revoked_tokens.write().await;
        // Un token expirado ya no pasa la validación del JWT
        let now = Utc::now();
        revoked.retain(|_, exp| *exp > now);
        revoked.insert(token_id.to_string(), expires_at);
        tracing::debug!("🔒 Token revocado. Revocados activos: {}", revoked.len());
    }

    pub async fn is_token_revoked(&self, token_id: &str) -> bool {
        self.revoked_tokens.read().await.contains_key(token_id)
    }
}
