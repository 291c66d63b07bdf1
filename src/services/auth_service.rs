//! Servicio de autenticación
//!
//! Login con email y contraseña (bcrypt), emisión del JWT de sesión, alta de
//! usuarios y creación del System Manager inicial.

use bcrypt::{hash, verify};
use chrono::{DateTime, TimeZone, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::EnvironmentConfig;
use crate::dto::auth_dto::{CreateUserRequest, LoginRequest, LoginResponse};
use crate::models::{Role, User, UserResponse};
use crate::repositories::Repository;
use crate::state::AppState;
use crate::utils::errors::{conflict_error, AppError, AppResult};
use crate::utils::jwt::{generate_token, JwtConfig};

pub struct AuthService {
    users: Repository<User>,
    jwt: JwtConfig,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(state: &AppState) -> Self {
        Self {
            users: state.repo(),
            jwt: JwtConfig::from(&state.config),
            bcrypt_cost: state.config.bcrypt_cost,
        }
    }

    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let email = email.trim();
        Ok(self
            .users
            .list()
            .await?
            .into_iter()
            .find(|u| u.email.eq_ignore_ascii_case(email)))
    }

    pub async fn login(&self, request: &LoginRequest) -> AppResult<LoginResponse> {
        let invalid = || AppError::Unauthorized("Invalid email or password".to_string());

        let user = self.find_by_email(&request.email).await?.ok_or_else(invalid)?;
        if !user.active {
            warn!("🚫 Login de usuario inactivo: {}", user.email);
            return Err(invalid());
        }

        let valid = verify(&request.password, &user.password_hash)
            .map_err(|e| AppError::Hash(e.to_string()))?;
        if !valid {
            return Err(invalid());
        }

        let (token, claims) =
            generate_token(&user.id, &user.email, user.role.as_str(), &self.jwt)?;
        let expires_at: DateTime<Utc> = Utc
            .timestamp_opt(claims.exp as i64, 0)
            .single()
            .ok_or_else(|| AppError::Internal("Invalid token expiration".to_string()))?;

        info!("🔑 Login de {} ({})", user.email, user.role);
        Ok(LoginResponse {
            token,
            expires_at,
            user: UserResponse::from(user),
        })
    }

    pub async fn create_user(&self, request: &CreateUserRequest) -> AppResult<User> {
        self.register(&request.name, &request.email, &request.password, request.role)
            .await
    }

    async fn register(&self, name: &str, email: &str, password: &str, role: Role) -> AppResult<User> {
        let email = email.trim().to_lowercase();
        if self.find_by_email(&email).await?.is_some() {
            return Err(conflict_error("User", "email", &email));
        }

        let password_hash =
            hash(password, self.bcrypt_cost).map_err(|e| AppError::Hash(e.to_string()))?;

        let user = User {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            email,
            password_hash,
            role,
            active: true,
            created_at: Utc::now(),
        };
        self.users.insert(&user).await?;
        info!("👤 Usuario creado: {} ({})", user.email, user.role);
        Ok(user)
    }

    /// Crea el System Manager inicial si hay credenciales y aún no existe
    pub async fn ensure_admin(&self, config: &EnvironmentConfig) -> AppResult<Option<User>> {
        let (Some(email), Some(password)) = (&config.admin_email, &config.admin_password) else {
            return Ok(None);
        };
        if self.find_by_email(email).await?.is_some() {
            return Ok(None);
        }
        self.register("System Manager", email, password, Role::SystemManager)
            .await
            .map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MemoryDocumentStore;
    use std::sync::Arc;

    fn state() -> AppState {
        let config = EnvironmentConfig {
            bcrypt_cost: 4,
            admin_email: Some("admin@crips.lk".to_string()),
            admin_password: Some("admin-password".to_string()),
            ..EnvironmentConfig::default()
        };
        AppState::new(Arc::new(MemoryDocumentStore::new()), config)
    }

    #[tokio::test]
    async fn test_ensure_admin_runs_once() {
        let state = state();
        let auth = AuthService::new(&state);
        assert!(auth.ensure_admin(&state.config).await.unwrap().is_some());
        assert!(auth.ensure_admin(&state.config).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_login_success_and_failure() {
        let state = state();
        let auth = AuthService::new(&state);
        auth.ensure_admin(&state.config).await.unwrap();

        let ok = auth
            .login(&LoginRequest {
                email: "ADMIN@crips.lk".to_string(),
                password: "admin-password".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(ok.user.role, Role::SystemManager);
        assert!(!ok.token.is_empty());

        let err = auth
            .login(&LoginRequest {
                email: "admin@crips.lk".to_string(),
                password: "wrong-password".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(ref m) if m == "Invalid email or password"));
    }

    #[tokio::test]
    async fn test_duplicate_email_is_a_conflict() {
        let state = state();
        let auth = AuthService::new(&state);
        let request = CreateUserRequest {
            name: "Kamal Silva".to_string(),
            email: "kamal@crips.lk".to_string(),
            password: "transport-pass".to_string(),
            role: Role::TransportManager,
        };
        auth.create_user(&request).await.unwrap();
        assert!(matches!(
            auth.create_user(&request).await.unwrap_err(),
            AppError::Conflict(_)
        ));
    }
}
