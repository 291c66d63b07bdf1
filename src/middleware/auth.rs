//! Middleware de autenticación JWT
//!
//! Este módulo maneja la autenticación JWT: valida el bearer token, comprueba
//! que no esté revocado y que el usuario siga activo, e inyecta la `Session`
//! en las extensions de la request. Los guards de rol se montan por router.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
    Extension,
};
use chrono::{DateTime, TimeZone, Utc};

use crate::{
    models::{Role, User},
    state::AppState,
    utils::{
        errors::{AppError, AppResult},
        jwt::{extract_token_from_header, verify_token, JwtConfig},
    },
};

/// Roles que gestionan schedules, shipments, flota y calidad
pub const TRANSPORT_ROLES: &[Role] = &[Role::TransportManager, Role::SystemManager];
/// Roles con acceso a los reportes
pub const REPORTING_ROLES: &[Role] = &[
    Role::TransportManager,
    Role::SystemManager,
    Role::InventoryManager,
];
/// Roles que cambian el estado de las órdenes
pub const ORDER_ROLES: &[Role] = &[Role::Csm, Role::SystemManager];
pub const ADMIN_ROLES: &[Role] = &[Role::SystemManager];

/// Identidad tipada de la request, derivada de un token válido y no revocado
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: String,
    pub email: String,
    pub role: Role,
    pub token_id: String,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn require_any(&self, roles: &[Role]) -> AppResult<()> {
        if roles.contains(&self.role) {
            return Ok(());
        }
        Err(AppError::Forbidden(format!(
            "Role '{}' is not allowed to perform this action",
            self.role
        )))
    }
}

/// Resuelve la sesión a partir del header `Authorization`
pub async fn resolve_session(state: &AppState, auth_header: Option<&str>) -> AppResult<Session> {
    let auth_header = auth_header
        .ok_or_else(|| AppError::Unauthorized("Authorization token is required".to_string()))?;
    let token = extract_token_from_header(auth_header)?;
    let claims = verify_token(token, &JwtConfig::from(&state.config))?;

    if state.is_token_revoked(&claims.jti).await {
        return Err(AppError::Unauthorized("Session has been closed".to_string()));
    }

    let user = state
        .repo::<User>()
        .find(&claims.sub)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))?;
    if !user.active {
        return Err(AppError::Unauthorized("User is inactive".to_string()));
    }

    let expires_at = Utc
        .timestamp_opt(claims.exp as i64, 0)
        .single()
        .ok_or_else(|| AppError::Unauthorized("Invalid token expiration".to_string()))?;

    Ok(Session {
        user_id: user.id,
        email: user.email,
        // El rol vigente es el del usuario, no el del token
        role: user.role,
        token_id: claims.jti,
        expires_at,
    })
}

/// Middleware de autenticación JWT
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let session = resolve_session(&state, auth_header).await?;
    tracing::debug!("🔐 Sesión de {} ({})", session.email, session.role);

    request.extensions_mut().insert(session);
    Ok(next.run(request).await)
}

/// Middleware para rutas de transporte (schedules, shipments, flota, calidad)
pub async fn transport_only_middleware(
    Extension(session): Extension<Session>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    session.require_any(TRANSPORT_ROLES)?;
    Ok(next.run(request).await)
}

/// Middleware para rutas de reportes
pub async fn reporting_only_middleware(
    Extension(session): Extension<Session>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    session.require_any(REPORTING_ROLES)?;
    Ok(next.run(request).await)
}

/// Middleware para verificar permisos de System Manager
pub async fn admin_only_middleware(
    Extension(session): Extension<Session>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    session.require_any(ADMIN_ROLES)?;
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(role: Role) -> Session {
        Session {
            user_id: "u1".to_string(),
            email: "user@crips.lk".to_string(),
            role,
            token_id: "t1".to_string(),
            expires_at: Utc::now(),
        }
    }

    #[test]
    fn test_role_sets() {
        assert!(session(Role::TransportManager).require_any(TRANSPORT_ROLES).is_ok());
        assert!(session(Role::InventoryManager).require_any(REPORTING_ROLES).is_ok());
        assert!(matches!(
            session(Role::InventoryManager).require_any(TRANSPORT_ROLES),
            Err(AppError::Forbidden(_))
        ));
        assert!(session(Role::Csm).require_any(ORDER_ROLES).is_ok());
        assert!(session(Role::Customer).require_any(ADMIN_ROLES).is_err());
    }
}
