use axum::{
    extract::State,
    middleware,
    routing::{get, post},
    Extension, Json, Router,
};
use serde_json::{json, Value};
use validator::Validate;

use crate::dto::auth_dto::{CreateUserRequest, LoginRequest, LoginResponse};
use crate::dto::ApiResponse;
use crate::middleware::auth::{admin_only_middleware, Session};
use crate::models::UserResponse;
use crate::services::AuthService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::AppJson;

/// Rutas públicas de autenticación
pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/auth/login", post(login))
}

/// Rutas que requieren una sesión
pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(me))
}

/// Gestión de usuarios (System Manager)
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_user))
        .route_layer(middleware::from_fn(admin_only_middleware))
}

async fn login(
    State(state): State<AppState>,
    AppJson(request): AppJson<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, AppError> {
    request.validate()?;
    let response = AuthService::new(&state).login(&request).await?;
    Ok(Json(ApiResponse::success(response)))
}

async fn logout(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Json<ApiResponse<()>> {
    state
        .revoke_token(&session.token_id, session.expires_at)
        .await;
    tracing::info!("🚪 Logout de {}", session.email);
    Json(ApiResponse::message_only("Logged out"))
}

async fn me(Extension(session): Extension<Session>) -> Json<ApiResponse<Value>> {
    Json(ApiResponse::success(json!({
        "userId": session.user_id,
        "email": session.email,
        "role": session.role,
        "expiresAt": session.expires_at,
    })))
}

async fn create_user(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateUserRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    request.validate()?;
    let user = AuthService::new(&state).create_user(&request).await?;
    Ok(Json(ApiResponse::success_with_message(
        UserResponse::from(user),
        "User created successfully",
    )))
}
