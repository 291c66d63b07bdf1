use axum::{
    extract::{Path, State},
    routing::{delete, get},
    Extension, Json, Router,
};
use serde_json::{json, Value};

use crate::dto::ApiResponse;
use crate::middleware::auth::Session;
use crate::models::Notification;
use crate::state::AppState;
use crate::utils::errors::{not_found_error, AppError};

pub fn create_notification_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_notifications))
        .route("/", delete(clear_notifications))
        .route("/:id", delete(dismiss_notification))
}

async fn list_notifications(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Json<ApiResponse<Vec<Notification>>> {
    Json(ApiResponse::success(
        state.notifications.list(&session.user_id).await,
    ))
}

async fn dismiss_notification(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    if !state.notifications.dismiss(&session.user_id, &id).await {
        return Err(not_found_error("Notification", &id));
    }
    Ok(Json(ApiResponse::message_only("Notification dismissed")))
}

async fn clear_notifications(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Json<ApiResponse<Value>> {
    let cleared = state.notifications.clear(&session.user_id).await;
    Json(ApiResponse::success(json!({ "cleared": cleared })))
}
