use axum::{
    extract::State,
    middleware,
    routing::{get, post},
    Extension, Json, Router,
};

use crate::dto::quality_dto::CreateQualityCheckRequest;
use crate::dto::ApiResponse;
use crate::middleware::auth::{transport_only_middleware, Session};
use crate::models::{NotificationKind, QualityCheckLog, ShipmentCondition};
use crate::services::QualityService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::AppJson;

pub fn create_quality_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_quality_checks))
        .route("/", post(create_quality_check))
        .route_layer(middleware::from_fn(transport_only_middleware))
}

async fn list_quality_checks(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<QualityCheckLog>>>, AppError> {
    let checks = QualityService::new(&state).list().await?;
    Ok(Json(ApiResponse::success(checks)))
}

async fn create_quality_check(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    AppJson(request): AppJson<CreateQualityCheckRequest>,
) -> Result<Json<ApiResponse<QualityCheckLog>>, AppError> {
    let check = QualityService::new(&state)
        .create(&request, &session.user_id)
        .await?;

    let kind = match check.condition {
        ShipmentCondition::Intact => NotificationKind::Success,
        ShipmentCondition::Damaged => NotificationKind::Warning,
    };
    state
        .notifications
        .push(
            &session.user_id,
            kind,
            format!("Quality check logged for {}", check.shipment_id),
        )
        .await;

    Ok(Json(ApiResponse::success_with_message(
        check,
        "Quality check logged",
    )))
}
