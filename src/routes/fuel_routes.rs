use axum::{
    extract::{Path, Query, State},
    middleware,
    routing::{delete, get, post, put},
    Json, Router,
};

use crate::controllers::fuel_controller::FuelController;
use crate::dto::fleet_dto::{CreateFuelLogRequest, FuelQuery, UpdateFuelLogRequest, VehicleFuelSummary};
use crate::dto::ApiResponse;
use crate::middleware::auth::transport_only_middleware;
use crate::models::FuelLog;
use crate::services::ReportService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::AppJson;

pub fn create_fuel_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_fuel_logs))
        .route("/", post(create_fuel_log))
        .route("/summary", get(fuel_summary))
        .route("/:id", put(update_fuel_log))
        .route("/:id", delete(delete_fuel_log))
        .route_layer(middleware::from_fn(transport_only_middleware))
}

async fn list_fuel_logs(
    State(state): State<AppState>,
    Query(query): Query<FuelQuery>,
) -> Result<Json<ApiResponse<Vec<FuelLog>>>, AppError> {
    let logs = FuelController::new(&state).list(&query).await?;
    Ok(Json(ApiResponse::success(logs)))
}

async fn create_fuel_log(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateFuelLogRequest>,
) -> Result<Json<ApiResponse<FuelLog>>, AppError> {
    let response = FuelController::new(&state).create(request).await?;
    Ok(Json(response))
}

async fn update_fuel_log(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(request): AppJson<UpdateFuelLogRequest>,
) -> Result<Json<ApiResponse<FuelLog>>, AppError> {
    let response = FuelController::new(&state).update(&id, request).await?;
    Ok(Json(response))
}

async fn delete_fuel_log(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    FuelController::new(&state).delete(&id).await?;
    Ok(Json(ApiResponse::message_only("Fuel log deleted successfully")))
}

async fn fuel_summary(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<VehicleFuelSummary>>>, AppError> {
    let summary = ReportService::new(&state).fuel_by_vehicle().await?;
    Ok(Json(ApiResponse::success(summary)))
}
