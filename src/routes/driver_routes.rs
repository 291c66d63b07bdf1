use axum::{
    extract::{Path, State},
    middleware,
    routing::{delete, get, post, put},
    Json, Router,
};

use crate::controllers::driver_controller::DriverController;
use crate::dto::fleet_dto::{CreateDriverRequest, UpdateDriverRequest};
use crate::dto::ApiResponse;
use crate::middleware::auth::transport_only_middleware;
use crate::models::Driver;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::AppJson;

pub fn create_driver_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_driver))
        .route("/", get(list_drivers))
        .route("/:id", get(get_driver))
        .route("/:id", put(update_driver))
        .route("/:id", delete(delete_driver))
        .route_layer(middleware::from_fn(transport_only_middleware))
}

async fn create_driver(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateDriverRequest>,
) -> Result<Json<ApiResponse<Driver>>, AppError> {
    let response = DriverController::new(&state).create(request).await?;
    Ok(Json(response))
}

async fn get_driver(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Driver>>, AppError> {
    let driver = DriverController::new(&state).get_by_id(&id).await?;
    Ok(Json(ApiResponse::success(driver)))
}

async fn list_drivers(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Driver>>>, AppError> {
    let drivers = DriverController::new(&state).list().await?;
    Ok(Json(ApiResponse::success(drivers)))
}

async fn update_driver(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(request): AppJson<UpdateDriverRequest>,
) -> Result<Json<ApiResponse<Driver>>, AppError> {
    let response = DriverController::new(&state).update(&id, request).await?;
    Ok(Json(response))
}

async fn delete_driver(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    DriverController::new(&state).delete(&id).await?;
    Ok(Json(ApiResponse::message_only("Driver deleted successfully")))
}
