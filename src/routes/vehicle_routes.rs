use axum::{
    extract::{Path, State},
    middleware,
    routing::{delete, get, post, put},
    Json, Router,
};

use crate::controllers::vehicle_controller::VehicleController;
use crate::dto::fleet_dto::{CreateVehicleRequest, UpdateVehicleRequest};
use crate::dto::ApiResponse;
use crate::middleware::auth::transport_only_middleware;
use crate::models::Vehicle;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::AppJson;

pub fn create_vehicle_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_vehicle))
        .route("/", get(list_vehicles))
        .route("/:id", get(get_vehicle))
        .route("/:id", put(update_vehicle))
        .route("/:id", delete(delete_vehicle))
        .route_layer(middleware::from_fn(transport_only_middleware))
}

async fn create_vehicle(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateVehicleRequest>,
) -> Result<Json<ApiResponse<Vehicle>>, AppError> {
    let controller = VehicleController::new(&state);
    let response = controller.create(request).await?;
    Ok(Json(response))
}

async fn get_vehicle(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vehicle>>, AppError> {
    let controller = VehicleController::new(&state);
    let vehicle = controller.get_by_id(&id).await?;
    Ok(Json(ApiResponse::success(vehicle)))
}

async fn list_vehicles(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Vehicle>>>, AppError> {
    let controller = VehicleController::new(&state);
    let vehicles = controller.list().await?;
    Ok(Json(ApiResponse::success(vehicles)))
}

async fn update_vehicle(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(request): AppJson<UpdateVehicleRequest>,
) -> Result<Json<ApiResponse<Vehicle>>, AppError> {
    let controller = VehicleController::new(&state);
    let response = controller.update(&id, request).await?;
    Ok(Json(response))
}

async fn delete_vehicle(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = VehicleController::new(&state);
    controller.delete(&id).await?;
    Ok(Json(ApiResponse::message_only("Vehicle deleted successfully")))
}
