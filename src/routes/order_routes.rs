use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Extension, Json, Router,
};

use crate::controllers::order_controller::OrderController;
use crate::dto::order_dto::{CreateOrderRequest, UpdateOrderStatusRequest};
use crate::dto::ApiResponse;
use crate::middleware::auth::{Session, ORDER_ROLES};
use crate::models::Order;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::AppJson;

/// Listado y alta abiertos a cualquier sesión; el cambio de estado es de CSM
pub fn create_order_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders))
        .route("/", post(create_order))
        .route("/:id/status", put(update_order_status))
}

async fn list_orders(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Order>>>, AppError> {
    let orders = OrderController::new(&state).list().await?;
    Ok(Json(ApiResponse::success(orders)))
}

async fn create_order(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateOrderRequest>,
) -> Result<Json<ApiResponse<Order>>, AppError> {
    let response = OrderController::new(&state).create(request).await?;
    Ok(Json(response))
}

async fn update_order_status(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
    AppJson(request): AppJson<UpdateOrderStatusRequest>,
) -> Result<Json<ApiResponse<Order>>, AppError> {
    session.require_any(ORDER_ROLES)?;
    let response = OrderController::new(&state).update_status(&id, request).await?;
    Ok(Json(response))
}
