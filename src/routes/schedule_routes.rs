use axum::{
    extract::{Path, Query, State},
    middleware,
    routing::{delete, get, post, put},
    Extension, Json, Router,
};

use crate::dto::schedule_dto::{AvailabilityQuery, ScheduleForm, ShipmentView};
use crate::dto::ApiResponse;
use crate::middleware::auth::{transport_only_middleware, Session};
use crate::models::{Driver, NotificationKind, Order, Schedule, Vehicle};
use crate::services::{AvailabilityService, SchedulerService};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::AppJson;

pub fn create_schedule_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_schedules))
        .route("/", post(create_schedule))
        .route("/orders/ready", get(ready_orders))
        .route("/vehicles/available", get(available_vehicles))
        .route("/drivers-available", get(available_drivers))
        .route("/:id/update", put(update_schedule))
        .route("/:id", delete(delete_schedule))
        .route_layer(middleware::from_fn(transport_only_middleware))
}

async fn list_schedules(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ShipmentView>>>, AppError> {
    let schedules = SchedulerService::new(&state).list().await?;
    Ok(Json(ApiResponse::success(schedules)))
}

async fn create_schedule(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    AppJson(form): AppJson<ScheduleForm>,
) -> Result<Json<ApiResponse<Schedule>>, AppError> {
    let schedule = SchedulerService::new(&state).create(&form).await?;
    state
        .notifications
        .push(
            &session.user_id,
            NotificationKind::Success,
            format!("Shipment {} scheduled", schedule.shipment_id),
        )
        .await;
    Ok(Json(ApiResponse::success_with_message(
        schedule,
        "Schedule created successfully",
    )))
}

async fn update_schedule(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
    AppJson(form): AppJson<ScheduleForm>,
) -> Result<Json<ApiResponse<Schedule>>, AppError> {
    let schedule = SchedulerService::new(&state).update(&id, &form).await?;
    state
        .notifications
        .push(
            &session.user_id,
            NotificationKind::Info,
            format!("Shipment {} updated", schedule.shipment_id),
        )
        .await;
    Ok(Json(ApiResponse::success_with_message(
        schedule,
        "Schedule updated successfully",
    )))
}

async fn delete_schedule(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let schedule = SchedulerService::new(&state).delete(&id).await?;
    state
        .notifications
        .push(
            &session.user_id,
            NotificationKind::Info,
            format!("Shipment {} deleted", schedule.shipment_id),
        )
        .await;
    Ok(Json(ApiResponse::message_only("Schedule deleted successfully")))
}

async fn ready_orders(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Order>>>, AppError> {
    let orders = SchedulerService::new(&state).ready_orders().await?;
    Ok(Json(ApiResponse::success(orders)))
}

async fn available_vehicles(
    State(state): State<AppState>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<ApiResponse<Vec<Vehicle>>>, AppError> {
    let vehicles = AvailabilityService::new(&state).vehicles(&query).await?;
    if vehicles.is_empty() {
        return Ok(Json(ApiResponse::success_with_message(
            vehicles,
            "no available vehicles for this date",
        )));
    }
    Ok(Json(ApiResponse::success(vehicles)))
}

async fn available_drivers(
    State(state): State<AppState>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<ApiResponse<Vec<Driver>>>, AppError> {
    let drivers = AvailabilityService::new(&state).drivers(&query).await?;
    if drivers.is_empty() {
        return Ok(Json(ApiResponse::success_with_message(
            drivers,
            "no available drivers for this date",
        )));
    }
    Ok(Json(ApiResponse::success(drivers)))
}
