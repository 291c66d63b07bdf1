//! Rutas de la API
//!
//! Cada área expone su `create_*_router()`; aquí se montan bajo `/api` y se
//! protege todo salvo el login y el health check.

pub mod auth_routes;
pub mod driver_routes;
pub mod fuel_routes;
pub mod notification_routes;
pub mod order_routes;
pub mod quality_routes;
pub mod report_routes;
pub mod schedule_routes;
pub mod shipment_routes;
pub mod vehicle_routes;

use axum::{extract::State, middleware, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::middleware::auth::auth_middleware;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_api_router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .nest("/schedules", schedule_routes::create_schedule_router())
        .nest("/shipments", shipment_routes::create_shipment_router())
        .nest("/quality", quality_routes::create_quality_router())
        .nest("/vehicles", vehicle_routes::create_vehicle_router())
        .nest("/drivers", driver_routes::create_driver_router())
        .nest("/fuel", fuel_routes::create_fuel_router())
        .nest("/reports", report_routes::create_report_router())
        .nest("/orders", order_routes::create_order_router())
        .nest("/notifications", notification_routes::create_notification_router())
        .nest("/users", auth_routes::user_routes())
        .merge(auth_routes::session_routes())
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/health", get(health_check))
        .merge(auth_routes::auth_routes())
        .merge(protected)
}

/// Health check: comprueba que el almacén responde
async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    state.store.ping().await?;
    Ok(Json(json!({
        "status": "ok",
        "environment": state.config.environment,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    })))
}
