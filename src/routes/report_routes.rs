use axum::{extract::State, middleware, routing::get, Json, Router};

use crate::dto::report_dto::{MonthlyFuelReport, MonthlyShipmentReport};
use crate::dto::ApiResponse;
use crate::middleware::auth::reporting_only_middleware;
use crate::services::ReportService;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_report_router() -> Router<AppState> {
    Router::new()
        .route("/shipments/monthly", get(monthly_shipments))
        .route("/fuel/monthly", get(monthly_fuel))
        .route_layer(middleware::from_fn(reporting_only_middleware))
}

async fn monthly_shipments(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<MonthlyShipmentReport>>>, AppError> {
    let report = ReportService::new(&state).shipments_by_month().await?;
    Ok(Json(ApiResponse::success(report)))
}

async fn monthly_fuel(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<MonthlyFuelReport>>>, AppError> {
    let report = ReportService::new(&state).fuel_by_month().await?;
    Ok(Json(ApiResponse::success(report)))
}
