use axum::{
    extract::{Path, State},
    middleware,
    routing::{get, post, put},
    Extension, Json, Router,
};

use crate::dto::schedule_dto::{DelayRequest, LocationRequest, ShipmentUpdateRequest, ShipmentView};
use crate::dto::ApiResponse;
use crate::middleware::auth::{transport_only_middleware, Session};
use crate::models::{NotificationKind, ScheduleStatus, ShipmentAction};
use crate::services::ShipmentTracker;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::AppJson;

pub fn create_shipment_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_shipments))
        .route("/delivered", get(delivered_shipments))
        .route("/:id", put(update_shipment))
        .route("/:id/start", post(start_shipment))
        .route("/:id/delay", post(delay_shipment))
        .route("/:id/deliver", post(deliver_shipment))
        .route("/:id/location", put(update_location))
        .route_layer(middleware::from_fn(transport_only_middleware))
}

fn status_notification(status: ScheduleStatus) -> NotificationKind {
    match status {
        ScheduleStatus::Delayed => NotificationKind::Warning,
        ScheduleStatus::Delivered => NotificationKind::Success,
        _ => NotificationKind::Info,
    }
}

async fn notify_status(state: &AppState, session: &Session, view: &ShipmentView) {
    state
        .notifications
        .push(
            &session.user_id,
            status_notification(view.status),
            format!("Shipment {} is now {}", view.shipment_id, view.status),
        )
        .await;
}

async fn list_shipments(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ShipmentView>>>, AppError> {
    let shipments = ShipmentTracker::new(&state).list().await?;
    Ok(Json(ApiResponse::success(shipments)))
}

async fn delivered_shipments(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ShipmentView>>>, AppError> {
    let shipments = ShipmentTracker::new(&state).delivered().await?;
    Ok(Json(ApiResponse::success(shipments)))
}

async fn update_shipment(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
    AppJson(request): AppJson<ShipmentUpdateRequest>,
) -> Result<Json<ApiResponse<ShipmentView>>, AppError> {
    let update = ShipmentTracker::new(&state).update(&id, &request).await?;
    let changed = update.status_changed();
    let view = ShipmentView::from(update.schedule);
    if changed {
        notify_status(&state, &session, &view).await;
    }
    Ok(Json(ApiResponse::success_with_message(view, "Shipment updated")))
}

async fn perform(
    state: AppState,
    session: Session,
    id: String,
    action: ShipmentAction,
    reason: Option<String>,
) -> Result<Json<ApiResponse<ShipmentView>>, AppError> {
    let update = ShipmentTracker::new(&state)
        .perform(&id, action, reason.as_deref())
        .await?;
    let changed = update.status_changed();
    let view = ShipmentView::from(update.schedule);
    if changed {
        notify_status(&state, &session, &view).await;
    }
    Ok(Json(ApiResponse::success_with_message(
        view,
        "Shipment status updated",
    )))
}

async fn start_shipment(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ShipmentView>>, AppError> {
    perform(state, session, id, ShipmentAction::Start, None).await
}

async fn delay_shipment(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
    AppJson(request): AppJson<DelayRequest>,
) -> Result<Json<ApiResponse<ShipmentView>>, AppError> {
    perform(state, session, id, ShipmentAction::Delay, request.reason).await
}

async fn deliver_shipment(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ShipmentView>>, AppError> {
    perform(state, session, id, ShipmentAction::Deliver, None).await
}

async fn update_location(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
    AppJson(request): AppJson<LocationRequest>,
) -> Result<Json<ApiResponse<ShipmentView>>, AppError> {
    let view = ShipmentView::from(
        ShipmentTracker::new(&state)
            .update_location(&id, request.location.as_deref())
            .await?,
    );
    state
        .notifications
        .push(
            &session.user_id,
            NotificationKind::Info,
            format!("Shipment {} location set to {}", view.shipment_id, view.location),
        )
        .await;
    Ok(Json(ApiResponse::success_with_message(view, "Location updated")))
}
