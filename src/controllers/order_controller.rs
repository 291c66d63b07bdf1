use chrono::Utc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::order_dto::{CreateOrderRequest, UpdateOrderStatusRequest};
use crate::dto::ApiResponse;
use crate::models::{Order, OrderStatus, Schedule, ShippingInfo};
use crate::repositories::Repository;
use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::non_blank;

fn generate_order_id() -> String {
    let raw = Uuid::new_v4().simple().to_string();
    format!("ORD-{}", raw[..8].to_uppercase())
}

pub struct OrderController {
    repository: Repository<Order>,
    schedules: Repository<Schedule>,
}

impl OrderController {
    pub fn new(state: &AppState) -> Self {
        Self {
            repository: state.repo(),
            schedules: state.repo(),
        }
    }

    pub async fn list(&self) -> AppResult<Vec<Order>> {
        let mut orders = self.repository.list().await?;
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    /// Las órdenes nuevas nacen en `Pending`
    pub async fn create(&self, request: CreateOrderRequest) -> AppResult<ApiResponse<Order>> {
        request.validate()?;

        let now = Utc::now();
        let order = Order {
            id: non_blank(request.order_id.as_deref())
                .map(str::to_string)
                .unwrap_or_else(generate_order_id),
            customer_name: request.customer_name.trim().to_string(),
            shipping_info: ShippingInfo {
                city: request.shipping_info.city.trim().to_string(),
                country: request.shipping_info.country.trim().to_string(),
                address: non_blank(request.shipping_info.address.as_deref()).map(str::to_string),
            },
            total: request.total,
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        self.repository.insert(&order).await?;
        info!("🧾 Orden {} creada para {}", order.id, order.customer_name);

        Ok(ApiResponse::success_with_message(order, "Order created successfully"))
    }

    /// `Scheduled` y `Delivered` sólo los asigna el flujo de shipments, y una
    /// orden asociada a un schedule no cambia de estado por esta vía.
    pub async fn update_status(
        &self,
        id: &str,
        request: UpdateOrderStatusRequest,
    ) -> AppResult<ApiResponse<Order>> {
        let status: OrderStatus = request.status.parse().map_err(AppError::BadRequest)?;
        if status.is_managed_by_shipments() {
            return Err(AppError::BadRequest(format!(
                "Order status '{}' is set by the shipment workflow",
                status
            )));
        }

        let mut order = self.repository.get(id).await?;
        if let Some(schedule) = self
            .schedules
            .list()
            .await?
            .into_iter()
            .find(|s| s.order_ids.iter().any(|o| o == &order.id))
        {
            return Err(AppError::Conflict(format!(
                "Order {} is attached to shipment {}",
                order.id, schedule.shipment_id
            )));
        }

        if order.status != status {
            info!("🧾 Orden {}: {} -> {}", order.id, order.status, status);
            order.status = status;
            order.updated_at = Utc::now();
            self.repository.save(&order).await?;
        }
        Ok(ApiResponse::success_with_message(order, "Order status updated"))
    }
}
