//! Scheduler de shipments
//!
//! Crea, edita y elimina schedules. El formulario pasa siempre por
//! `ScheduleForm::validate`; después se comprueban las reglas que dependen
//! de otros documentos (órdenes confirmadas, vehículo y conductor operativos,
//! sin reservas solapadas).

use chrono::{NaiveDate, Utc};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::dto::schedule_dto::{FormMode, ScheduleForm, ShipmentView, ValidSchedule};
use crate::models::{Driver, Order, OrderStatus, Schedule, ScheduleStatus, Vehicle};
use crate::repositories::{DocumentStore, Repository};
use crate::services::availability_service::{find_booking_conflict, BookedResource};
use crate::services::shipment_service::{apply_transition, ShipmentTracker};
use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::non_blank;

/// Contador persistente de los `shipmentId`
const SHIPMENT_SEQUENCE: &str = "shipments";

/// `shipmentId` correlativo: `SHP-0001`, `SHP-0002`, ...
pub fn format_shipment_id(sequence: u64) -> String {
    format!("SHP-{:04}", sequence)
}

fn booking_conflict(resource: BookedResource, id: &str, schedule: &Schedule) -> AppError {
    let label = match resource {
        BookedResource::Vehicle => "Vehicle",
        BookedResource::Driver => "Driver",
    };
    AppError::ConflictWithDetails(
        format!(
            "{} {} is already booked between {} and {}",
            label, id, schedule.departure_date, schedule.expected_arrival_date
        ),
        json!({
            "resource": label.to_lowercase(),
            "id": id,
            "shipmentId": schedule.shipment_id,
            "departureDate": schedule.departure_date,
            "expectedArrivalDate": schedule.expected_arrival_date,
        }),
    )
}

pub struct SchedulerService {
    store: Arc<dyn DocumentStore>,
    schedules: Repository<Schedule>,
    orders: Repository<Order>,
    vehicles: Repository<Vehicle>,
    drivers: Repository<Driver>,
    tracker: ShipmentTracker,
    today: NaiveDate,
}

impl SchedulerService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: Arc::clone(&state.store),
            schedules: state.repo(),
            orders: state.repo(),
            vehicles: state.repo(),
            drivers: state.repo(),
            tracker: ShipmentTracker::new(state),
            today: state.config.reference_date(),
        }
    }

    pub async fn list(&self) -> AppResult<Vec<ShipmentView>> {
        self.tracker.list().await
    }

    /// Órdenes en estado `confirmed`, listas para asignar
    pub async fn ready_orders(&self) -> AppResult<Vec<Order>> {
        Ok(self
            .orders
            .list()
            .await?
            .into_iter()
            .filter(|o| o.status == OrderStatus::Confirmed)
            .collect())
    }

    pub async fn create(&self, form: &ScheduleForm) -> AppResult<Schedule> {
        let valid = form.validate(FormMode::Create, self.today)?;

        let mut orders = Vec::with_capacity(valid.order_ids.len());
        for order_id in &valid.order_ids {
            orders.push(self.orders.get(order_id).await?);
        }
        let unconfirmed: Vec<&str> = orders
            .iter()
            .filter(|o| o.status != OrderStatus::Confirmed)
            .map(|o| o.id.as_str())
            .collect();
        if !unconfirmed.is_empty() {
            return Err(AppError::ConflictWithDetails(
                "Only confirmed orders can be scheduled".to_string(),
                json!({ "orderIds": unconfirmed }),
            ));
        }

        let schedules = self.schedules.list().await?;
        self.check_resources(&valid, &schedules, None).await?;

        let shipment_id = self.allocate_shipment_id(&schedules).await?;
        let now = Utc::now();
        let schedule = Schedule {
            id: Uuid::new_v4().to_string(),
            shipment_id,
            order_ids: valid.order_ids,
            vehicle_id: valid.vehicle_id,
            driver_id: valid.driver_id,
            departure_date: valid.departure_date,
            expected_arrival_date: valid.expected_arrival_date,
            location: valid.location,
            status: ScheduleStatus::Scheduled,
            delay_reason: None,
            created_at: now,
            updated_at: now,
        };
        self.schedules.insert(&schedule).await?;
        info!(
            "📅 Schedule {} creado: {} órdenes, vehículo {}, conductor {}",
            schedule.shipment_id,
            schedule.order_ids.len(),
            schedule.vehicle_id,
            schedule.driver_id
        );

        for mut order in orders {
            order.status = OrderStatus::Scheduled;
            order.updated_at = now;
            if let Err(e) = self.orders.save(&order).await {
                warn!("⚠️ No se pudo marcar la orden {} como programada: {}", order.id, e);
            }
        }
        if let Err(e) = self.assign_driver(&schedule.driver_id, &schedule.shipment_id).await {
            warn!("⚠️ No se pudo asignar {} al conductor {}: {}", schedule.shipment_id, schedule.driver_id, e);
        }

        Ok(schedule)
    }

    /// Edición: mismas reglas que la creación, sin re-seleccionar órdenes
    pub async fn update(&self, id: &str, form: &ScheduleForm) -> AppResult<Schedule> {
        let mut schedule = self.schedules.get(id).await?;
        if schedule.status.is_terminal() {
            return Err(AppError::Conflict(
                "Delivered shipments cannot be modified".to_string(),
            ));
        }

        let valid = form.validate(
            FormMode::Edit {
                current_departure: schedule.departure_date,
            },
            self.today,
        )?;

        let next_status = match non_blank(form.status.as_deref()) {
            Some(raw) => raw.parse::<ScheduleStatus>().map_err(AppError::Validation)?,
            None => schedule.status,
        };

        let schedules = self.schedules.list().await?;
        self.check_resources(&valid, &schedules, Some(schedule.id.as_str()))
            .await?;

        let previous_status = schedule.status;
        let previous_driver = schedule.driver_id.clone();
        apply_transition(&mut schedule, next_status, form.delay_reason.as_deref())?;

        schedule.vehicle_id = valid.vehicle_id;
        schedule.driver_id = valid.driver_id;
        schedule.departure_date = valid.departure_date;
        schedule.expected_arrival_date = valid.expected_arrival_date;
        schedule.location = valid.location;
        schedule.updated_at = Utc::now();

        self.schedules.save(&schedule).await?;
        info!("✏️ Schedule {} actualizado", schedule.shipment_id);

        if previous_driver != schedule.driver_id {
            if let Err(e) = self.unassign_driver(&previous_driver, &schedule.shipment_id).await {
                warn!("⚠️ No se pudo liberar al conductor {}: {}", previous_driver, e);
            }
            if let Err(e) = self.assign_driver(&schedule.driver_id, &schedule.shipment_id).await {
                warn!("⚠️ No se pudo asignar al conductor {}: {}", schedule.driver_id, e);
            }
            // El estado de servicio sigue al shipment en movimiento
            if previous_status.is_moving() {
                if let Err(e) = self.tracker.release_driver(&previous_driver, &schedule.id).await {
                    warn!("⚠️ No se pudo liberar al conductor {}: {}", previous_driver, e);
                }
            }
            if schedule.status.is_moving() {
                if let Err(e) = self.tracker.set_driver_on_duty(&schedule.driver_id).await {
                    warn!("⚠️ No se pudo actualizar al conductor {}: {}", schedule.driver_id, e);
                }
            }
        }
        if previous_status != schedule.status {
            info!(
                "🚚 Shipment {}: {} -> {}",
                schedule.shipment_id, previous_status, schedule.status
            );
            self.tracker.on_status_changed(&schedule, previous_status).await;
        }

        Ok(schedule)
    }

    /// Elimina el schedule; las órdenes no entregadas vuelven a `confirmed`
    pub async fn delete(&self, id: &str) -> AppResult<Schedule> {
        let schedule = self.schedules.get(id).await?;
        self.schedules.delete(&schedule.id).await?;
        info!("🗑️ Schedule {} eliminado", schedule.shipment_id);

        for order_id in &schedule.order_ids {
            if let Err(e) = self.release_order(order_id).await {
                warn!("⚠️ No se pudo liberar la orden {}: {}", order_id, e);
            }
        }
        if let Err(e) = self.unassign_driver(&schedule.driver_id, &schedule.shipment_id).await {
            warn!("⚠️ No se pudo liberar al conductor {}: {}", schedule.driver_id, e);
        }
        if schedule.status.is_moving() {
            if let Err(e) = self.tracker.release_driver(&schedule.driver_id, &schedule.id).await {
                warn!("⚠️ No se pudo liberar al conductor {}: {}", schedule.driver_id, e);
            }
        }
        Ok(schedule)
    }

    /// Reserva el siguiente `shipmentId`. Los ids de schedules eliminados no
    /// se reutilizan; se saltan los que ya existan de antes del contador.
    async fn allocate_shipment_id(&self, schedules: &[Schedule]) -> AppResult<String> {
        loop {
            let sequence = self.store.next_sequence(SHIPMENT_SEQUENCE).await?;
            let shipment_id = format_shipment_id(sequence);
            if !schedules.iter().any(|s| s.shipment_id == shipment_id) {
                return Ok(shipment_id);
            }
        }
    }

    async fn check_resources(
        &self,
        valid: &ValidSchedule,
        schedules: &[Schedule],
        exclude: Option<&str>,
    ) -> AppResult<()> {
        let vehicle = self.vehicles.get(&valid.vehicle_id).await?;
        if !vehicle.is_operational() {
            return Err(AppError::Conflict(format!(
                "Vehicle {} is not active",
                vehicle.vehicle_id
            )));
        }

        let driver = self.drivers.get(&valid.driver_id).await?;
        if !driver.is_operational() {
            return Err(AppError::Conflict(format!(
                "Driver {} is inactive",
                driver.driver_id
            )));
        }

        if let Some((resource, hit)) = find_booking_conflict(
            schedules,
            &valid.vehicle_id,
            &valid.driver_id,
            valid.departure_date,
            valid.expected_arrival_date,
            exclude,
        ) {
            let id = match resource {
                BookedResource::Vehicle => &valid.vehicle_id,
                BookedResource::Driver => &valid.driver_id,
            };
            return Err(booking_conflict(resource, id, hit));
        }
        Ok(())
    }

    async fn assign_driver(&self, driver_id: &str, shipment_id: &str) -> AppResult<()> {
        let mut driver = self.drivers.get(driver_id).await?;
        driver.assign(shipment_id);
        driver.updated_at = Utc::now();
        self.drivers.save(&driver).await
    }

    async fn unassign_driver(&self, driver_id: &str, shipment_id: &str) -> AppResult<()> {
        let Some(mut driver) = self.drivers.find(driver_id).await? else {
            return Ok(());
        };
        driver.unassign(shipment_id);
        driver.updated_at = Utc::now();
        self.drivers.save(&driver).await
    }

    async fn release_order(&self, order_id: &str) -> AppResult<()> {
        let Some(mut order) = self.orders.find(order_id).await? else {
            return Ok(());
        };
        if order.status == OrderStatus::Delivered {
            return Ok(());
        }
        order.status = OrderStatus::Confirmed;
        order.updated_at = Utc::now();
        self.orders.save(&order).await
    }
}
