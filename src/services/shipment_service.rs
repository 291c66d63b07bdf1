//! Tracker de estados de shipments
//!
//! Aplica la tabla de transiciones de `ScheduleStatus`, las actualizaciones
//! de ubicación y los efectos sobre órdenes y conductores. Un fallo deja el
//! documento como estaba.

use chrono::Utc;
use tracing::{info, warn};

use crate::dto::schedule_dto::{ShipmentUpdateRequest, ShipmentView};
use crate::models::{
    Driver, DriverStatus, Order, OrderStatus, Schedule, ScheduleStatus, ShipmentAction,
};
use crate::repositories::Repository;
use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::non_blank;

/// Cambia el estado si la transición es legal. Devuelve `false` si ya estaba
/// en ese estado.
pub fn apply_transition(
    schedule: &mut Schedule,
    next: ScheduleStatus,
    reason: Option<&str>,
) -> AppResult<bool> {
    let current = schedule.status;
    if current == next {
        return Ok(false);
    }

    if !current.can_transition_to(next) {
        if current.is_terminal() {
            return Err(AppError::Conflict(format!(
                "Shipment {} has already been delivered",
                schedule.shipment_id
            )));
        }
        return Err(AppError::Conflict(format!(
            "Cannot change shipment status from {} to {}",
            current, next
        )));
    }

    match next {
        ScheduleStatus::Delayed => {
            let reason = non_blank(reason)
                .ok_or_else(|| AppError::Validation("Delay reason is required.".to_string()))?;
            schedule.delay_reason = Some(reason.to_string());
        }
        s if s.is_moving() => schedule.delay_reason = None,
        _ => {}
    }

    schedule.status = next;
    schedule.updated_at = Utc::now();
    Ok(true)
}

/// Cambia la ubicación de un shipment no entregado
pub fn apply_location(schedule: &mut Schedule, location: Option<&str>) -> AppResult<bool> {
    if !schedule.is_location_editable() {
        return Err(AppError::Conflict(
            "Location cannot be updated for a delivered shipment".to_string(),
        ));
    }

    let location = non_blank(location)
        .ok_or_else(|| AppError::Validation("Location is required.".to_string()))?;

    if schedule.location == location {
        return Ok(false);
    }
    schedule.location = location.to_string();
    schedule.updated_at = Utc::now();
    Ok(true)
}

/// Resultado de una operación del tracker
#[derive(Debug, Clone)]
pub struct ShipmentUpdate {
    pub schedule: Schedule,
    pub previous: ScheduleStatus,
}

impl ShipmentUpdate {
    pub fn status_changed(&self) -> bool {
        self.schedule.status != self.previous
    }
}

pub struct ShipmentTracker {
    schedules: Repository<Schedule>,
    orders: Repository<Order>,
    drivers: Repository<Driver>,
}

impl ShipmentTracker {
    pub fn new(state: &AppState) -> Self {
        Self {
            schedules: state.repo(),
            orders: state.repo(),
            drivers: state.repo(),
        }
    }

    pub async fn list(&self) -> AppResult<Vec<ShipmentView>> {
        let mut schedules = self.schedules.list().await?;
        schedules.sort_by(|a, b| {
            a.departure_date
                .cmp(&b.departure_date)
                .then_with(|| a.created_at.cmp(&b.created_at))
        });
        Ok(schedules.into_iter().map(ShipmentView::from).collect())
    }

    pub async fn delivered(&self) -> AppResult<Vec<ShipmentView>> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .filter(|s| s.status == ScheduleStatus::Delivered)
            .collect())
    }

    /// Ejecuta una acción del tracker (start / delay / deliver)
    pub async fn perform(
        &self,
        id: &str,
        action: ShipmentAction,
        reason: Option<&str>,
    ) -> AppResult<ShipmentUpdate> {
        let mut schedule = self.schedules.get(id).await?;
        let previous = schedule.status;

        if !apply_transition(&mut schedule, action.target(), reason)? {
            return Ok(ShipmentUpdate { schedule, previous });
        }

        self.schedules.save(&schedule).await?;
        info!(
            "🚚 Shipment {}: {} -> {}",
            schedule.shipment_id, previous, schedule.status
        );
        self.on_status_changed(&schedule, previous).await;
        Ok(ShipmentUpdate { schedule, previous })
    }

    pub async fn update_location(&self, id: &str, location: Option<&str>) -> AppResult<Schedule> {
        let mut schedule = self.schedules.get(id).await?;
        if apply_location(&mut schedule, location)? {
            self.schedules.save(&schedule).await?;
            info!("📍 Shipment {} en {}", schedule.shipment_id, schedule.location);
        }
        Ok(schedule)
    }

    /// `PUT /shipments/:id`: ubicación primero, luego estado, un único guardado
    pub async fn update(
        &self,
        id: &str,
        request: &ShipmentUpdateRequest,
    ) -> AppResult<ShipmentUpdate> {
        let mut schedule = self.schedules.get(id).await?;
        let previous = schedule.status;

        let next = match non_blank(request.status.as_deref()) {
            Some(raw) => raw
                .parse::<ScheduleStatus>()
                .map_err(AppError::Validation)?,
            None => previous,
        };

        let mut changed = false;
        if request.location.is_some() {
            changed |= apply_location(&mut schedule, request.location.as_deref())?;
        }
        changed |= apply_transition(&mut schedule, next, request.delay_reason.as_deref())?;

        if changed {
            self.schedules.save(&schedule).await?;
            if schedule.status != previous {
                info!(
                    "🚚 Shipment {}: {} -> {}",
                    schedule.shipment_id, previous, schedule.status
                );
                self.on_status_changed(&schedule, previous).await;
            }
        }
        Ok(ShipmentUpdate { schedule, previous })
    }

    /// Efectos de un cambio de estado sobre órdenes y conductor. Los fallos se
    /// registran pero no revierten el shipment.
    pub async fn on_status_changed(&self, schedule: &Schedule, previous: ScheduleStatus) {
        if schedule.status == ScheduleStatus::Delivered {
            for order_id in &schedule.order_ids {
                if let Err(e) = self.set_order_status(order_id, OrderStatus::Delivered).await {
                    warn!("⚠️ No se pudo marcar la orden {} como entregada: {}", order_id, e);
                }
            }
            if let Err(e) = self.release_driver(&schedule.driver_id, &schedule.id).await {
                warn!("⚠️ No se pudo liberar al conductor {}: {}", schedule.driver_id, e);
            }
        } else if schedule.status.is_moving() && !previous.is_moving() {
            if let Err(e) = self.set_driver_on_duty(&schedule.driver_id).await {
                warn!("⚠️ No se pudo actualizar al conductor {}: {}", schedule.driver_id, e);
            }
        }
    }

    async fn set_order_status(&self, order_id: &str, status: OrderStatus) -> AppResult<()> {
        let Some(mut order) = self.orders.find(order_id).await? else {
            return Ok(());
        };
        order.status = status;
        order.updated_at = Utc::now();
        self.orders.save(&order).await
    }

    /// `Available` -> `On Duty`; otros estados no se tocan
    pub async fn set_driver_on_duty(&self, driver_id: &str) -> AppResult<()> {
        let Some(mut driver) = self.drivers.find(driver_id).await? else {
            return Ok(());
        };
        if driver.status == DriverStatus::Available {
            driver.status = DriverStatus::OnDuty;
            driver.updated_at = Utc::now();
            self.drivers.save(&driver).await?;
        }
        Ok(())
    }

    /// `On Duty` -> `Available` si el conductor no tiene otro shipment en
    /// movimiento aparte de `schedule_id`
    pub async fn release_driver(&self, driver_id: &str, schedule_id: &str) -> AppResult<()> {
        let Some(mut driver) = self.drivers.find(driver_id).await? else {
            return Ok(());
        };
        if driver.status != DriverStatus::OnDuty {
            return Ok(());
        }

        let still_moving = self.schedules.list().await?.iter().any(|s| {
            s.id != schedule_id && s.driver_id == driver.driver_id && s.status.is_moving()
        });
        if !still_moving {
            driver.status = DriverStatus::Available;
            driver.updated_at = Utc::now();
            self.drivers.save(&driver).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use ScheduleStatus::*;

    fn schedule(status: ScheduleStatus) -> Schedule {
        Schedule {
            id: "s1".to_string(),
            shipment_id: "SHP-0001".to_string(),
            order_ids: vec!["O1".to_string()],
            vehicle_id: "V1".to_string(),
            driver_id: "D1".to_string(),
            departure_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            expected_arrival_date: NaiveDate::from_ymd_opt(2025, 6, 5).unwrap(),
            location: "Colombo".to_string(),
            status,
            delay_reason: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_start_delay_deliver_sequence() {
        let mut s = schedule(Scheduled);
        assert!(apply_transition(&mut s, InProgress, None).unwrap());
        assert!(apply_transition(&mut s, Delayed, Some("Flooded road near Kelaniya")).unwrap());
        assert_eq!(s.delay_reason.as_deref(), Some("Flooded road near Kelaniya"));
        assert!(apply_transition(&mut s, Delivered, None).unwrap());
        assert_eq!(s.status, Delivered);
    }

    #[test]
    fn test_same_status_is_a_no_op() {
        let mut s = schedule(InTransit);
        assert!(!apply_transition(&mut s, InTransit, None).unwrap());
        assert_eq!(s.status, InTransit);
    }

    #[test]
    fn test_illegal_transitions_leave_state_unchanged() {
        let mut s = schedule(Scheduled);
        let err = apply_transition(&mut s, Delivered, None).unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(s.status, Scheduled);

        let mut s = schedule(Delivered);
        match apply_transition(&mut s, InProgress, None).unwrap_err() {
            AppError::Conflict(msg) => assert_eq!(msg, "Shipment SHP-0001 has already been delivered"),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_delay_requires_reason() {
        let mut s = schedule(InProgress);
        let err = apply_transition(&mut s, Delayed, Some("  ")).unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m == "Delay reason is required."));
        assert_eq!(s.status, InProgress);
    }

    #[test]
    fn test_resuming_clears_delay_reason() {
        let mut s = schedule(Delayed);
        s.delay_reason = Some("Vehicle breakdown".to_string());
        assert!(apply_transition(&mut s, InProgress, None).unwrap());
        assert!(s.delay_reason.is_none());
    }

    #[test]
    fn test_location_rules() {
        let mut s = schedule(InProgress);
        assert!(apply_location(&mut s, Some(" Kandy ")).unwrap());
        assert_eq!(s.location, "Kandy");
        assert!(!apply_location(&mut s, Some("Kandy")).unwrap());
        assert!(matches!(
            apply_location(&mut s, Some("")),
            Err(AppError::Validation(_))
        ));

        let mut delivered = schedule(Delivered);
        match apply_location(&mut delivered, Some("Galle")).unwrap_err() {
            AppError::Conflict(msg) => {
                assert_eq!(msg, "Location cannot be updated for a delivered shipment")
            }
            other => panic!("unexpected error {:?}", other),
        }
        assert_eq!(delivered.location, "Colombo");
    }
}
