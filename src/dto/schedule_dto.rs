//! DTOs del scheduler y del tracker de shipments
//!
//! `ScheduleForm::validate` es el único validador del formulario de schedule:
//! creación y edición pasan por él.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Schedule, ScheduleStatus, ShipmentAction};
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::{non_blank, parse_date};

/// Cuerpo de `POST /schedules` y `PUT /schedules/:id/update`
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleForm {
    #[serde(default)]
    pub order_ids: Vec<String>,
    pub vehicle_id: Option<String>,
    pub driver_id: Option<String>,
    pub departure_date: Option<String>,
    pub expected_arrival_date: Option<String>,
    pub location: Option<String>,
    /// Sólo en edición
    pub status: Option<String>,
    /// Sólo en edición
    pub delay_reason: Option<String>,
}

/// Modo del formulario
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    /// En edición las órdenes no se re-seleccionan, y una salida ya pasada se
    /// acepta mientras no cambie.
    Edit { current_departure: NaiveDate },
}

/// Formulario validado
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidSchedule {
    pub order_ids: Vec<String>,
    pub vehicle_id: String,
    pub driver_id: String,
    pub departure_date: NaiveDate,
    pub expected_arrival_date: NaiveDate,
    pub location: String,
}

fn invalid(message: &str) -> AppError {
    AppError::Validation(message.to_string())
}

impl ScheduleForm {
    /// Valida en orden; gana el primer error
    pub fn validate(&self, mode: FormMode, today: NaiveDate) -> AppResult<ValidSchedule> {
        let mut order_ids: Vec<String> = Vec::new();
        if mode == FormMode::Create {
            for id in self.order_ids.iter().filter_map(|id| non_blank(Some(id))) {
                if !order_ids.iter().any(|existing| existing == id) {
                    order_ids.push(id.to_string());
                }
            }
            if order_ids.is_empty() {
                return Err(invalid("At least one order must be selected."));
            }
        }

        let vehicle_id = non_blank(self.vehicle_id.as_deref())
            .ok_or_else(|| invalid("Vehicle is required."))?;

        let driver_id = non_blank(self.driver_id.as_deref())
            .ok_or_else(|| invalid("Driver is required."))?;

        let departure_raw = non_blank(self.departure_date.as_deref())
            .ok_or_else(|| invalid("Departure date is required."))?;
        let departure_date = parse_date(departure_raw)
            .ok_or_else(|| invalid("Departure date must be a valid date (YYYY-MM-DD)."))?;

        let departure_in_past = departure_date < today;
        let past_allowed = matches!(
            mode,
            FormMode::Edit { current_departure } if current_departure == departure_date
        );
        if departure_in_past && !past_allowed {
            return Err(invalid("Departure date cannot be in the past."));
        }

        let arrival_raw = non_blank(self.expected_arrival_date.as_deref())
            .ok_or_else(|| invalid("Expected arrival date is required."))?;
        let expected_arrival_date = parse_date(arrival_raw)
            .ok_or_else(|| invalid("Expected arrival date must be a valid date (YYYY-MM-DD)."))?;

        if expected_arrival_date <= departure_date {
            return Err(invalid("Expected arrival date must be after departure date"));
        }

        let location = non_blank(self.location.as_deref())
            .ok_or_else(|| invalid("Location is required."))?;

        Ok(ValidSchedule {
            order_ids,
            vehicle_id: vehicle_id.to_string(),
            driver_id: driver_id.to_string(),
            departure_date,
            expected_arrival_date,
            location: location.to_string(),
        })
    }
}

/// Query de disponibilidad de vehículos y conductores
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    pub departure_date: Option<String>,
    pub exclude_schedule_id: Option<String>,
}

/// Cuerpo de `PUT /shipments/:id`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentUpdateRequest {
    pub status: Option<String>,
    pub location: Option<String>,
    pub delay_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DelayRequest {
    pub reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LocationRequest {
    pub location: Option<String>,
}

/// Vista de un shipment para los dashboards
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentView {
    pub id: String,
    pub shipment_id: String,
    pub order_ids: Vec<String>,
    pub vehicle_id: String,
    pub driver_id: String,
    pub departure_date: NaiveDate,
    pub expected_arrival_date: NaiveDate,
    pub location: String,
    pub status: ScheduleStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay_reason: Option<String>,
    pub location_editable: bool,
    pub available_actions: Vec<ShipmentAction>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Schedule> for ShipmentView {
    fn from(schedule: Schedule) -> Self {
        Self {
            location_editable: schedule.is_location_editable(),
            available_actions: schedule.status.available_actions(),
            id: schedule.id,
            shipment_id: schedule.shipment_id,
            order_ids: schedule.order_ids,
            vehicle_id: schedule.vehicle_id,
            driver_id: schedule.driver_id,
            departure_date: schedule.departure_date,
            expected_arrival_date: schedule.expected_arrival_date,
            location: schedule.location,
            status: schedule.status,
            delay_reason: schedule.delay_reason,
            created_at: schedule.created_at,
            updated_at: schedule.updated_at,
        }
    }
}
