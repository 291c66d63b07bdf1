//! Modelo de Schedule / Shipment
//!
//! Un schedule es el transporte planificado de una o más órdenes con un
//! vehículo y un conductor entre una fecha de salida y una de llegada.
//! El mismo documento es el "shipment" que sigue el tracker de estados.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::repositories::Entity;

/// Estado del shipment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ScheduleStatus {
    Scheduled,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "In Transit")]
    InTransit,
    Delayed,
    Delivered,
}

impl ScheduleStatus {
    pub const ALL: [ScheduleStatus; 5] = [
        ScheduleStatus::Scheduled,
        ScheduleStatus::InProgress,
        ScheduleStatus::InTransit,
        ScheduleStatus::Delayed,
        ScheduleStatus::Delivered,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ScheduleStatus::Scheduled => "Scheduled",
            ScheduleStatus::InProgress => "In Progress",
            ScheduleStatus::InTransit => "In Transit",
            ScheduleStatus::Delayed => "Delayed",
            ScheduleStatus::Delivered => "Delivered",
        }
    }

    /// En ruta: "In Progress" e "In Transit" son equivalentes para las reglas
    pub fn is_moving(self) -> bool {
        matches!(self, ScheduleStatus::InProgress | ScheduleStatus::InTransit)
    }

    pub fn is_terminal(self) -> bool {
        self == ScheduleStatus::Delivered
    }

    /// Tabla de transiciones entre estados distintos
    pub fn can_transition_to(self, next: ScheduleStatus) -> bool {
        use ScheduleStatus::*;
        match (self, next) {
            (Scheduled, InProgress | InTransit) => true,
            (InProgress, InTransit) | (InTransit, InProgress) => true,
            (InProgress | InTransit, Delayed) => true,
            (InProgress | InTransit | Delayed, Delivered) => true,
            (Delayed, InProgress | InTransit) => true,
            _ => false,
        }
    }

    /// Acciones del tracker disponibles desde este estado
    pub fn available_actions(self) -> Vec<ShipmentAction> {
        let mut actions = Vec::new();
        if self.can_transition_to(ScheduleStatus::InProgress) {
            actions.push(ShipmentAction::Start);
        }
        if self.can_transition_to(ScheduleStatus::Delayed) {
            actions.push(ShipmentAction::Delay);
        }
        if self.can_transition_to(ScheduleStatus::Delivered) {
            actions.push(ShipmentAction::Deliver);
        }
        actions
    }
}

impl fmt::Display for ScheduleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScheduleStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().replace(['_', '-'], " ");
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(&normalized))
            .ok_or_else(|| format!("Unknown shipment status '{}'", value.trim()))
    }
}

/// Acción del tracker de shipments
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ShipmentAction {
    Start,
    Delay,
    Deliver,
}

impl ShipmentAction {
    pub fn target(self) -> ScheduleStatus {
        match self {
            ShipmentAction::Start => ScheduleStatus::InProgress,
            ShipmentAction::Delay => ScheduleStatus::Delayed,
            ShipmentAction::Deliver => ScheduleStatus::Delivered,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub id: String,
    pub shipment_id: String,
    pub order_ids: Vec<String>,
    pub vehicle_id: String,
    pub driver_id: String,
    pub departure_date: NaiveDate,
    pub expected_arrival_date: NaiveDate,
    pub location: String,
    pub status: ScheduleStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Schedule {
    const COLLECTION: &'static str = "schedules";
    const LABEL: &'static str = "Schedule";

    fn key(&self) -> &str {
        &self.id
    }
}

impl Schedule {
    /// El vehículo y el conductor siguen comprometidos hasta la entrega
    pub fn is_committed(&self) -> bool {
        !self.status.is_terminal()
    }

    /// ¿Ocupa la fecha dada? (rango inclusivo salida..=llegada)
    pub fn occupies(&self, date: NaiveDate) -> bool {
        self.is_committed() && self.departure_date <= date && date <= self.expected_arrival_date
    }

    /// ¿Se solapa con el rango inclusivo `from..=to`?
    pub fn overlaps(&self, from: NaiveDate, to: NaiveDate) -> bool {
        self.is_committed() && self.departure_date <= to && from <= self.expected_arrival_date
    }

    pub fn is_location_editable(&self) -> bool {
        !self.status.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ScheduleStatus::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn schedule(status: ScheduleStatus) -> Schedule {
        Schedule {
            id: "s1".to_string(),
            shipment_id: "SHP-1".to_string(),
            order_ids: vec!["O1".to_string()],
            vehicle_id: "V1".to_string(),
            driver_id: "D1".to_string(),
            departure_date: date(2025, 6, 1),
            expected_arrival_date: date(2025, 6, 5),
            location: "Colombo".to_string(),
            status,
            delay_reason: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_transition_table() {
        assert!(Scheduled.can_transition_to(InProgress));
        assert!(Scheduled.can_transition_to(InTransit));
        assert!(!Scheduled.can_transition_to(Delayed));
        assert!(!Scheduled.can_transition_to(Delivered));

        assert!(InProgress.can_transition_to(Delayed));
        assert!(InTransit.can_transition_to(Delivered));
        assert!(Delayed.can_transition_to(Delivered));
        assert!(Delayed.can_transition_to(InProgress));
        assert!(!InProgress.can_transition_to(Scheduled));

        for next in ScheduleStatus::ALL {
            assert!(!Delivered.can_transition_to(next));
        }
    }

    #[test]
    fn test_available_actions() {
        assert_eq!(Scheduled.available_actions(), vec![ShipmentAction::Start]);
        assert_eq!(
            InProgress.available_actions(),
            vec![ShipmentAction::Delay, ShipmentAction::Deliver]
        );
        assert_eq!(
            Delayed.available_actions(),
            vec![ShipmentAction::Start, ShipmentAction::Deliver]
        );
        assert!(Delivered.available_actions().is_empty());
    }

    #[test]
    fn test_status_parsing_is_lenient_about_case_and_separators() {
        assert_eq!("in progress".parse::<ScheduleStatus>().unwrap(), InProgress);
        assert_eq!("IN_TRANSIT".parse::<ScheduleStatus>().unwrap(), InTransit);
        assert_eq!(" Delivered ".parse::<ScheduleStatus>().unwrap(), Delivered);
        assert!("Lost".parse::<ScheduleStatus>().is_err());
    }

    #[test]
    fn test_status_serializes_with_display_labels() {
        assert_eq!(serde_json::to_value(InProgress).unwrap(), "In Progress");
        assert_eq!(
            serde_json::from_value::<ScheduleStatus>("In Transit".into()).unwrap(),
            InTransit
        );
    }

    #[test]
    fn test_occupancy_is_inclusive_and_ends_on_delivery() {
        let active = schedule(InProgress);
        assert!(active.occupies(date(2025, 6, 1)));
        assert!(active.occupies(date(2025, 6, 5)));
        assert!(!active.occupies(date(2025, 6, 6)));

        assert!(active.overlaps(date(2025, 5, 28), date(2025, 6, 1)));
        assert!(active.overlaps(date(2025, 6, 5), date(2025, 6, 9)));
        assert!(!active.overlaps(date(2025, 6, 6), date(2025, 6, 9)));

        let delivered = schedule(Delivered);
        assert!(!delivered.occupies(date(2025, 6, 2)));
        assert!(!delivered.is_location_editable());
    }
}
