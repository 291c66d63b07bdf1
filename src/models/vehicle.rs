//! Modelo de Vehicle
//!
//! La clave del documento es el `vehicleId` de negocio (p. ej. "V1"); los
//! schedules lo referencian por ese string.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::repositories::Entity;

/// Estado del vehículo
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum VehicleStatus {
    Active,
    #[serde(rename = "Under Maintenance")]
    UnderMaintenance,
    Inactive,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub vehicle_id: String,
    #[serde(rename = "type")]
    pub vehicle_type: String,
    pub capacity: i32,
    pub temperature_control: bool,
    pub humidity_control: bool,
    pub status: VehicleStatus,
    pub registration_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Vehicle {
    const COLLECTION: &'static str = "vehicles";
    const LABEL: &'static str = "Vehicle";

    fn key(&self) -> &str {
        &self.vehicle_id
    }
}

impl Vehicle {
    /// Sólo los vehículos activos pueden asignarse a un schedule
    pub fn is_operational(&self) -> bool {
        self.status == VehicleStatus::Active
    }
}
