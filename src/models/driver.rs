//! Modelo de Driver

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::repositories::Entity;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DriverStatus {
    Available,
    #[serde(rename = "On Duty")]
    OnDuty,
    Inactive,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    pub driver_id: String,
    pub name: String,
    pub contact_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub license_number: String,
    pub status: DriverStatus,
    /// Lista desnormalizada de `shipmentId` asignados
    #[serde(default)]
    pub assigned_shipments: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Driver {
    const COLLECTION: &'static str = "drivers";
    const LABEL: &'static str = "Driver";

    fn key(&self) -> &str {
        &self.driver_id
    }
}

impl Driver {
    pub fn is_operational(&self) -> bool {
        self.status != DriverStatus::Inactive
    }

    pub fn assign(&mut self, shipment_id: &str) {
        if !self.assigned_shipments.iter().any(|s| s == shipment_id) {
            self.assigned_shipments.push(shipment_id.to_string());
        }
    }

    pub fn unassign(&mut self, shipment_id: &str) {
        self.assigned_shipments.retain(|s| s != shipment_id);
    }
}
