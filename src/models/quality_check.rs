//! Modelo de QualityCheckLog
//!
//! Registro append-only del estado de la carga al entregar un shipment.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::repositories::Entity;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ShipmentCondition {
    Intact,
    Damaged,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QualityCheckLog {
    pub id: String,
    pub shipment_id: String,
    pub condition: ShipmentCondition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    pub check_date: NaiveDate,
    pub checked_by: String,
    pub created_at: DateTime<Utc>,
}

impl Entity for QualityCheckLog {
    const COLLECTION: &'static str = "quality_checks";
    const LABEL: &'static str = "Quality check";

    fn key(&self) -> &str {
        &self.id
    }
}
