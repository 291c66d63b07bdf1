//! Modelo de FuelLog

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::repositories::Entity;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FuelLog {
    pub id: String,
    pub vehicle_id: String,
    pub liters: Decimal,
    pub cost: Decimal,
    /// Distancia recorrida en km
    pub distance: Decimal,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl Entity for FuelLog {
    const COLLECTION: &'static str = "fuel_logs";
    const LABEL: &'static str = "Fuel log";

    fn key(&self) -> &str {
        &self.id
    }
}
