use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{DriverStatus, VehicleStatus};
use crate::utils::validation::{
    positive_decimal, positive_integer, validate_date, validate_license_number,
    validate_not_empty, validate_phone, validate_registration_number,
};

// Request para crear un vehículo
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateVehicleRequest {
    #[validate(length(min = 1, max = 20), custom = "validate_not_empty")]
    pub vehicle_id: String,

    #[serde(rename = "type")]
    #[validate(length(min = 2, max = 50))]
    pub vehicle_type: String,

    #[validate(custom = "positive_integer")]
    pub capacity: i32,

    #[serde(default)]
    pub temperature_control: bool,

    #[serde(default)]
    pub humidity_control: bool,

    pub status: Option<VehicleStatus>,

    #[validate(custom = "validate_registration_number")]
    pub registration_number: String,

    pub picture: Option<String>,
}

// Request para actualizar un vehículo
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVehicleRequest {
    #[serde(rename = "type")]
    #[validate(length(min = 2, max = 50))]
    pub vehicle_type: Option<String>,

    #[validate(custom = "positive_integer")]
    pub capacity: Option<i32>,

    pub temperature_control: Option<bool>,
    pub humidity_control: Option<bool>,
    pub status: Option<VehicleStatus>,

    #[validate(custom = "validate_registration_number")]
    pub registration_number: Option<String>,

    pub picture: Option<String>,
}

// Request para crear un conductor
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateDriverRequest {
    #[validate(length(min = 1, max = 20), custom = "validate_not_empty")]
    pub driver_id: String,

    #[validate(length(min = 2, max = 100))]
    pub name: String,

    #[validate(custom = "validate_phone")]
    pub contact_number: String,

    #[validate(email)]
    pub email: Option<String>,

    #[validate(custom = "validate_license_number")]
    pub license_number: String,

    pub status: Option<DriverStatus>,
}

// Request para actualizar un conductor
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDriverRequest {
    #[validate(length(min = 2, max = 100))]
    pub name: Option<String>,

    #[validate(custom = "validate_phone")]
    pub contact_number: Option<String>,

    #[validate(email)]
    pub email: Option<String>,

    #[validate(custom = "validate_license_number")]
    pub license_number: Option<String>,

    pub status: Option<DriverStatus>,
}

// Request para registrar combustible
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateFuelLogRequest {
    #[validate(custom = "validate_not_empty")]
    pub vehicle_id: String,

    #[validate(custom = "positive_decimal")]
    pub liters: Decimal,

    #[validate(custom = "positive_decimal")]
    pub cost: Decimal,

    #[validate(custom = "positive_decimal")]
    pub distance: Decimal,

    /// `YYYY-MM-DD`; por defecto la fecha de hoy
    #[validate(custom = "validate_date")]
    pub date: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFuelLogRequest {
    #[validate(custom = "positive_decimal")]
    pub liters: Option<Decimal>,

    #[validate(custom = "positive_decimal")]
    pub cost: Option<Decimal>,

    #[validate(custom = "positive_decimal")]
    pub distance: Option<Decimal>,

    #[validate(custom = "validate_date")]
    pub date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelQuery {
    pub vehicle_id: Option<String>,
}

// Resumen de combustible por vehículo
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleFuelSummary {
    pub vehicle_id: String,
    pub entries: usize,
    pub liters: Decimal,
    pub cost: Decimal,
    pub distance: Decimal,
    pub cost_per_km: Option<Decimal>,
}
