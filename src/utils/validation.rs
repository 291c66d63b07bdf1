//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! y conversión de tipos. Las funciones que devuelven `ValidationError`
//! se usan desde `#[validate(custom = ...)]` en los DTOs.

use chrono::{DateTime, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;
use validator::ValidationError;

lazy_static! {
    /// Número de licencia de conducir: mayúsculas, dígitos y guiones
    pub static ref LICENSE_NUMBER_RE: Regex = Regex::new(r"^[A-Z0-9-]{5,20}$").unwrap();
    /// Teléfono local de 10 dígitos
    pub static ref PHONE_RE: Regex = Regex::new(r"^[0-9]{10}$").unwrap();
}

/// Interpretar una fecha `YYYY-MM-DD` o un datetime RFC3339 (se toma la parte de fecha)
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
}

/// Validar que un string sea una fecha `YYYY-MM-DD`
pub fn validate_date(value: &str) -> Result<(), ValidationError> {
    if parse_date(value).is_none() {
        let mut error = ValidationError::new("date");
        error.message = Some("Date must be a valid date (YYYY-MM-DD).".into());
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"YYYY-MM-DD".to_string());
        return Err(error);
    }
    Ok(())
}

/// Devolver el string recortado si no está vacío
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Validar que un string no esté vacío
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.message = Some("Value cannot be blank".into());
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar formato de teléfono: exactamente 10 dígitos
pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    if !PHONE_RE.is_match(value.trim()) {
        let mut error = ValidationError::new("phone");
        error.message = Some("Contact number must be exactly 10 digits".into());
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar formato del número de licencia de un conductor
pub fn validate_license_number(value: &str) -> Result<(), ValidationError> {
    if !LICENSE_NUMBER_RE.is_match(value.trim()) {
        let mut error = ValidationError::new("license_number");
        error.message =
            Some("License number must be 5-20 uppercase letters, digits or dashes".into());
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar formato de matrícula de vehículo
pub fn validate_registration_number(value: &str) -> Result<(), ValidationError> {
    // Formato básico: WP CAB-1234, AB-1234 o similar
    let clean_plate = value.replace([' ', '-'], "");
    let well_formed = clean_plate
        .chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit());
    if !well_formed || clean_plate.len() < 5 || clean_plate.len() > 10 {
        let mut error = ValidationError::new("registration_number");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor sea positivo
pub fn validate_positive<T: PartialOrd + std::fmt::Display + num_traits::Zero + Serialize>(
    value: T,
) -> Result<(), ValidationError> {
    if value <= T::zero() {
        let mut error = ValidationError::new("positive");
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Adaptador de `validate_positive` para campos `Decimal`
pub fn positive_decimal(value: &Decimal) -> Result<(), ValidationError> {
    validate_positive(*value)
}

/// Adaptador de `validate_positive` para campos enteros
pub fn positive_integer(value: i32) -> Result<(), ValidationError> {
    validate_positive(value)
}
