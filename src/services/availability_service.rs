//! Disponibilidad de vehículos y conductores
//!
//! Un recurso está comprometido en una fecha si algún schedule no entregado
//! lo usa y su rango salida..=llegada contiene esa fecha. Sin fecha la
//! consulta devuelve la lista completa.

use chrono::NaiveDate;
use std::collections::HashSet;

use crate::dto::schedule_dto::AvailabilityQuery;
use crate::models::{Driver, Schedule, Vehicle};
use crate::repositories::Repository;
use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::{non_blank, parse_date};

/// Recursos ocupados en una fecha
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Committed {
    pub vehicles: HashSet<String>,
    pub drivers: HashSet<String>,
}

fn is_excluded(schedule: &Schedule, exclude: Option<&str>) -> bool {
    exclude.is_some_and(|id| schedule.id == id || schedule.shipment_id == id)
}

pub fn committed_on(schedules: &[Schedule], date: NaiveDate, exclude: Option<&str>) -> Committed {
    let mut committed = Committed::default();
    for schedule in schedules
        .iter()
        .filter(|s| !is_excluded(s, exclude) && s.occupies(date))
    {
        committed.vehicles.insert(schedule.vehicle_id.clone());
        committed.drivers.insert(schedule.driver_id.clone());
    }
    committed
}

pub fn available_vehicles(
    vehicles: Vec<Vehicle>,
    schedules: &[Schedule],
    date: Option<NaiveDate>,
    exclude: Option<&str>,
) -> Vec<Vehicle> {
    let Some(date) = date else {
        return vehicles;
    };
    let committed = committed_on(schedules, date, exclude);
    vehicles
        .into_iter()
        .filter(|v| v.is_operational() && !committed.vehicles.contains(&v.vehicle_id))
        .collect()
}

pub fn available_drivers(
    drivers: Vec<Driver>,
    schedules: &[Schedule],
    date: Option<NaiveDate>,
    exclude: Option<&str>,
) -> Vec<Driver> {
    let Some(date) = date else {
        return drivers;
    };
    let committed = committed_on(schedules, date, exclude);
    drivers
        .into_iter()
        .filter(|d| d.is_operational() && !committed.drivers.contains(&d.driver_id))
        .collect()
}

/// Recurso con reserva solapada
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookedResource {
    Vehicle,
    Driver,
}

/// Primer schedule que ya reserva el vehículo o el conductor en `from..=to`
pub fn find_booking_conflict<'a>(
    schedules: &'a [Schedule],
    vehicle_id: &str,
    driver_id: &str,
    from: NaiveDate,
    to: NaiveDate,
    exclude: Option<&str>,
) -> Option<(BookedResource, &'a Schedule)> {
    schedules
        .iter()
        .filter(|s| !is_excluded(s, exclude) && s.overlaps(from, to))
        .find_map(|s| {
            if s.vehicle_id == vehicle_id {
                Some((BookedResource::Vehicle, s))
            } else if s.driver_id == driver_id {
                Some((BookedResource::Driver, s))
            } else {
                None
            }
        })
}

pub struct AvailabilityService {
    schedules: Repository<Schedule>,
    vehicles: Repository<Vehicle>,
    drivers: Repository<Driver>,
}

impl AvailabilityService {
    pub fn new(state: &AppState) -> Self {
        Self {
            schedules: state.repo(),
            vehicles: state.repo(),
            drivers: state.repo(),
        }
    }

    fn parse_query(query: &AvailabilityQuery) -> AppResult<Option<NaiveDate>> {
        match non_blank(query.departure_date.as_deref()) {
            Some(raw) => parse_date(raw).map(Some).ok_or_else(|| {
                AppError::Validation("Departure date must be a valid date (YYYY-MM-DD).".to_string())
            }),
            None => Ok(None),
        }
    }

    pub async fn vehicles(&self, query: &AvailabilityQuery) -> AppResult<Vec<Vehicle>> {
        let date = Self::parse_query(query)?;
        let schedules = self.schedules.list().await?;
        Ok(available_vehicles(
            self.vehicles.list().await?,
            &schedules,
            date,
            non_blank(query.exclude_schedule_id.as_deref()),
        ))
    }

    pub async fn drivers(&self, query: &AvailabilityQuery) -> AppResult<Vec<Driver>> {
        let date = Self::parse_query(query)?;
        let schedules = self.schedules.list().await?;
        Ok(available_drivers(
            self.drivers.list().await?,
            &schedules,
            date,
            non_blank(query.exclude_schedule_id.as_deref()),
        ))
    }
}
