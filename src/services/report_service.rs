//! Reportes mensuales de shipments y combustible
//!
//! Las agregaciones son funciones puras sobre las listas del repositorio;
//! los meses se ordenan ascendentemente como `YYYY-MM`.

use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::dto::fleet_dto::VehicleFuelSummary;
use crate::dto::report_dto::{MonthlyFuelReport, MonthlyShipmentReport};
use crate::models::{FuelLog, Schedule, ScheduleStatus};
use crate::repositories::Repository;
use crate::state::AppState;
use crate::utils::errors::AppResult;

fn month_of(date: chrono::NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

pub fn monthly_shipments(schedules: &[Schedule]) -> Vec<MonthlyShipmentReport> {
    let mut months: BTreeMap<String, MonthlyShipmentReport> = BTreeMap::new();
    for schedule in schedules {
        let month = month_of(schedule.departure_date);
        let row = months
            .entry(month.clone())
            .or_insert_with(|| MonthlyShipmentReport {
                month,
                ..Default::default()
            });
        row.total += 1;
        match schedule.status {
            ScheduleStatus::Scheduled => row.scheduled += 1,
            ScheduleStatus::InProgress | ScheduleStatus::InTransit => row.in_transit += 1,
            ScheduleStatus::Delayed => row.delayed += 1,
            ScheduleStatus::Delivered => row.delivered += 1,
        }
    }
    months.into_values().collect()
}

pub fn monthly_fuel(logs: &[FuelLog]) -> Vec<MonthlyFuelReport> {
    let mut months: BTreeMap<String, MonthlyFuelReport> = BTreeMap::new();
    for log in logs {
        let month = month_of(log.date);
        let row = months
            .entry(month.clone())
            .or_insert_with(|| MonthlyFuelReport {
                month,
                ..Default::default()
            });
        row.entries += 1;
        row.liters += log.liters;
        row.cost += log.cost;
        row.distance += log.distance;
    }
    months.into_values().collect()
}

/// Totales por vehículo, ordenados por `vehicleId`
pub fn vehicle_fuel_summary(logs: &[FuelLog]) -> Vec<VehicleFuelSummary> {
    let mut vehicles: BTreeMap<&str, VehicleFuelSummary> = BTreeMap::new();
    for log in logs {
        let row = vehicles
            .entry(log.vehicle_id.as_str())
            .or_insert_with(|| VehicleFuelSummary {
                vehicle_id: log.vehicle_id.clone(),
                entries: 0,
                liters: Decimal::ZERO,
                cost: Decimal::ZERO,
                distance: Decimal::ZERO,
                cost_per_km: None,
            });
        row.entries += 1;
        row.liters += log.liters;
        row.cost += log.cost;
        row.distance += log.distance;
    }

    vehicles
        .into_values()
        .map(|mut row| {
            if row.distance > Decimal::ZERO {
                row.cost_per_km = Some((row.cost / row.distance).round_dp(2));
            }
            row
        })
        .collect()
}

pub struct ReportService {
    schedules: Repository<Schedule>,
    fuel_logs: Repository<FuelLog>,
}

impl ReportService {
    pub fn new(state: &AppState) -> Self {
        Self {
            schedules: state.repo(),
            fuel_logs: state.repo(),
        }
    }

    pub async fn shipments_by_month(&self) -> AppResult<Vec<MonthlyShipmentReport>> {
        Ok(monthly_shipments(&self.schedules.list().await?))
    }

    pub async fn fuel_by_month(&self) -> AppResult<Vec<MonthlyFuelReport>> {
        Ok(monthly_fuel(&self.fuel_logs.list().await?))
    }

    pub async fn fuel_by_vehicle(&self) -> AppResult<Vec<VehicleFuelSummary>> {
        Ok(vehicle_fuel_summary(&self.fuel_logs.list().await?))
    }
}
