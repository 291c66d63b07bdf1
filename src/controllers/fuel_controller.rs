use chrono::Utc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::fleet_dto::{CreateFuelLogRequest, FuelQuery, UpdateFuelLogRequest};
use crate::dto::ApiResponse;
use crate::models::{FuelLog, Vehicle};
use crate::repositories::Repository;
use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::{non_blank, parse_date};

fn parse_log_date(raw: Option<&str>) -> AppResult<Option<chrono::NaiveDate>> {
    match non_blank(raw) {
        Some(raw) => parse_date(raw)
            .map(Some)
            .ok_or_else(|| AppError::Validation("Date must be a valid date (YYYY-MM-DD).".to_string())),
        None => Ok(None),
    }
}

pub struct FuelController {
    repository: Repository<FuelLog>,
    vehicles: Repository<Vehicle>,
}

impl FuelController {
    pub fn new(state: &AppState) -> Self {
        Self {
            repository: state.repo(),
            vehicles: state.repo(),
        }
    }

    /// Registros ordenados por fecha, opcionalmente de un solo vehículo
    pub async fn list(&self, query: &FuelQuery) -> AppResult<Vec<FuelLog>> {
        let vehicle = non_blank(query.vehicle_id.as_deref());
        let mut logs: Vec<FuelLog> = self
            .repository
            .list()
            .await?
            .into_iter()
            .filter(|log| vehicle.map_or(true, |v| log.vehicle_id == v))
            .collect();
        logs.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.created_at.cmp(&a.created_at)));
        Ok(logs)
    }

    pub async fn create(&self, request: CreateFuelLogRequest) -> AppResult<ApiResponse<FuelLog>> {
        request.validate()?;
        let date = parse_log_date(request.date.as_deref())?.unwrap_or_else(|| Utc::now().date_naive());

        // El vehículo tiene que existir
        let vehicle = self.vehicles.get(request.vehicle_id.trim()).await?;

        let log = FuelLog {
            id: Uuid::new_v4().to_string(),
            vehicle_id: vehicle.vehicle_id,
            liters: request.liters,
            cost: request.cost,
            distance: request.distance,
            date,
            created_at: Utc::now(),
        };
        self.repository.insert(&log).await?;
        info!("⛽ Combustible registrado para {}: {} L", log.vehicle_id, log.liters);

        Ok(ApiResponse::success_with_message(log, "Fuel log created successfully"))
    }

    pub async fn update(&self, id: &str, request: UpdateFuelLogRequest) -> AppResult<ApiResponse<FuelLog>> {
        request.validate()?;
        let mut log = self.repository.get(id).await?;

        if let Some(liters) = request.liters {
            log.liters = liters;
        }
        if let Some(cost) = request.cost {
            log.cost = cost;
        }
        if let Some(distance) = request.distance {
            log.distance = distance;
        }
        if let Some(date) = parse_log_date(request.date.as_deref())? {
            log.date = date;
        }

        self.repository.save(&log).await?;
        Ok(ApiResponse::success_with_message(log, "Fuel log updated successfully"))
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.repository.delete(id).await?;
        info!("🗑️ Registro de combustible {} eliminado", id);
        Ok(())
    }
}
