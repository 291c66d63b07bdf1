use chrono::Utc;
use tracing::info;
use validator::Validate;

use crate::dto::fleet_dto::{CreateDriverRequest, UpdateDriverRequest};
use crate::dto::ApiResponse;
use crate::models::{Driver, DriverStatus, Schedule};
use crate::repositories::Repository;
use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::non_blank;

pub struct DriverController {
    repository: Repository<Driver>,
    schedules: Repository<Schedule>,
}

impl DriverController {
    pub fn new(state: &AppState) -> Self {
        Self {
            repository: state.repo(),
            schedules: state.repo(),
        }
    }

    pub async fn create(&self, request: CreateDriverRequest) -> AppResult<ApiResponse<Driver>> {
        request.validate()?;

        let now = Utc::now();
        let driver = Driver {
            driver_id: request.driver_id.trim().to_string(),
            name: request.name.trim().to_string(),
            contact_number: request.contact_number.trim().to_string(),
            email: non_blank(request.email.as_deref()).map(str::to_string),
            license_number: request.license_number.trim().to_string(),
            status: request.status.unwrap_or(DriverStatus::Available),
            assigned_shipments: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        self.repository.insert(&driver).await?;
        info!("🧑‍✈️ Conductor {} registrado", driver.driver_id);

        Ok(ApiResponse::success_with_message(
            driver,
            "Driver created successfully",
        ))
    }

    pub async fn get_by_id(&self, id: &str) -> AppResult<Driver> {
        self.repository.get(id).await
    }

    pub async fn list(&self) -> AppResult<Vec<Driver>> {
        let mut drivers = self.repository.list().await?;
        drivers.sort_by(|a, b| a.driver_id.cmp(&b.driver_id));
        Ok(drivers)
    }

    pub async fn update(
        &self,
        id: &str,
        request: UpdateDriverRequest,
    ) -> AppResult<ApiResponse<Driver>> {
        request.validate()?;
        let mut driver = self.repository.get(id).await?;

        if let Some(name) = request.name {
            driver.name = name.trim().to_string();
        }
        if let Some(contact_number) = request.contact_number {
            driver.contact_number = contact_number.trim().to_string();
        }
        if request.email.is_some() {
            driver.email = non_blank(request.email.as_deref()).map(str::to_string);
        }
        if let Some(license_number) = request.license_number {
            driver.license_number = license_number.trim().to_string();
        }
        if let Some(status) = request.status {
            driver.status = status;
        }
        driver.updated_at = Utc::now();

        self.repository.save(&driver).await?;
        Ok(ApiResponse::success_with_message(
            driver,
            "Driver updated successfully",
        ))
    }

    /// No se puede eliminar un conductor con un schedule no entregado
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let driver = self.repository.get(id).await?;
        let in_use = self
            .schedules
            .list()
            .await?
            .into_iter()
            .find(|s| s.driver_id == driver.driver_id && s.is_committed());
        if let Some(schedule) = in_use {
            return Err(AppError::Conflict(format!(
                "Driver {} is assigned to active shipment {}",
                driver.driver_id, schedule.shipment_id
            )));
        }

        self.repository.delete(id).await?;
        info!("🗑️ Conductor {} eliminado", id);
        Ok(())
    }
}
