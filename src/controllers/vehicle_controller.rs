use chrono::Utc;
use tracing::info;
use validator::Validate;

use crate::dto::fleet_dto::{CreateVehicleRequest, UpdateVehicleRequest};
use crate::dto::ApiResponse;
use crate::models::{Schedule, Vehicle, VehicleStatus};
use crate::repositories::Repository;
use crate::state::AppState;
use crate::utils::errors::{conflict_error, AppError, AppResult};

fn normalize_registration(value: &str) -> String {
    value.replace([' ', '-'], "").to_uppercase()
}

pub struct VehicleController {
    repository: Repository<Vehicle>,
    schedules: Repository<Schedule>,
}

impl VehicleController {
    pub fn new(state: &AppState) -> Self {
        Self {
            repository: state.repo(),
            schedules: state.repo(),
        }
    }

    pub async fn create(&self, request: CreateVehicleRequest) -> AppResult<ApiResponse<Vehicle>> {
        request.validate()?;

        // Verificar que la matrícula no exista
        self.ensure_unique_registration(&request.registration_number, None)
            .await?;

        let now = Utc::now();
        let vehicle = Vehicle {
            vehicle_id: request.vehicle_id.trim().to_string(),
            vehicle_type: request.vehicle_type.trim().to_string(),
            capacity: request.capacity,
            temperature_control: request.temperature_control,
            humidity_control: request.humidity_control,
            status: request.status.unwrap_or(VehicleStatus::Active),
            registration_number: request.registration_number.trim().to_uppercase(),
            picture: request.picture,
            created_at: now,
            updated_at: now,
        };
        self.repository.insert(&vehicle).await?;
        info!("🚛 Vehículo {} registrado", vehicle.vehicle_id);

        Ok(ApiResponse::success_with_message(
            vehicle,
            "Vehicle created successfully",
        ))
    }

    pub async fn get_by_id(&self, id: &str) -> AppResult<Vehicle> {
        self.repository.get(id).await
    }

    pub async fn list(&self) -> AppResult<Vec<Vehicle>> {
        let mut vehicles = self.repository.list().await?;
        vehicles.sort_by(|a, b| a.vehicle_id.cmp(&b.vehicle_id));
        Ok(vehicles)
    }

    pub async fn update(
        &self,
        id: &str,
        request: UpdateVehicleRequest,
    ) -> AppResult<ApiResponse<Vehicle>> {
        request.validate()?;
        let mut vehicle = self.repository.get(id).await?;

        if let Some(registration) = &request.registration_number {
            self.ensure_unique_registration(registration, Some(id)).await?;
            vehicle.registration_number = registration.trim().to_uppercase();
        }
        if let Some(vehicle_type) = request.vehicle_type {
            vehicle.vehicle_type = vehicle_type.trim().to_string();
        }
        if let Some(capacity) = request.capacity {
            vehicle.capacity = capacity;
        }
        if let Some(temperature_control) = request.temperature_control {
            vehicle.temperature_control = temperature_control;
        }
        if let Some(humidity_control) = request.humidity_control {
            vehicle.humidity_control = humidity_control;
        }
        if let Some(status) = request.status {
            vehicle.status = status;
        }
        if request.picture.is_some() {
            vehicle.picture = request.picture;
        }
        vehicle.updated_at = Utc::now();

        self.repository.save(&vehicle).await?;
        Ok(ApiResponse::success_with_message(
            vehicle,
            "Vehicle updated successfully",
        ))
    }

    /// No se puede eliminar un vehículo con un schedule no entregado
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let vehicle = self.repository.get(id).await?;
        let in_use = self
            .schedules
            .list()
            .await?
            .into_iter()
            .find(|s| s.vehicle_id == vehicle.vehicle_id && s.is_committed());
        if let Some(schedule) = in_use {
            return Err(AppError::Conflict(format!(
                "Vehicle {} is assigned to active shipment {}",
                vehicle.vehicle_id, schedule.shipment_id
            )));
        }

        self.repository.delete(id).await?;
        info!("🗑️ Vehículo {} eliminado", id);
        Ok(())
    }

    async fn ensure_unique_registration(&self, value: &str, exclude: Option<&str>) -> AppResult<()> {
        let normalized = normalize_registration(value);
        let taken = self.repository.list().await?.into_iter().any(|v| {
            Some(v.vehicle_id.as_str()) != exclude
                && normalize_registration(&v.registration_number) == normalized
        });
        if taken {
            return Err(conflict_error("Vehicle", "registration number", value.trim()));
        }
        Ok(())
    }
}
