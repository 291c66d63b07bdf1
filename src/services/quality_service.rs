//! Controles de calidad de shipments entregados

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::dto::quality_dto::CreateQualityCheckRequest;
use crate::models::{QualityCheckLog, Schedule, ScheduleStatus};
use crate::repositories::Repository;
use crate::state::AppState;
use crate::utils::errors::{not_found_error, AppError, AppResult};
use crate::utils::validation::{non_blank, parse_date};

pub struct QualityService {
    checks: Repository<QualityCheckLog>,
    schedules: Repository<Schedule>,
}

impl QualityService {
    pub fn new(state: &AppState) -> Self {
        Self {
            checks: state.repo(),
            schedules: state.repo(),
        }
    }

    /// Registros, el más reciente primero
    pub async fn list(&self) -> AppResult<Vec<QualityCheckLog>> {
        let mut checks = self.checks.list().await?;
        checks.sort_by(|a, b| {
            b.check_date
                .cmp(&a.check_date)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(checks)
    }

    pub async fn create(
        &self,
        request: &CreateQualityCheckRequest,
        checked_by: &str,
    ) -> AppResult<QualityCheckLog> {
        let shipment_ref = non_blank(request.shipment_id.as_deref()).ok_or_else(|| {
            AppError::Validation("Shipment ID is required to log a quality check.".to_string())
        })?;
        let condition = request.condition.ok_or_else(|| {
            AppError::Validation("Condition is required (Intact or Damaged).".to_string())
        })?;
        let check_date = match non_blank(request.check_date.as_deref()) {
            Some(raw) => parse_date(raw).ok_or_else(|| {
                AppError::Validation("Check date must be a valid date (YYYY-MM-DD).".to_string())
            })?,
            None => Utc::now().date_naive(),
        };

        let shipment = self.find_shipment(shipment_ref).await?;
        if shipment.status != ScheduleStatus::Delivered {
            return Err(AppError::Conflict(
                "Quality checks can only be logged for delivered shipments".to_string(),
            ));
        }

        let check = QualityCheckLog {
            id: Uuid::new_v4().to_string(),
            shipment_id: shipment.shipment_id,
            condition,
            remarks: non_blank(request.remarks.as_deref()).map(str::to_string),
            check_date,
            checked_by: checked_by.to_string(),
            created_at: Utc::now(),
        };
        self.checks.insert(&check).await?;
        info!(
            "🔍 Control de calidad para {}: {:?}",
            check.shipment_id, check.condition
        );
        Ok(check)
    }

    /// Busca por `id` del documento o por `shipmentId`
    async fn find_shipment(&self, reference: &str) -> AppResult<Schedule> {
        if let Some(schedule) = self.schedules.find(reference).await? {
            return Ok(schedule);
        }
        self.schedules
            .list()
            .await?
            .into_iter()
            .find(|s| s.shipment_id == reference)
            .ok_or_else(|| not_found_error("Shipment", reference))
    }
}
