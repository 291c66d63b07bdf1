use serde::Deserialize;

use crate::models::ShipmentCondition;

// Request para registrar un control de calidad
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateQualityCheckRequest {
    /// `id` del schedule o su `shipmentId`
    pub shipment_id: Option<String>,
    pub condition: Option<ShipmentCondition>,
    pub remarks: Option<String>,
    pub check_date: Option<String>,
}
