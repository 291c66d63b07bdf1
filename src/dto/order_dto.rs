use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use crate::utils::validation::positive_decimal;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ShippingInfoRequest {
    #[validate(length(min = 1, max = 100))]
    pub city: String,
    #[validate(length(min = 1, max = 100))]
    pub country: String,
    pub address: Option<String>,
}

// Request para crear una orden
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    /// Identificador opcional; si falta se genera uno `ORD-XXXXXXXX`
    #[validate(length(min = 1, max = 40))]
    pub order_id: Option<String>,

    #[validate(length(min = 2, max = 100))]
    pub customer_name: String,

    #[validate]
    pub shipping_info: ShippingInfoRequest,

    #[validate(custom = "positive_decimal")]
    pub total: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct UpdateOrderStatusRequest {
    pub status: String,
}
