//! Modelo de Order
//!
//! Las órdenes las crea el flujo de cliente; el scheduler sólo toma las que
//! están en estado `confirmed`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::repositories::Entity;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum OrderStatus {
    #[serde(rename = "confirmed")]
    Confirmed,
    Pending,
    Scheduled,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::Confirmed,
        OrderStatus::Pending,
        OrderStatus::Scheduled,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Pending => "Pending",
            OrderStatus::Scheduled => "Scheduled",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    /// Estados que sólo el flujo de shipments puede asignar o abandonar
    pub fn is_managed_by_shipments(self) -> bool {
        matches!(self, OrderStatus::Scheduled | OrderStatus::Delivered)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| format!("Unknown order status '{}'", value.trim()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShippingInfo {
    pub city: String,
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub customer_name: String,
    pub shipping_info: ShippingInfo,
    pub total: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Order {
    const COLLECTION: &'static str = "orders";
    const LABEL: &'static str = "Order";

    fn key(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirmed_keeps_lowercase_label() {
        assert_eq!(serde_json::to_value(OrderStatus::Confirmed).unwrap(), "confirmed");
        assert_eq!("Confirmed".parse::<OrderStatus>().unwrap(), OrderStatus::Confirmed);
        assert_eq!("shipped".parse::<OrderStatus>().unwrap(), OrderStatus::Shipped);
        assert!("lost".parse::<OrderStatus>().is_err());
    }
}
