use rust_decimal::Decimal;
use serde::Serialize;

// Conteo mensual de shipments, por mes de salida
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyShipmentReport {
    /// `YYYY-MM`
    pub month: String,
    pub total: usize,
    pub scheduled: usize,
    /// "In Progress" + "In Transit"
    pub in_transit: usize,
    pub delayed: usize,
    pub delivered: usize,
}

// Totales mensuales de combustible
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyFuelReport {
    pub month: String,
    pub entries: usize,
    pub liters: Decimal,
    pub cost: Decimal,
    pub distance: Decimal,
}
