use serde::Serialize;

use crate::types::{ItemId, Year};

/// A row of the output table, in its fixed column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastRow {
    #[serde(rename = "PART NO")]
    pub item_id: ItemId,
    pub year: Year,
    #[serde(rename = "Predicted Quantity")]
    pub predicted_quantity: i64,
    #[serde(rename = "Predicted Item Total")]
    pub predicted_total: i64,
    #[serde(rename = "Min Quantity")]
    pub min_quantity: i64,
    #[serde(rename = "Max Quantity")]
    pub max_quantity: i64,
    #[serde(rename = "Min Item Total")]
    pub min_total: i64,
    #[serde(rename = "Max Item Total")]
    pub max_total: i64,
    #[serde(rename = "Currency")]
    pub currency: String,
    #[serde(rename = "Customer Name")]
    pub customer: String,
    #[serde(rename = "Quarter")]
    pub quarter: String
}
