use std::collections::HashMap;

use clap::ValueEnum;

use crate::models::{ForecastRow, Prediction};
use crate::types::{ItemId, FORECAST_QUARTER};

pub const UNKNOWN_CUSTOMER: &str = "Unknown";
pub const PLACEHOLDER_CUSTOMERS: [&str; 5] = ["CustomerA", "CustomerB", "CustomerC", "CustomerD", "CustomerE"];

/// Label used for items that never carry a customer name in the ledger.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, ValueEnum)]
pub enum CustomerFallback {
    /// Always `Unknown`.
    #[default]
    Sentinel,
    /// One of `CustomerA`..`CustomerE`, chosen from a stable hash of the item id.
    Pool
}

impl CustomerFallback {
    pub fn label(self, item_id: &str) -> &'static str {
        match self {
            CustomerFallback::Sentinel => UNKNOWN_CUSTOMER,
            CustomerFallback::Pool => {
                let index = stable_hash(item_id) % PLACEHOLDER_CUSTOMERS.len() as u64;
                PLACEHOLDER_CUSTOMERS[index as usize]
            }
        }
    }
}

/// Renders predictions into the fixed output schema.
#[derive(Debug, Clone)]
pub struct Assembler {
    currency: String,
    fallback: CustomerFallback
}

impl Assembler {
    pub fn new(currency: &str, fallback: CustomerFallback) -> Self {
        Self {
            currency: currency.to_string(),
            fallback
        }
    }

    /// Builds one row per prediction, ordered by item id.
    pub fn assemble(&self, predictions: Vec<Prediction>, customers: &HashMap<ItemId, String>) -> Vec<ForecastRow> {
        let mut rows: Vec<ForecastRow> = predictions.into_iter()
            .map(|prediction| {
                let customer = customers.get(&prediction.item_id)
                    .cloned()
                    .unwrap_or_else(|| self.fallback.label(&prediction.item_id).to_string());

                ForecastRow {
                    year: prediction.year,
                    predicted_quantity: prediction.quantity,
                    predicted_total: prediction.total,
                    min_quantity: prediction.quantity_band.min,
                    max_quantity: prediction.quantity_band.max,
                    min_total: prediction.total_band.min,
                    max_total: prediction.total_band.max,
                    currency: self.currency.clone(),
                    customer,
                    quarter: FORECAST_QUARTER.to_string(),
                    item_id: prediction.item_id
                }
            })
            .collect();

        rows.sort_by(|left, right| left.item_id.cmp(&right.item_id));
        rows
    }
}

// FNV-1a, stable across runs and platforms unlike the std hasher.
fn stable_hash(value: &str) -> u64 {
    value.bytes().fold(0xcbf2_9ce4_8422_2325, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(0x0100_0000_01b3)
    })
}
