use rust_decimal::Decimal;

use crate::types::{to_whole, ItemId, Year};

/// Which rule of the forecasting policy produced a prediction.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ForecastStrategy {
    /// Every recorded year was zero quantity and zero total.
    NoActivity,
    /// Fewer than three years of history.
    ThinHistory,
    Regression,
    /// Regression failed and the historical mean was used instead.
    RegressionFallback
}

/// Interval around a point prediction.
///
/// This is a fixed heuristic surrogate for uncertainty, not a statistical confidence interval.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub struct Band {
    pub min: i64,
    pub max: i64
}

impl Band {
    /// The (0, 0) band carried by predictions that have not earned a real one.
    pub fn degenerate() -> Self {
        Self::default()
    }

    /// A zero-width band sitting on the point estimate.
    pub fn point(value: i64) -> Self {
        Self { min: value, max: value }
    }

    /// +/-10% of the point estimate, each bound truncated toward zero.
    pub fn heuristic(value: i64) -> Self {
        let value = Decimal::from(value);

        Self {
            min: to_whole((value * Decimal::new(9, 1)).trunc()),
            max: to_whole((value * Decimal::new(11, 1)).trunc())
        }
    }
}

/// One-year-ahead forecast for a single item.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub item_id: ItemId,
    /// Latest year observed across the whole ledger, plus one.
    pub year: Year,
    pub quantity: i64,
    pub total: i64,
    pub quantity_band: Band,
    pub total_band: Band,
    pub strategy: ForecastStrategy
}
