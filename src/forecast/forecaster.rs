use rust_decimal::{Decimal, RoundingStrategy};
use tracing::{debug, warn};

use crate::forecast::regression::{RegressionError, Regressor};
use crate::models::{Band, ForecastStrategy, ItemHistory, Prediction};
use crate::types::{to_whole, Year};

/// Histories shorter than this are averaged rather than regressed.
pub const MIN_REGRESSION_YEARS: usize = 3;

/// Produces a one-year-ahead prediction per item.
///
/// Forecasting never fails: every history yields exactly one `Prediction`, degrading to
/// simpler estimates as signal gets thinner or the regression misbehaves. Each call reads
/// only the history it is given, so items can be forecast in any order or in parallel.
pub struct Forecaster<R: Regressor> {
    regressor: R,
    target_year: Year
}

impl<R: Regressor> Forecaster<R> {
    pub fn new(regressor: R, target_year: Year) -> Self {
        Self { regressor, target_year }
    }

    /// Applies the first matching rule:
    /// 1. All-zero history predicts zeros.
    /// 2. Fewer than three years averages two points, or predicts zeros from one.
    /// 3. Otherwise quantity and total are regressed on the year independently, with a +/-10% band.
    /// 4. If the regression fails the historical mean is used with a zero-width band.
    pub fn forecast(&self, history: &ItemHistory) -> Prediction {
        if history.is_all_zero() {
            debug!("Item [{}] has no activity, predicting zero", history.item_id);
            return self.prediction(history, 0, 0, Band::degenerate(), Band::degenerate(), ForecastStrategy::NoActivity);
        }

        if history.len() < MIN_REGRESSION_YEARS {
            let (quantity, total) = if history.len() > 1 {
                (round_floored(history.mean_quantity()), round_floored(history.mean_total()))
            } else {
                (0, 0)
            };

            debug!("Item [{}] has {} year(s) of history, averaging", history.item_id, history.len());
            return self.prediction(history, quantity, total, Band::degenerate(), Band::degenerate(), ForecastStrategy::ThinHistory);
        }

        match self.regress(history) {
            Ok((quantity, total)) => {
                debug!("Item [{}] regressed over {} year(s)", history.item_id, history.len());
                self.prediction(history, quantity, total, Band::heuristic(quantity), Band::heuristic(total), ForecastStrategy::Regression)
            }
            Err(error) => {
                warn!("Regression failed for item [{}], falling back to the historical mean: {error}", history.item_id);

                let quantity = truncate_floored(history.mean_quantity());
                let total = truncate_floored(history.mean_total());

                self.prediction(history, quantity, total, Band::point(quantity), Band::point(total), ForecastStrategy::RegressionFallback)
            }
        }
    }

    fn regress(&self, history: &ItemHistory) -> Result<(i64, i64), RegressionError> {
        let years = history.years();
        let target = f64::from(self.target_year);

        let quantities = history.quantities().ok_or(RegressionError::NonFinite("quantities"))?;
        let totals = history.totals().ok_or(RegressionError::NonFinite("totals"))?;

        let quantity = self.regressor.fit(&years, &quantities)?.predict(target)?;
        let total = self.regressor.fit(&years, &totals)?.predict(target)?;

        Ok((whole_floored(quantity), whole_floored(total)))
    }

    fn prediction(&self, history: &ItemHistory, quantity: i64, total: i64, quantity_band: Band, total_band: Band, strategy: ForecastStrategy) -> Prediction {
        Prediction {
            item_id: history.item_id.clone(),
            year: self.target_year,
            quantity,
            total,
            quantity_band,
            total_band,
            strategy
        }
    }
}

fn round_floored(value: Decimal) -> i64 {
    to_whole(value.round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven)).max(0)
}

fn truncate_floored(value: Decimal) -> i64 {
    to_whole(value.trunc()).max(0)
}

fn whole_floored(value: f64) -> i64 {
    //NOTE: `as` saturates at the i64 bounds
    (value.round_ties_even() as i64).max(0)
}
