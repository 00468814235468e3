//! Single-feature regression used to extrapolate an item's yearly series.
//!
//! The forecaster only depends on the [`Regressor`] trait, so the fitting algorithm can be
//! swapped without touching the forecasting policy. [`LinearRegressor`] is the default:
//! ordinary least squares on the year.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegressionError {
    #[error("Regression error: requires at least {required} points, got {actual}")]
    InsufficientData {
        required: usize,
        actual: usize
    },
    #[error("Regression error: {features} feature(s) but {targets} target(s)")]
    LengthMismatch {
        features: usize,
        targets: usize
    },
    #[error("Regression error: singular design, the feature has no variance")]
    Singular,
    #[error("Regression error: non-finite value in {0}")]
    NonFinite(&'static str)
}

/// A fitting capability: `fit(years, values)` yields a model that predicts a value for a year.
pub trait Regressor: Send + Sync {
    fn fit(&self, years: &[f64], values: &[f64]) -> Result<Box<dyn FittedModel>, RegressionError>;
}

pub trait FittedModel {
    fn predict(&self, year: f64) -> Result<f64, RegressionError>;
}

/// Ordinary least squares, `value = intercept + slope * (year - mean_year)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearRegressor;

#[derive(Debug, Clone, Copy)]
struct LinearModel {
    intercept: f64,
    slope: f64,
    /// Mean of the training years; centering keeps calendar-sized features well conditioned.
    center: f64
}

impl Regressor for LinearRegressor {
    fn fit(&self, years: &[f64], values: &[f64]) -> Result<Box<dyn FittedModel>, RegressionError> {
        if years.len() != values.len() {
            return Err(RegressionError::LengthMismatch {
                features: years.len(),
                targets: values.len()
            });
        }

        if years.len() < 2 {
            return Err(RegressionError::InsufficientData {
                required: 2,
                actual: years.len()
            });
        }

        if !years.iter().all(|year| year.is_finite()) {
            return Err(RegressionError::NonFinite("features"));
        }

        if !values.iter().all(|value| value.is_finite()) {
            return Err(RegressionError::NonFinite("targets"));
        }

        let n = years.len() as f64;
        let center = years.iter().sum::<f64>() / n;
        let mean_value = values.iter().sum::<f64>() / n;

        let sum_xx: f64 = years.iter().map(|year| (year - center).powi(2)).sum();
        let sum_xy: f64 = years.iter()
            .zip(values)
            .map(|(year, value)| (year - center) * (value - mean_value))
            .sum();

        if sum_xx.abs() < 1e-10 {
            return Err(RegressionError::Singular);
        }

        let slope = sum_xy / sum_xx;

        if !slope.is_finite() || !mean_value.is_finite() {
            return Err(RegressionError::NonFinite("coefficients"));
        }

        Ok(Box::new(LinearModel {
            intercept: mean_value,
            slope,
            center
        }))
    }
}

impl FittedModel for LinearModel {
    fn predict(&self, year: f64) -> Result<f64, RegressionError> {
        let value = self.intercept + self.slope * (year - self.center);

        if !value.is_finite() {
            return Err(RegressionError::NonFinite("prediction"));
        }

        Ok(value)
    }
}
