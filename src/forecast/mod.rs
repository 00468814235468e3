mod forecaster;
mod regression;

pub use forecaster::Forecaster;
pub use regression::{LinearRegressor, Regressor};
#[cfg(test)]
pub use regression::{FittedModel, RegressionError};
