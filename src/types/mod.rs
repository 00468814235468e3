mod amount;
mod errors;
mod period;

pub use amount::{parse_amount, to_whole};
pub use errors::{AmountError, PeriodError};
pub use period::parse_year;

pub type ItemId = String;
pub type Year = i32;

pub const DEFAULT_REPORTING_CURRENCY: &str = "INR";
pub const DEFAULT_EXCHANGE_RATE: u32 = 75;

/// Forecasts are yearly but the output schema carries a quarter column.
pub const FORECAST_QUARTER: &str = "Q4";
