mod clean_record;
mod column;
mod errors;
mod forecast_row;
mod history;
mod prediction;
mod raw_record;
#[cfg(test)]
mod tests;

pub use clean_record::CleanRecord;
pub use column::Column;
pub use errors::{PipelineError, RecordError};
pub use forecast_row::ForecastRow;
pub use history::{ItemHistory, SeriesPoint};
pub use prediction::{Band, ForecastStrategy, Prediction};
pub use raw_record::RawRecord;
