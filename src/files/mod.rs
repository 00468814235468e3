mod sink;
mod source;

pub use sink::ForecastWriter;
pub use source::LedgerReader;
