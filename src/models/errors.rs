use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::RawRecord;
use crate::types::{AmountError, PeriodError, Year};

/// Reasons a single ledger line is dropped during normalization.
///
/// None of these stop the run; they are counted and logged.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("Line [{line}] has no item identifier")]
    MissingItem {
        line: String
    },
    #[error("Line [{line}] for item [{item_id}] has an unusable period: {source}")]
    InvalidPeriod {
        line: String,
        item_id: String,
        source: PeriodError
    },
    #[error("Line [{line}] for item [{item_id}] has an invalid {field}: {source}")]
    InvalidNumber {
        line: String,
        item_id: String,
        field: &'static str,
        source: AmountError
    },
    #[error("Line [{line}] for item [{item_id}] has a total of {total} {currency} that overflows once converted at {exchange_rate}")]
    ConversionOverflow {
        line: String,
        item_id: String,
        total: Decimal,
        currency: String,
        exchange_rate: Decimal
    }
}

impl RecordError {
    pub fn missing_item(record: &RawRecord) -> Self {
        Self::MissingItem { line: describe_line(record) }
    }

    pub fn invalid_period(record: &RawRecord, item_id: &str, source: PeriodError) -> Self {
        Self::InvalidPeriod {
            line: describe_line(record),
            item_id: item_id.to_string(),
            source
        }
    }

    pub fn invalid_number(record: &RawRecord, item_id: &str, field: &'static str, source: AmountError) -> Self {
        Self::InvalidNumber {
            line: describe_line(record),
            item_id: item_id.to_string(),
            field,
            source
        }
    }

    pub fn conversion_overflow(record: &RawRecord, item_id: &str, total: Decimal, currency: &str, exchange_rate: Decimal) -> Self {
        Self::ConversionOverflow {
            line: describe_line(record),
            item_id: item_id.to_string(),
            total,
            currency: currency.to_string(),
            exchange_rate
        }
    }
}

fn describe_line(record: &RawRecord) -> String {
    record.line.map_or_else(|| "?".to_string(), |line| line.to_string())
}

/// Errors that abort the whole run. No output is written when one of these occurs.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Missing required field(s) in input: {}", .0.join(", "))]
    MissingColumns(Vec<&'static str>),
    #[error("No valid data available: {rows_read} row(s) read, {rows_skipped} skipped during cleaning")]
    NoData {
        rows_read: usize,
        rows_skipped: usize
    },
    #[error("Summed {field} of item [{item_id}] in {year} exceeds the representable range")]
    Overflow {
        item_id: String,
        year: Year,
        field: &'static str
    },
    #[error("Input error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Forecast worker failed: {0}")]
    Worker(String)
}
