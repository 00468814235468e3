use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::models::{CleanRecord, PipelineError, RawRecord, RecordError};
use crate::types::{parse_amount, parse_year};

/// Cleans raw ledger lines into records expressed in a single reporting currency.
#[derive(Debug, Clone)]
pub struct Normalizer {
    reporting_currency: String,
    default_rate: Decimal
}

impl Normalizer {
    pub fn new(reporting_currency: &str, default_rate: Decimal) -> Self {
        Self {
            reporting_currency: reporting_currency.trim().to_uppercase(),
            default_rate
        }
    }

    /// Cleans a single line.
    ///
    /// # Errors
    /// Returns `RecordError` if:
    /// - The item identifier is missing or blank.
    /// - The period cannot be reduced to a calendar year.
    /// - The quantity or total is present but not a number.
    /// - Converting the total into the reporting currency overflows.
    pub fn normalize(&self, record: RawRecord) -> Result<CleanRecord, RecordError> {
        let item_id = match record.item_id.as_deref().map(str::trim) {
            Some(item_id) if !item_id.is_empty() => item_id.to_string(),
            _ => return Err(RecordError::missing_item(&record))
        };

        let year = parse_year(record.period.as_deref().unwrap_or_default())
            .map_err(|error| RecordError::invalid_period(&record, &item_id, error))?;

        let quantity = parse_amount(record.quantity.as_deref())
            .map_err(|error| RecordError::invalid_number(&record, &item_id, "quantity", error))?
            .unwrap_or_default();

        let total = parse_amount(record.total.as_deref())
            .map_err(|error| RecordError::invalid_number(&record, &item_id, "total", error))?
            .unwrap_or_default();

        let exchange_rate = match parse_amount(record.exchange_rate.as_deref()) {
            Ok(Some(rate)) => rate,
            Ok(None) => self.default_rate,
            Err(error) => {
                debug!("Item [{item_id}] exchange rate ignored, using default: {error}");
                self.default_rate
            }
        };

        let currency = record.currency.as_deref()
            .map(|currency| currency.trim().to_uppercase())
            .unwrap_or_default();

        //NOTE: A blank currency is taken to already be the reporting currency
        let total = if currency.is_empty() || currency == self.reporting_currency {
            total
        } else {
            total.checked_mul(exchange_rate)
                .ok_or_else(|| RecordError::conversion_overflow(&record, &item_id, total, &currency, exchange_rate))?
        };

        let customer = record.customer
            .map(|customer| customer.trim().to_string())
            .filter(|customer| !customer.is_empty());

        Ok(CleanRecord {
            item_id,
            year,
            quantity,
            total,
            currency: self.reporting_currency.clone(),
            exchange_rate,
            customer
        })
    }

    /// Cleans a whole batch, failing only when nothing survives.
    pub fn normalize_all(&self, records: impl IntoIterator<Item = RawRecord>) -> Result<(Vec<CleanRecord>, NormalizeReport), PipelineError> {
        let mut report = NormalizeReport::default();

        let cleaned: Vec<CleanRecord> = records.into_iter()
            .filter_map(|record| report.track(self.normalize(record)))
            .collect();

        report.log();
        report.ensure_data()?;

        Ok((cleaned, report))
    }
}

/// Tally of kept and dropped lines for one run.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct NormalizeReport {
    pub rows_read: usize,
    pub kept: usize,
    pub missing_item: usize,
    pub invalid_period: usize,
    pub invalid_number: usize
}

impl NormalizeReport {
    /// Counts the outcome of one line, passing the clean record through.
    pub fn track(&mut self, result: Result<CleanRecord, RecordError>) -> Option<CleanRecord> {
        self.rows_read += 1;

        match result {
            Ok(record) => {
                self.kept += 1;
                Some(record)
            }
            Err(error) => {
                match error {
                    RecordError::MissingItem { .. } => self.missing_item += 1,
                    RecordError::InvalidPeriod { .. } => self.invalid_period += 1,
                    RecordError::InvalidNumber { .. } | RecordError::ConversionOverflow { .. } => self.invalid_number += 1
                }

                warn!("Skipping row: {error}");
                None
            }
        }
    }

    pub fn skipped(&self) -> usize {
        self.missing_item + self.invalid_period + self.invalid_number
    }

    pub fn ensure_data(&self) -> Result<(), PipelineError> {
        if self.kept == 0 {
            return Err(self.no_data());
        }

        Ok(())
    }

    pub fn no_data(&self) -> PipelineError {
        PipelineError::NoData {
            rows_read: self.rows_read,
            rows_skipped: self.skipped()
        }
    }

    pub fn log(&self) {
        info!(
            "Normalized {} of {} row(s): {} without item, {} with unusable period, {} with invalid numbers",
            self.kept, self.rows_read, self.missing_item, self.invalid_period, self.invalid_number
        );
    }
}
