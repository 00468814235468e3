use chrono::{Datelike, NaiveDate, NaiveDateTime};

use crate::types::errors::PeriodError;
use crate::types::Year;

// Day-first, matching how the ledgers are exported.
const DATE_FORMATS: [&str; 10] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d-%m-%Y",
    "%d/%m/%Y",
    "%d.%m.%Y",
    "%d-%b-%Y",
    "%d %b %Y",
    "%d-%m-%y",
    "%d/%m/%y",
    "%d-%b-%y"
];

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%d-%m-%Y %H:%M:%S",
    "%d/%m/%Y %H:%M"
];

const YEAR_RANGE: std::ops::RangeInclusive<Year> = 1000..=9999;

/// Extracts the calendar year from a ledger period value.
///
/// Accepts a bare four digit year, day-first dates in the common separators,
/// abbreviated month names (`05-Mar-2021`, `Mar-2021`) and ISO datetimes.
pub fn parse_year(value: &str) -> Result<Year, PeriodError> {
    let value = value.trim();

    if value.is_empty() {
        return Err(PeriodError::Empty);
    }

    if value.len() == 4 && value.bytes().all(|byte| byte.is_ascii_digit()) {
        if let Ok(year) = value.parse::<Year>() {
            if YEAR_RANGE.contains(&year) {
                return Ok(year);
            }
        }
    }

    let parsed_dates = DATE_FORMATS.iter()
        .filter_map(|format| NaiveDate::parse_from_str(value, format).ok());

    let parsed_datetimes = DATETIME_FORMATS.iter()
        .filter_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|datetime| datetime.date());

    let month_year = NaiveDate::parse_from_str(&format!("01-{value}"), "%d-%b-%Y").ok();

    //NOTE: chrono accepts short years for %Y, so "04-03-21" would otherwise land in year 21
    parsed_dates
        .chain(parsed_datetimes)
        .chain(month_year)
        .map(|date| date.year())
        .find(|year| YEAR_RANGE.contains(year))
        .ok_or_else(|| PeriodError::UnknownFormat(value.to_string()))
}
