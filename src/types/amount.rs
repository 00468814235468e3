use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::types::errors::AmountError;

/// Parses an optional ledger amount.
///
/// Blank values yield `None`. Thousands separators and surrounding whitespace are ignored,
/// scientific notation (`1.5e3`) is accepted.
pub fn parse_amount(value: Option<&str>) -> Result<Option<Decimal>, AmountError> {
    let Some(value) = value else {
        return Ok(None)
    };

    let cleaned: String = value.chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();

    if cleaned.is_empty() {
        return Ok(None);
    }

    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .map(Some)
        .map_err(|error| AmountError::InvalidFormat(format!("[{value}] is not a number: {error}")))
}

/// Converts an already integral decimal to `i64`, saturating at the bounds.
pub fn to_whole(value: Decimal) -> i64 {
    value.to_i64().unwrap_or(if value.is_sign_negative() { i64::MIN } else { i64::MAX })
}
