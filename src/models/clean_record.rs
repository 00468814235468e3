use rust_decimal::Decimal;

use crate::types::{ItemId, Year};

/// A ledger line after normalization.
///
/// The item is always present, the period has been reduced to a year and the total
/// is expressed in the reporting currency.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanRecord {
    pub item_id: ItemId,
    pub year: Year,
    pub quantity: Decimal,
    /// Monetary total in the reporting currency.
    pub total: Decimal,
    pub currency: String,
    /// The rate applied (or that would have applied) to the line.
    pub exchange_rate: Decimal,
    pub customer: Option<String>
}
