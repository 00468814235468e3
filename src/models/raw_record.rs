use serde::Deserialize;

/// Represents a single transaction line from the sales ledger.
///
/// Field names are the canonical column names; source headers are mapped onto them
/// before deserialization (see [`Column`](crate::models::Column)). Every field is kept
/// as text so that cleaning decisions belong to the normalizer, not to the reader.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRecord {
    /// The stock-keeping identifier.
    #[serde(rename = "item")]
    pub item_id: Option<String>,
    /// Date-like value convertible to a calendar year.
    pub period: Option<String>,
    pub quantity: Option<String>,
    /// Monetary total of the line, in `currency`.
    pub total: Option<String>,
    pub currency: Option<String>,
    pub exchange_rate: Option<String>,
    #[serde(default)]
    pub customer: Option<String>,
    /// Source line number, when read from a file.
    #[serde(skip)]
    pub line: Option<u64>
}
