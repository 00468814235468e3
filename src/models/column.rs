/// Canonical ledger columns and the header spellings accepted for each of them.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Column {
    Item,
    Period,
    Quantity,
    Total,
    Currency,
    ExchangeRate,
    Customer
}

impl Column {
    pub const ALL: [Column; 7] = [
        Column::Item,
        Column::Period,
        Column::Quantity,
        Column::Total,
        Column::Currency,
        Column::ExchangeRate,
        Column::Customer
    ];

    /// The field name `RawRecord` deserializes from.
    pub fn canonical(self) -> &'static str {
        match self {
            Column::Item => "item",
            Column::Period => "period",
            Column::Quantity => "quantity",
            Column::Total => "total",
            Column::Currency => "currency",
            Column::ExchangeRate => "exchange_rate",
            Column::Customer => "customer"
        }
    }

    pub fn is_required(self) -> bool {
        self != Column::Customer
    }

    /// Upper-cased header spellings, compared against trimmed, upper-cased source headers.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Column::Item => &["PART NO", "PART_NO", "PART NUMBER", "ITEM", "ITEM ID", "ITEM_ID", "SKU"],
            Column::Period => &["PERIOD", "YEAR", "DATE", "INVOICE DATE"],
            Column::Quantity => &["QTY", "QUANTITY"],
            Column::Total => &["TOTAL PRICE (INR)", "ITEM TOTAL", "TOTAL", "AMOUNT"],
            Column::Currency => &["CURRENCY"],
            Column::ExchangeRate => &["EX RATE", "EXCHANGE RATE", "EXCHANGE_RATE", "RATE"],
            Column::Customer => &["CUSTOMER NAME", "CUSTOMER"]
        }
    }

    /// Resolves a source header to its canonical column, if it is one we know.
    pub fn from_header(header: &str) -> Option<Column> {
        let header = header.trim().to_uppercase();

        Column::ALL.into_iter()
            .find(|column| column.aliases().contains(&header.as_str()) || column.canonical().eq_ignore_ascii_case(&header))
    }
}
