use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;

use crate::models::{CleanRecord, ItemHistory, PipelineError, SeriesPoint};
use crate::pipeline::NormalizeReport;
use crate::types::{ItemId, Year};

/// Cleaned ledger grouped into one yearly series per item.
#[derive(Debug, Clone)]
pub struct Aggregation {
    histories: Vec<ItemHistory>,
    latest_year: Year,
    customers: HashMap<ItemId, String>
}

impl Aggregation {
    /// Groups records by (item, year), summing quantity and total.
    ///
    /// Also captures the latest year across the whole ledger, which anchors every item's
    /// forecast, and the first customer name seen for each item in input order.
    ///
    /// # Errors
    /// Returns `PipelineError` if:
    /// - `records` is empty, reported with the counts from `report`.
    /// - A yearly sum no longer fits in a `Decimal`.
    pub fn from_records(records: &[CleanRecord], report: &NormalizeReport) -> Result<Self, PipelineError> {
        let latest_year = records.iter()
            .map(|record| record.year)
            .max()
            .ok_or_else(|| report.no_data())?;

        let mut groups = BTreeMap::<&str, BTreeMap<Year, (Decimal, Decimal)>>::new();
        let mut customers = HashMap::<ItemId, String>::new();

        for record in records {
            let sums = groups.entry(record.item_id.as_str())
                .or_default()
                .entry(record.year)
                .or_default();

            sums.0 = checked_sum(sums.0, record.quantity, record, "quantity")?;
            sums.1 = checked_sum(sums.1, record.total, record, "total")?;

            if let Some(customer) = &record.customer {
                customers.entry(record.item_id.clone())
                    .or_insert_with(|| customer.clone());
            }
        }

        let histories = groups.into_iter()
            .map(|(item_id, years)| {
                let points = years.into_iter()
                    .map(|(year, (quantity, total))| SeriesPoint { year, quantity, total })
                    .collect();

                ItemHistory::new(item_id.to_string(), points)
            })
            .collect();

        Ok(Self { histories, latest_year, customers })
    }

    pub fn latest_year(&self) -> Year {
        self.latest_year
    }

    /// The single year every item is forecast for.
    pub fn target_year(&self) -> Year {
        self.latest_year + 1
    }

    /// Item histories, ordered by item id.
    pub fn histories(&self) -> &[ItemHistory] {
        &self.histories
    }

    pub fn customers(&self) -> &HashMap<ItemId, String> {
        &self.customers
    }

    pub fn into_parts(self) -> (Vec<ItemHistory>, HashMap<ItemId, String>) {
        (self.histories, self.customers)
    }
}

fn checked_sum(sum: Decimal, value: Decimal, record: &CleanRecord, field: &'static str) -> Result<Decimal, PipelineError> {
    sum.checked_add(value).ok_or_else(|| PipelineError::Overflow {
        item_id: record.item_id.clone(),
        year: record.year,
        field
    })
}
