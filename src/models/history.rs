use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::types::{ItemId, Year};

/// Summed activity of one item within one year.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub year: Year,
    pub quantity: Decimal,
    pub total: Decimal
}

impl SeriesPoint {
    pub fn is_zero(&self) -> bool {
        self.quantity.is_zero() && self.total.is_zero()
    }
}

/// The yearly series of a single item, ordered by year ascending with unique years.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemHistory {
    pub item_id: ItemId,
    points: Vec<SeriesPoint>
}

impl ItemHistory {
    /// Builds a history, ordering the points by year.
    ///
    /// Callers are expected to have merged duplicate years already; points sharing a year
    /// are summed here so the invariant holds either way, saturating at the `Decimal` bounds.
    pub fn new(item_id: ItemId, mut points: Vec<SeriesPoint>) -> Self {
        points.sort_by_key(|point| point.year);

        let mut merged: Vec<SeriesPoint> = Vec::with_capacity(points.len());

        for point in points {
            match merged.last_mut() {
                Some(last) if last.year == point.year => {
                    last.quantity = last.quantity.saturating_add(point.quantity);
                    last.total = last.total.saturating_add(point.total);
                }
                _ => merged.push(point)
            }
        }

        Self { item_id, points: merged }
    }

    #[cfg(test)]
    pub fn points(&self) -> &[SeriesPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_all_zero(&self) -> bool {
        self.points.iter().all(SeriesPoint::is_zero)
    }

    pub fn mean_quantity(&self) -> Decimal {
        self.mean(|point| point.quantity)
    }

    pub fn mean_total(&self) -> Decimal {
        self.mean(|point| point.total)
    }

    /// Years as regression features.
    pub fn years(&self) -> Vec<f64> {
        self.points.iter().map(|point| f64::from(point.year)).collect()
    }

    /// Quantities as regression targets; `None` if a value cannot be represented as `f64`.
    pub fn quantities(&self) -> Option<Vec<f64>> {
        self.points.iter().map(|point| point.quantity.to_f64()).collect()
    }

    /// Totals as regression targets; `None` if a value cannot be represented as `f64`.
    pub fn totals(&self) -> Option<Vec<f64>> {
        self.points.iter().map(|point| point.total.to_f64()).collect()
    }

    fn mean(&self, value: impl Fn(&SeriesPoint) -> Decimal) -> Decimal {
        if self.points.is_empty() {
            return Decimal::ZERO;
        }

        let count = Decimal::from(self.points.len());
        let sum = self.points.iter()
            .try_fold(Decimal::ZERO, |sum, point| sum.checked_add(value(point)));

        //NOTE: Averaging the shares stays in range when the plain sum does not
        match sum.and_then(|sum| sum.checked_div(count)) {
            Some(mean) => mean,
            None => self.points.iter()
                .map(|point| value(point).checked_div(count).unwrap_or_default())
                .fold(Decimal::ZERO, Decimal::saturating_add)
        }
    }
}
