use super::{Band, Column, ItemHistory, SeriesPoint};

use std::str::FromStr;

use anyhow::Result;
use rust_decimal::Decimal;

fn point(year: i32, quantity: i64, total: i64) -> SeriesPoint {
    SeriesPoint {
        year,
        quantity: Decimal::from(quantity),
        total: Decimal::from(total)
    }
}

#[test]
fn test_column_resolves_aliases_case_insensitively() {
    assert_eq!(Column::from_header("PART NO"), Some(Column::Item));
    assert_eq!(Column::from_header("  part no "), Some(Column::Item));
    assert_eq!(Column::from_header("PERIOD"), Some(Column::Period));
    assert_eq!(Column::from_header("Qty"), Some(Column::Quantity));
    assert_eq!(Column::from_header("TOTAL PRICE (INR)"), Some(Column::Total));
    assert_eq!(Column::from_header("Item Total"), Some(Column::Total));
    assert_eq!(Column::from_header("EX RATE"), Some(Column::ExchangeRate));
    assert_eq!(Column::from_header("Customer Name"), Some(Column::Customer));
    assert_eq!(Column::from_header("exchange_rate"), Some(Column::ExchangeRate));
    assert_eq!(Column::from_header("REMARKS"), None);
}

#[test]
fn test_only_customer_column_is_optional() {
    let optional: Vec<Column> = Column::ALL.into_iter().filter(|column| !column.is_required()).collect();

    assert_eq!(optional, vec![Column::Customer]);
}

#[test]
fn test_history_orders_points_by_year() {
    let history = ItemHistory::new("A".to_string(), vec![point(2022, 3, 30), point(2020, 1, 10), point(2021, 2, 20)]);
    let years: Vec<i32> = history.points().iter().map(|point| point.year).collect();

    assert_eq!(years, vec![2020, 2021, 2022]);
    assert_eq!(history.years(), vec![2020.0, 2021.0, 2022.0]);
}

#[test]
fn test_history_merges_duplicate_years() {
    let history = ItemHistory::new("A".to_string(), vec![point(2020, 1, 10), point(2020, 4, 40)]);

    assert_eq!(history.len(), 1);
    assert_eq!(history.points()[0], point(2020, 5, 50));
}

#[test]
fn test_history_zero_detection_requires_every_point_to_be_zero() {
    let zero = ItemHistory::new("A".to_string(), vec![point(2020, 0, 0), point(2021, 0, 0)]);
    let cancelling = ItemHistory::new("B".to_string(), vec![point(2020, 5, 0), point(2021, -5, 0)]);

    assert!(zero.is_all_zero());
    assert!(!cancelling.is_all_zero());
}

#[test]
fn test_history_means() -> Result<()> {
    let history = ItemHistory::new("A".to_string(), vec![point(2020, 10, 100), point(2021, 15, 101)]);

    assert_eq!(history.mean_quantity(), Decimal::from_str("12.5")?);
    assert_eq!(history.mean_total(), Decimal::from_str("100.5")?);
    assert_eq!(ItemHistory::new("B".to_string(), vec![]).mean_quantity(), Decimal::ZERO);

    Ok(())
}

#[test]
fn test_history_mean_survives_sums_beyond_decimal_range() -> Result<()> {
    let huge = Decimal::from_str("30000000000000000000000000000")?;
    let large = |year| SeriesPoint { year, quantity: Decimal::ONE, total: huge };
    let history = ItemHistory::new("A".to_string(), vec![large(2020), large(2021), large(2022)]);

    assert_eq!(history.mean_total(), huge);
    assert_eq!(history.mean_quantity(), Decimal::ONE);

    Ok(())
}

#[test]
fn test_history_merging_saturates_at_decimal_bounds() -> Result<()> {
    let huge = Decimal::from_str("50000000000000000000000000000")?;
    let large = SeriesPoint { year: 2020, quantity: Decimal::ONE, total: huge };
    let history = ItemHistory::new("A".to_string(), vec![large, large]);

    assert_eq!(history.points()[0].total, Decimal::MAX);
    assert_eq!(history.points()[0].quantity, Decimal::from(2));

    Ok(())
}

#[test]
fn test_heuristic_band_truncates_each_bound() {
    assert_eq!(Band::heuristic(100), Band { min: 90, max: 110 });
    assert_eq!(Band::heuristic(15), Band { min: 13, max: 16 });
    assert_eq!(Band::heuristic(3), Band { min: 2, max: 3 });
    assert_eq!(Band::heuristic(0), Band::degenerate());
}

#[test]
fn test_point_band_sits_on_the_estimate() {
    assert_eq!(Band::point(7), Band { min: 7, max: 7 });
    assert_eq!(Band::degenerate(), Band { min: 0, max: 0 });
}
