use super::ForecastEngine;

use std::collections::BTreeSet;
use std::io::Write;
use std::path::Path;

use anyhow::{anyhow, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tempfile::NamedTempFile;

use crate::config::EngineConfig;
use crate::forecast::{FittedModel, LinearRegressor, RegressionError, Regressor};
use crate::models::{ForecastRow, PipelineError, RawRecord};

#[derive(Clone)]
struct FailingRegressor;

impl Regressor for FailingRegressor {
    fn fit(&self, _years: &[f64], _values: &[f64]) -> Result<Box<dyn FittedModel>, RegressionError> {
        Err(RegressionError::Singular)
    }
}

const HEADER: &str = "PART NO\tPERIOD\tQTY\tTOTAL PRICE (INR)\tCURRENCY\tEX RATE\tCustomer Name";

fn create_temporary_tsv(lines: &[&str]) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;

    writeln!(file, "{HEADER}")?;

    for line in lines {
        writeln!(file, "{line}")?;
    }

    Ok(file)
}

fn tsv_config() -> EngineConfig {
    EngineConfig {
        delimiter: b'\t',
        ..EngineConfig::default()
    }
}

fn raw(item: &str, period: &str, quantity: i64, total: i64, currency: &str, rate: Option<&str>) -> RawRecord {
    RawRecord {
        item_id: Some(item.to_string()),
        period: Some(period.to_string()),
        quantity: Some(quantity.to_string()),
        total: Some(total.to_string()),
        currency: Some(currency.to_string()),
        exchange_rate: rate.map(str::to_string),
        customer: None,
        line: None
    }
}

fn find<'a>(rows: &'a [ForecastRow], item_id: &str) -> Result<&'a ForecastRow> {
    rows.iter()
        .find(|row| row.item_id == item_id)
        .ok_or_else(|| anyhow!("item [{item_id}] missing from output"))
}

/// A mix of every forecasting tier across a handful of items.
fn mixed_records() -> Vec<RawRecord> {
    let mut records = Vec::new();

    for (offset, year) in (2016..=2022).enumerate() {
        let offset = offset as i64;
        records.push(raw("GROWING", &year.to_string(), 10 + offset * 5, 1000 + offset * 120, "INR", None));
        records.push(raw("GROWING", &format!("15-06-{year}"), 1, 7, "USD", Some("80")));
        records.push(raw("NOISY", &format!("01/02/{year}"), (offset * 37) % 11, (offset * 53) % 17, "inr", None));
    }

    records.push(raw("PAIR", "2021", 10, 100, "INR", None));
    records.push(raw("PAIR", "2022", 20, 201, "INR", None));
    records.push(raw("SINGLE", "2020", 9, 90, "INR", None));
    records.push(raw("IDLE", "2019", 0, 0, "INR", None));
    records.push(raw("IDLE", "2020", 0, 0, "INR", None));
    records.push(raw("IDLE", "2021", 0, 0, "INR", None));

    records
}

#[tokio::test]
async fn test_engine_forecasts_a_tsv_ledger() -> Result<()> {
    let file = create_temporary_tsv(&[
        "A\t01-01-2020\t10\t100\tINR\t\tAcme",
        "A\t01-06-2021\t20\t200\tINR\t\t",
        "A\t15-03-2022\t25\t250\tINR\t\t",
        "A\t20-03-2022\t5\t50\tINR\t\tOther",
        "B\t01-01-2021\t10\t100\tINR\t\t",
        "B\t01-01-2022\t20\t200\tINR\t\t",
        "C\t2022\t0\t0\tINR\t\t",
        "D\t2019\t5\t100\tusd\t2\t",
        "E\tbad-date\t1\t1\tINR\t\t",
        "\t2021\t1\t1\tINR\t\t",
    ])?;

    let engine = ForecastEngine::new(LinearRegressor, tsv_config());
    let rows = engine.run(file.path()).await?;

    let items: Vec<&str> = rows.iter().map(|row| row.item_id.as_str()).collect();

    assert_eq!(items, vec!["A", "B", "C", "D"]);
    assert!(rows.iter().all(|row| row.year == 2023 && row.quarter == "Q4" && row.currency == "INR"));

    let a = find(&rows, "A")?;

    assert_eq!((a.predicted_quantity, a.min_quantity, a.max_quantity), (40, 36, 44));
    assert_eq!((a.predicted_total, a.min_total, a.max_total), (400, 360, 440));
    assert_eq!(a.customer, "Acme");

    let b = find(&rows, "B")?;

    assert_eq!((b.predicted_quantity, b.predicted_total), (15, 150));
    assert_eq!((b.min_quantity, b.max_quantity, b.min_total, b.max_total), (0, 0, 0, 0));
    assert_eq!(b.customer, "Unknown");

    let c = find(&rows, "C")?;

    assert_eq!((c.predicted_quantity, c.predicted_total, c.min_quantity, c.max_quantity, c.min_total, c.max_total), (0, 0, 0, 0, 0, 0));

    let d = find(&rows, "D")?;

    assert_eq!((d.predicted_quantity, d.predicted_total), (0, 0));

    Ok(())
}

#[tokio::test]
async fn test_engine_rejects_ledger_missing_required_columns() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    writeln!(file, "PART NO\tQTY\tCURRENCY")?;
    writeln!(file, "A\t1\tINR")?;

    let engine = ForecastEngine::new(LinearRegressor, tsv_config());
    let result = engine.run(file.path()).await;

    assert!(matches!(result, Err(PipelineError::MissingColumns(ref missing)) if missing.contains(&"period")));

    Ok(())
}

#[tokio::test]
async fn test_engine_signals_no_data_when_nothing_survives_cleaning() -> Result<()> {
    let file = create_temporary_tsv(&[
        "A\tnever\t1\t1\tINR\t\t",
        "\t2021\t1\t1\tINR\t\t",
    ])?;

    let engine = ForecastEngine::new(LinearRegressor, tsv_config());
    let result = engine.run(file.path()).await;

    assert!(matches!(result, Err(PipelineError::NoData { rows_read: 2, rows_skipped: 2 })));

    Ok(())
}

#[tokio::test]
async fn test_engine_fails_on_missing_ledger_file() {
    let engine = ForecastEngine::new(LinearRegressor, tsv_config());
    let result = engine.run(Path::new("definitely-missing-ledger.tsv")).await;

    assert!(matches!(result, Err(PipelineError::Io(_))));
}

#[tokio::test]
async fn test_engine_emits_exactly_one_row_per_item() -> Result<()> {
    let records = mixed_records();
    let expected: BTreeSet<String> = records.iter().filter_map(|record| record.item_id.clone()).collect();

    let engine = ForecastEngine::new(LinearRegressor, EngineConfig::default());
    let rows = engine.run_records(records).await?;

    let produced: BTreeSet<String> = rows.iter().map(|row| row.item_id.clone()).collect();

    assert_eq!(rows.len(), expected.len());
    assert_eq!(produced, expected);

    for row in &rows {
        assert!(row.predicted_quantity >= 0);
        assert!(row.predicted_total >= 0);

        if (row.min_quantity, row.max_quantity) != (0, 0) {
            assert!(row.min_quantity <= row.predicted_quantity && row.predicted_quantity <= row.max_quantity);
        }

        if (row.min_total, row.max_total) != (0, 0) {
            assert!(row.min_total <= row.predicted_total && row.predicted_total <= row.max_total);
        }
    }

    Ok(())
}

#[tokio::test]
async fn test_engine_output_is_independent_of_row_order() -> Result<()> {
    let engine = ForecastEngine::new(LinearRegressor, EngineConfig::default());
    let baseline = engine.run_records(mixed_records()).await?;

    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..5 {
        let mut shuffled = mixed_records();
        shuffled.shuffle(&mut rng);

        assert_eq!(engine.run_records(shuffled).await?, baseline);
    }

    let mut reversed = mixed_records();
    reversed.reverse();

    assert_eq!(engine.run_records(reversed).await?, baseline);

    Ok(())
}

#[tokio::test]
async fn test_engine_output_is_independent_of_worker_count() -> Result<()> {
    let single = ForecastEngine::new(LinearRegressor, EngineConfig { workers: 1, ..EngineConfig::default() });
    let many = ForecastEngine::new(LinearRegressor, EngineConfig { workers: 7, ..EngineConfig::default() });

    assert_eq!(single.run_records(mixed_records()).await?, many.run_records(mixed_records()).await?);

    Ok(())
}

#[tokio::test]
async fn test_engine_converts_foreign_currency_before_aggregating() -> Result<()> {
    let engine = ForecastEngine::new(LinearRegressor, EngineConfig::default());
    let rows = engine.run_records(vec![
        raw("FX", "2021", 5, 100, "INR", None),
        raw("FX", "2022", 5, 100, "USD", Some("2")),
    ]).await?;

    let fx = find(&rows, "FX")?;

    // mean of 100 and the converted 200
    assert_eq!(fx.predicted_total, 150);
    assert_eq!(fx.predicted_quantity, 5);

    Ok(())
}

#[tokio::test]
async fn test_engine_survives_a_regressor_that_always_fails() -> Result<()> {
    let engine = ForecastEngine::new(FailingRegressor, EngineConfig::default());
    let rows = engine.run_records(mixed_records()).await?;

    assert_eq!(rows.len(), 5);

    let growing = find(&rows, "GROWING")?;

    // yearly quantities 11..=41 step 5 average 26, yearly totals 1560..=2280 step 120 average 1920
    assert_eq!(growing.predicted_quantity, 26);
    assert_eq!(growing.predicted_total, 1920);
    assert_eq!((growing.min_quantity, growing.max_quantity), (26, 26));
    assert_eq!((growing.min_total, growing.max_total), (1920, 1920));

    let noisy = find(&rows, "NOISY")?;

    assert_eq!(noisy.min_quantity, noisy.predicted_quantity);
    assert_eq!(noisy.max_total, noisy.predicted_total);

    let pair = find(&rows, "PAIR")?;

    assert_eq!((pair.predicted_quantity, pair.predicted_total, pair.min_quantity, pair.max_quantity), (15, 150, 0, 0));

    Ok(())
}

#[tokio::test]
async fn test_engine_skips_a_line_whose_conversion_overflows() -> Result<()> {
    let mut oversized = raw("FX", "2020", 1, 0, "USD", Some("100"));
    oversized.total = Some("1e27".to_string());

    let engine = ForecastEngine::new(LinearRegressor, EngineConfig::default());
    let rows = engine.run_records(vec![
        oversized,
        raw("FX", "2021", 5, 100, "INR", None),
        raw("FX", "2022", 5, 300, "INR", None),
    ]).await?;

    let fx = find(&rows, "FX")?;

    assert_eq!((fx.predicted_quantity, fx.predicted_total), (5, 200));

    Ok(())
}

#[tokio::test]
async fn test_engine_aborts_when_a_yearly_sum_overflows() {
    let huge = || {
        let mut record = raw("BIG", "2022", 1, 0, "INR", None);
        record.total = Some("50000000000000000000000000000".to_string());
        record
    };

    let engine = ForecastEngine::new(LinearRegressor, EngineConfig::default());
    let result = engine.run_records(vec![huge(), huge()]).await;

    assert!(matches!(result, Err(PipelineError::Overflow { field: "total", year: 2022, .. })));
}
