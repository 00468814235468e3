use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::thread::available_parallelism;

use clap::Parser;
use rust_decimal::Decimal;

use crate::pipeline::CustomerFallback;
use crate::types::{DEFAULT_EXCHANGE_RATE, DEFAULT_REPORTING_CURRENCY};

/// Settings threaded through every stage of a run.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Currency every monetary total is converted into.
    pub reporting_currency: String,
    /// Exchange rate used for foreign-currency lines that carry none.
    pub default_rate: Decimal,
    pub customer_fallback: CustomerFallback,
    /// Number of forecast workers.
    pub workers: usize,
    /// Input field delimiter.
    pub delimiter: u8,
    /// Capacity of the reader to normalizer channel.
    pub backpressure: usize
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            reporting_currency: DEFAULT_REPORTING_CURRENCY.to_string(),
            default_rate: Decimal::from(DEFAULT_EXCHANGE_RATE),
            customer_fallback: CustomerFallback::default(),
            workers: default_workers(),
            delimiter: b',',
            backpressure: 256
        }
    }
}

fn default_workers() -> usize {
    available_parallelism().map(NonZeroUsize::get).unwrap_or(1)
}

#[derive(Parser, Debug)]
#[command(name = "sales-forecast-engine", version, about = "One-year-ahead quantity and revenue forecast per item from a sales ledger")]
pub struct Cli {
    /// Sales ledger (CSV or TSV) with one row per transaction line, `-` reads standard input
    pub input: PathBuf,

    /// Output file (stdout by default)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Input delimiter: a single character, or `tab` (default: tab for .tsv/.tab files, comma otherwise)
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,

    /// Output delimiter: a single character, or `tab`
    #[arg(long = "output-delimiter", value_parser = parse_delimiter, default_value = "tab")]
    pub output_delimiter: u8,

    /// Reporting currency all totals are converted into
    #[arg(long, default_value = DEFAULT_REPORTING_CURRENCY)]
    pub currency: String,

    /// Exchange rate for foreign-currency lines without one
    #[arg(long = "default-rate", default_value_t = Decimal::from(DEFAULT_EXCHANGE_RATE))]
    pub default_rate: Decimal,

    /// Customer label for items without a customer name in the ledger
    #[arg(long = "customer-fallback", value_enum, default_value_t = CustomerFallback::Sentinel)]
    pub customer_fallback: CustomerFallback,

    /// Number of forecast workers (default: available parallelism)
    #[arg(long)]
    pub workers: Option<usize>,

    /// Log level written to stderr: error, warn, info, debug, trace
    #[arg(long = "log-level", default_value = "error")]
    pub log_level: String
}

impl Cli {
    pub fn engine_config(&self) -> EngineConfig {
        let defaults = EngineConfig::default();

        EngineConfig {
            reporting_currency: self.currency.trim().to_uppercase(),
            default_rate: self.default_rate,
            customer_fallback: self.customer_fallback,
            workers: self.workers.filter(|workers| *workers > 0).unwrap_or(defaults.workers),
            delimiter: self.delimiter.unwrap_or_else(|| delimiter_for(&self.input)),
            backpressure: defaults.backpressure
        }
    }

    pub fn reads_stdin(&self) -> bool {
        self.input == Path::new("-")
    }
}

/// Tab for `.tsv`/`.tab` files, comma for everything else.
pub fn delimiter_for(path: &Path) -> u8 {
    match path.extension().and_then(|extension| extension.to_str()) {
        Some(extension) if extension.eq_ignore_ascii_case("tsv") || extension.eq_ignore_ascii_case("tab") => b'\t',
        _ => b','
    }
}

fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\\t" | "\t" => Ok(b'\t'),
        _ => match value.as_bytes() {
            [byte] if byte.is_ascii() => Ok(*byte),
            _ => Err(format!("delimiter must be a single ASCII character or `tab`, got [{value}]"))
        }
    }
}
