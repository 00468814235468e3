mod actors;
mod config;
mod engine;
mod files;
mod forecast;
mod models;
mod pipeline;
mod storage;
mod types;

use std::fs::File;
use std::io::{stderr, stdout, BufWriter, Write};
use std::process::exit;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

use crate::config::Cli;
use crate::engine::ForecastEngine;
use crate::files::ForecastWriter;
use crate::forecast::LinearRegressor;
use crate::models::{ForecastRow, PipelineError};

const EXIT_FAILURE: i32 = 1;
const EXIT_NO_DATA: i32 = 2;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(parse_log_level(&cli.log_level));

    let engine = ForecastEngine::new(LinearRegressor, cli.engine_config());

    let timer = Instant::now();
    let result = if cli.reads_stdin() {
        engine.run_stdin().await
    } else {
        engine.run(&cli.input).await
    };

    let rows = match result {
        Ok(rows) => rows,
        Err(error) => {
            error!("Forecast run aborted: {error}");

            let code = match error {
                PipelineError::NoData { .. } => EXIT_NO_DATA,
                _ => EXIT_FAILURE
            };

            exit(code);
        }
    };
    let duration = timer.elapsed();

    info!("Forecast {} item(s) in: {duration:?}", rows.len());

    write_results(&cli, &rows)?;

    Ok(())
}

fn parse_log_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        _ => {
            eprintln!("Invalid log level '{}', defaulting to 'error'", level);
            LevelFilter::ERROR
        }
    }
}

fn setup_logging(level: LevelFilter) {
    //NOTE: The forecast table may go to stdout, so logging stays on stderr
    let terminal_log = fmt::layer()
        .with_target(false)
        .with_writer(stderr)
        .with_filter(level);

    tracing_subscriber::registry()
        .with(terminal_log)
        .init();
}

fn write_results(cli: &Cli, rows: &[ForecastRow]) -> Result<()> {
    let writer = ForecastWriter::new(cli.output_delimiter);

    match &cli.output {
        Some(path) => {
            let mut output = BufWriter::new(File::create(path)?);
            writer.write(&mut output, rows)?;
            output.flush()?;
            info!("Predictions saved at: {}", path.display());
        }
        None => {
            let mut output = BufWriter::new(stdout().lock());
            writer.write(&mut output, rows)?;
            output.flush()?;
        }
    }

    Ok(())
}
