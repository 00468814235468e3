use crate::actors::ForecastWorker;
use crate::config::EngineConfig;
use crate::files::LedgerReader;
use crate::forecast::{Forecaster, Regressor};
use crate::models::{CleanRecord, ForecastRow, ItemHistory, PipelineError, RawRecord};
use crate::pipeline::{Aggregation, Assembler, NormalizeReport, Normalizer};
use crate::storage::{PredictionStorage, Storage};
use crate::types::ItemId;
use futures::future::join_all;
use std::io::stdin;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::{spawn_blocking, JoinHandle};
use tracing::{info, warn};

/// Batch forecasting pipeline: ledger in, one forecast row per item out.
pub struct ForecastEngine<R> {
    regressor: R,
    config: EngineConfig
}

impl<R: Regressor + Clone + 'static> ForecastEngine<R> {
    /// Creates an engine that fits item trends with `regressor`.
    pub fn new(regressor: R, config: EngineConfig) -> Self {
        Self { regressor, config }
    }

    /// Runs the whole pipeline over a ledger file.
    ///
    /// Fails without producing any rows when the file cannot be read, lacks a required
    /// column, or has no usable line.
    pub async fn run(&self, path: &Path) -> Result<Vec<ForecastRow>, PipelineError> {
        let (sender, receiver) = mpsc::channel::<RawRecord>(self.config.backpressure);
        let reader_handle = self.spawn_ledger_reader(path.to_path_buf(), sender);
        let (cleaned, report) = self.normalize_stream(receiver).await;

        reader_handle.await
            .map_err(|error| PipelineError::Worker(format!("ledger reader: {error}")))??;

        report.log();
        report.ensure_data()?;

        self.forecast(cleaned, &report).await
    }

    /// Runs the pipeline over a ledger piped through standard input.
    pub async fn run_stdin(&self) -> Result<Vec<ForecastRow>, PipelineError> {
        let reader = LedgerReader::new(self.config.delimiter);

        let records = spawn_blocking(move || reader.read_all(stdin().lock()))
            .await
            .map_err(|error| PipelineError::Worker(format!("ledger reader: {error}")))??;

        self.run_records(records).await
    }

    /// Runs the pipeline over records supplied by some other source.
    pub async fn run_records(&self, records: Vec<RawRecord>) -> Result<Vec<ForecastRow>, PipelineError> {
        let (cleaned, report) = self.normalizer().normalize_all(records)?;
        self.forecast(cleaned, &report).await
    }

    fn normalizer(&self) -> Normalizer {
        Normalizer::new(&self.config.reporting_currency, self.config.default_rate)
    }

    fn spawn_ledger_reader(&self, path: PathBuf, sender: mpsc::Sender<RawRecord>) -> JoinHandle<Result<(), PipelineError>> {
        let reader = LedgerReader::new(self.config.delimiter);

        spawn_blocking(move || {
            for result in reader.open(&path)? {
                match result {
                    Ok(record) => {
                        if sender.blocking_send(record).is_err() {
                            break;
                        }
                    }
                    Err(error) if error.is_io_error() => return Err(error.into()),
                    Err(error) => {
                        warn!("Skipping malformed ledger line: {error}");
                    }
                }
            }

            Ok(())
        })
    }

    async fn normalize_stream(&self, mut receiver: mpsc::Receiver<RawRecord>) -> (Vec<CleanRecord>, NormalizeReport) {
        let normalizer = self.normalizer();
        let mut report = NormalizeReport::default();
        let mut cleaned = Vec::new();

        while let Some(record) = receiver.recv().await {
            if let Some(record) = report.track(normalizer.normalize(record)) {
                cleaned.push(record);
            }
        }

        (cleaned, report)
    }

    async fn forecast(&self, cleaned: Vec<CleanRecord>, report: &NormalizeReport) -> Result<Vec<ForecastRow>, PipelineError> {
        let aggregation = Aggregation::from_records(&cleaned, report)?;
        drop(cleaned);

        let target_year = aggregation.target_year();

        info!(
            "Forecasting {} item(s) for {target_year}, latest observed year is {}, {} item(s) with a customer name",
            aggregation.histories().len(), aggregation.latest_year(), aggregation.customers().len()
        );

        let (histories, customers) = aggregation.into_parts();
        let item_ids: Vec<ItemId> = histories.iter().map(|history| history.item_id.clone()).collect();

        let forecaster = Arc::new(Forecaster::new(self.regressor.clone(), target_year));
        let storage = Arc::new(PredictionStorage::new());

        let workers = shard(histories, self.config.workers).into_iter()
            .enumerate()
            .map(|(worker_id, shard)| ForecastWorker::spawn(worker_id, shard, forecaster.clone(), storage.clone()));

        //NOTE: Wait for every worker before failing so no task outlives the run
        let mut forecast_count = 0;

        for result in join_all(workers).await {
            forecast_count += result.map_err(|error| PipelineError::Worker(error.to_string()))?;
        }

        info!("Forecast {forecast_count} item(s), {} stored", storage.len());

        let predictions = item_ids.iter()
            .map(|item_id| {
                storage.load(item_id)
                    .ok_or_else(|| PipelineError::Worker(format!("No prediction was produced for item [{item_id}]")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let assembler = Assembler::new(&self.config.reporting_currency, self.config.customer_fallback);

        Ok(assembler.assemble(predictions, &customers))
    }
}

/// Deals histories round-robin into at most `workers` non-empty shards.
fn shard(histories: Vec<ItemHistory>, workers: usize) -> Vec<Vec<ItemHistory>> {
    let count = workers.clamp(1, histories.len().max(1));
    let mut shards: Vec<Vec<ItemHistory>> = (0..count).map(|_| Vec::new()).collect();

    for (index, history) in histories.into_iter().enumerate() {
        shards[index % count].push(history);
    }

    shards
}
