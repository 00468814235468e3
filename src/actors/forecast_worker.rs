use std::sync::Arc;

use tokio::task::{spawn_blocking, JoinHandle};
use tracing::debug;

use crate::forecast::{Forecaster, Regressor};
use crate::models::ItemHistory;
use crate::storage::Storage;

pub struct ForecastWorker;

impl ForecastWorker {
    /// Spawns a worker that forecasts every history in its shard and saves the results.
    ///
    /// The handle resolves to the number of items forecast.
    pub fn spawn<R, S>(worker_id: usize, shard: Vec<ItemHistory>, forecaster: Arc<Forecaster<R>>, storage: Arc<S>) -> JoinHandle<usize>
    where
        R: Regressor + 'static,
        S: Storage
    {
        //NOTE: Forecasting is CPU bound, keep it off the async executor threads
        spawn_blocking(move || {
            for history in &shard {
                let prediction = forecaster.forecast(history);

                debug!(
                    "Worker [{worker_id}] item [{}]:[{:?}] quantity [{}] total [{}]",
                    prediction.item_id, prediction.strategy, prediction.quantity, prediction.total
                );

                storage.save(prediction);
            }

            shard.len()
        })
    }
}
