mod prediction_storage;

use crate::models::Prediction;

pub use prediction_storage::PredictionStorage;

pub trait Storage: Send + Sync + 'static {
    fn load(&self, item_id: &str) -> Option<Prediction>;
    fn save(&self, prediction: Prediction);
}
