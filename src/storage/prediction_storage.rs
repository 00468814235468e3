use crate::models::Prediction;
use crate::storage::Storage;
use crate::types::ItemId;
use dashmap::DashMap;
use std::sync::Arc;

/// Concurrent store of finished predictions, one per item.
pub struct PredictionStorage {
    cache: Arc<DashMap<ItemId, Prediction>>
}

impl PredictionStorage {
    pub fn new() -> Self {
        Self {
            cache: Arc::new(DashMap::new())
        }
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }
}

impl Storage for PredictionStorage {
    fn load(&self, item_id: &str) -> Option<Prediction> {
        self.cache.get(item_id).map(|entry| entry.value().clone())
    }

    fn save(&self, prediction: Prediction) {
        self.cache.insert(prediction.item_id.clone(), prediction);
    }
}
