use super::dispatch::Correspondence;
use crate::core::models::ids::ModelId;
use std::collections::HashMap;

/// Memoizes correspondences per model.
///
/// A model's inputs never change once its entry is built, so a stored
/// correspondence stays valid for the lifetime of the entry it came from.
#[derive(Debug, Default, Clone)]
pub struct MappingCache {
    data: HashMap<ModelId, Correspondence>,
}

impl MappingCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, model_id: ModelId) -> Option<&Correspondence> {
        self.data.get(&model_id)
    }

    pub fn insert(&mut self, model_id: ModelId, correspondence: Correspondence) {
        self.data.insert(model_id, correspondence);
    }

    /// Returns the stored correspondence, computing and storing it first if absent.
    pub fn get_or_insert_with<F>(&mut self, model_id: ModelId, compute: F) -> &Correspondence
    where
        F: FnOnce() -> Correspondence,
    {
        self.data.entry(model_id).or_insert_with(compute)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
