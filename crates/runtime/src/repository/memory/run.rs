//! In-memory run repository implementation.

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use rogue_core::ItemInstance;

use crate::repository::{
    RepositoryError, Result, RunId, RunProgress, RunRecord, RunRepository,
};

#[derive(Default)]
struct Store {
    next_id: RunId,
    runs: BTreeMap<RunId, RunRecord>,
    items: BTreeMap<RunId, Vec<ItemInstance>>,
}

/// In-memory run repository for testing and development.
///
/// Thread-safe but not persistent across process restarts.
#[derive(Default)]
pub struct InMemoryRunRepository {
    store: RwLock<Store>,
}

impl InMemoryRunRepository {
    /// Create a new empty in-memory run repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored runs, active or not.
    pub fn len(&self) -> Result<usize> {
        let store = self.store.read().map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(store.runs.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

#[async_trait]
impl RunRepository for InMemoryRunRepository {
    async fn create_run(&self, seed: &str, progress: &RunProgress) -> Result<RunRecord> {
        let mut store = self
            .store
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;

        store.next_id += 1;
        let record = RunRecord::new(store.next_id, seed, progress.clone());
        store.runs.insert(record.id, record.clone());
        store.items.insert(record.id, Vec::new());
        Ok(record)
    }

    async fn fetch_active_run(&self) -> Result<Option<RunRecord>> {
        let store = self.store.read().map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(store.runs.values().rev().find(|r| r.is_active()).cloned())
    }

    async fn update_run_progress(
        &self,
        run_id: RunId,
        progress: &RunProgress,
    ) -> Result<RunRecord> {
        let mut store = self
            .store
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;

        let record = store
            .runs
            .get_mut(&run_id)
            .ok_or(RepositoryError::RunNotFound(run_id))?;
        record.progress = progress.clone();
        Ok(record.clone())
    }

    async fn list_run_items(&self, run_id: RunId) -> Result<Vec<ItemInstance>> {
        let store = self.store.read().map_err(|_| RepositoryError::LockPoisoned)?;
        store
            .items
            .get(&run_id)
            .cloned()
            .ok_or(RepositoryError::RunNotFound(run_id))
    }

    async fn replace_run_items(&self, run_id: RunId, items: &[ItemInstance]) -> Result<()> {
        let mut store = self
            .store
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;

        let slot = store
            .items
            .get_mut(&run_id)
            .ok_or(RepositoryError::RunNotFound(run_id))?;
        *slot = items.to_vec();
        Ok(())
    }
}
