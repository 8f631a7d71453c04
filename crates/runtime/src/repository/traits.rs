//! Collaborator contracts for run persistence and loadouts.

use async_trait::async_trait;
use rogue_core::ItemInstance;

use super::error::Result;
use super::record::{RunId, RunProgress, RunRecord};

/// Repository for run checkpoints and run items.
///
/// This is for DYNAMIC data that changes during a run:
/// - one checkpoint per run, rewritten after every resolved stage
/// - the run's item snapshot, replaced wholesale
///
/// Every method may fail; callers treat a failure as "nothing was
/// persisted" and keep their previous state. Implementations never retry.
#[async_trait]
pub trait RunRepository: Send + Sync {
    /// Create a run and return its stored record.
    async fn create_run(&self, seed: &str, progress: &RunProgress) -> Result<RunRecord>;

    /// The most recently created run that is still active, if any.
    async fn fetch_active_run(&self) -> Result<Option<RunRecord>>;

    /// Overwrite the checkpoint of an existing run.
    async fn update_run_progress(&self, run_id: RunId, progress: &RunProgress)
    -> Result<RunRecord>;

    /// Items owned by a run.
    async fn list_run_items(&self, run_id: RunId) -> Result<Vec<ItemInstance>>;

    /// Replace the items owned by a run.
    async fn replace_run_items(&self, run_id: RunId, items: &[ItemInstance]) -> Result<()>;
}

/// Source of the player's equipped items, snapshotted at run start.
#[async_trait]
pub trait LoadoutRepository: Send + Sync {
    async fn list_loadout(&self) -> Result<Vec<ItemInstance>>;
}
