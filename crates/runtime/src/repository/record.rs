//! Persisted run checkpoint.
//!
//! A run is fully described by its seed, its global stage number, the current
//! [`StagePlan`], its status and whether the current stage was already played;
//! everything else is regenerated from the seed. The JSON shape is the wire
//! contract shared with other clients:
//!
//! ```json
//! {
//!   "id": 1,
//!   "seed": "seed1",
//!   "biomeIndex": 0,
//!   "stageIndex": 0,
//!   "stageNumber": 0,
//!   "stagePlan": { "biomeId": "forest", "index": 0, "type": "combat",
//!                  "combatType": "single", "livesRemaining": 1 },
//!   "status": "active",
//!   "stageResolved": false
//! }
//! ```

use rogue_core::{Run, RunStatus, StagePlan};
use serde::{Deserialize, Serialize};

/// Repository-assigned run identifier.
pub type RunId = u64;

/// Progress fields written on every checkpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunProgress {
    pub biome_index: usize,
    pub stage_index: u32,
    pub stage_number: u64,
    pub stage_plan: StagePlan,
    pub status: RunStatus,
    /// The current stage's outcome is already applied. Absent in older
    /// checkpoints, which read as unresolved.
    #[serde(default)]
    pub stage_resolved: bool,
}

impl RunProgress {
    /// Snapshot the checkpoint fields of a run, with its stage unresolved.
    pub fn of(run: &Run) -> Self {
        Self {
            biome_index: run.biome_index(),
            stage_index: run.stage_index(),
            stage_number: run.stage_number(),
            stage_plan: run.plan().clone(),
            status: run.status(),
            stage_resolved: false,
        }
    }

    pub fn with_stage_resolved(mut self, stage_resolved: bool) -> Self {
        self.stage_resolved = stage_resolved;
        self
    }
}

/// A stored run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunRecord {
    pub id: RunId,
    pub seed: String,
    #[serde(flatten)]
    pub progress: RunProgress,
}

impl RunRecord {
    pub fn new(id: RunId, seed: impl Into<String>, progress: RunProgress) -> Self {
        Self {
            id,
            seed: seed.into(),
            progress,
        }
    }

    pub fn is_active(&self) -> bool {
        self.progress.status == RunStatus::Active
    }
}
