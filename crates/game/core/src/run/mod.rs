//! Run progression: biomes, stage plans, unique events and rewards.
//!
//! Stage sequencing is a pure function of the run seed. Given a seed and a
//! global stage number, [`StageGenerator`] regenerates the same biome stage
//! counts and the same [`StagePlan`] on every device; [`Run`] tracks the
//! position and carries run modifiers from plan to plan.

mod biome;
pub mod generator;
mod plan;
mod progress;
pub mod reward;
pub mod unique;

pub use biome::BiomeId;
pub use generator::{
    BiomeCounts, StageGenerator, StagePosition, generate_biome_counts, generate_stage_plan,
};
pub use plan::{CombatType, RunModifiers, StagePlan, StageType};
pub use progress::{Run, RunError, RunStatus};
pub use reward::{RewardOffer, grant_item, roll_reward_offer};
pub use unique::{UniqueEventEffect, UniqueEventId, apply_unique_event, draw_unique_event};
