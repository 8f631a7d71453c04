//! Run progression.
//!
//! A [`Run`] walks `(biome, stage)` pairs cycle by cycle. Its only persisted
//! state is the seed, the global stage number, the current [`StagePlan`] and
//! the status; everything else (stage counts, position) is recomputed from
//! the seed on restore.

use crate::config::GameConfig;
use crate::error::{ErrorSeverity, GameError};

use super::biome::BiomeId;
use super::generator::{BiomeCounts, StageGenerator, StagePosition};
use super::plan::{RunModifiers, StagePlan};

/// Lifecycle status of a run.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum RunStatus {
    Active,
    Completed,
    Failed,
}

/// Errors raised by run progression.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RunError {
    #[error("run is {status}, not active")]
    NotActive { status: RunStatus },

    #[error(
        "checkpoint at stage {stage_number} is {found_biome}/{found_index}, \
         seed replays to {expected_biome}/{expected_index}"
    )]
    InconsistentCheckpoint {
        stage_number: u64,
        expected_biome: BiomeId,
        expected_index: u32,
        found_biome: BiomeId,
        found_index: u32,
    },

    #[error("checkpoint stage {stage_number} lies beyond {max_cycles} replayable cycles")]
    CheckpointOutOfRange { stage_number: u64, max_cycles: u64 },
}

impl GameError for RunError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NotActive { .. } => ErrorSeverity::Validation,
            Self::InconsistentCheckpoint { .. } | Self::CheckpointOutOfRange { .. } => {
                ErrorSeverity::Internal
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotActive { .. } => "RUN_NOT_ACTIVE",
            Self::InconsistentCheckpoint { .. } => "RUN_INCONSISTENT_CHECKPOINT",
            Self::CheckpointOutOfRange { .. } => "RUN_CHECKPOINT_OUT_OF_RANGE",
        }
    }
}

/// One play-through.
///
/// # Invariants
///
/// - `plan.biome_id` / `plan.index` always match the tracked position
/// - `stages_into_cycle` never exceeds the sum of `counts`
#[derive(Clone, Debug, PartialEq)]
pub struct Run {
    generator: StageGenerator,
    counts: BiomeCounts,
    cycle: u64,
    biome_index: usize,
    stage_index: u32,
    stage_number: u64,
    stages_into_cycle: u64,
    plan: StagePlan,
    status: RunStatus,
}

impl Run {
    /// Start a run at cycle 0, biome 0, stage 0 with the configured lives.
    pub fn start(seed: impl Into<String>, config: &GameConfig) -> Self {
        let generator = StageGenerator::new(seed, config);
        let counts = generator.biome_counts(0);
        let position = StagePosition {
            stage_number: 0,
            cycle: 0,
            biome_index: 0,
            stage_index: 0,
        };
        let plan = generator
            .stage_plan(position, false)
            .with_modifiers(RunModifiers::with_lives(config.starting_lives));

        Self {
            generator,
            counts,
            cycle: 0,
            biome_index: 0,
            stage_index: 0,
            stage_number: 0,
            stages_into_cycle: 0,
            plan,
            status: RunStatus::Active,
        }
    }

    /// Rebuild a run from its persisted checkpoint.
    ///
    /// Cycle lengths are replayed from the seed to locate `stage_number`; the
    /// checkpoint plan must agree with the replayed `(biome, stage)`. Stage
    /// numbers past [`GameConfig::MAX_REPLAY_CYCLES`] cycles are rejected.
    pub fn restore(
        seed: impl Into<String>,
        config: &GameConfig,
        stage_number: u64,
        plan: StagePlan,
        status: RunStatus,
    ) -> Result<Self, RunError> {
        let generator = StageGenerator::new(seed, config);

        let mut cycle = 0;
        let mut remaining = stage_number;
        let mut counts = generator.biome_counts(cycle);
        loop {
            let length = cycle_length(&counts);
            if remaining < length {
                break;
            }
            remaining -= length;
            cycle += 1;
            if cycle >= GameConfig::MAX_REPLAY_CYCLES {
                return Err(RunError::CheckpointOutOfRange {
                    stage_number,
                    max_cycles: GameConfig::MAX_REPLAY_CYCLES,
                });
            }
            counts = generator.biome_counts(cycle);
        }

        let stages_into_cycle = remaining;
        let mut biome_index = 0;
        for &count in &counts {
            if remaining < u64::from(count) {
                break;
            }
            remaining -= u64::from(count);
            biome_index += 1;
        }
        let stage_index = remaining as u32;

        let expected_biome = BiomeId::from_index(biome_index);
        if plan.biome_id != expected_biome || plan.index != stage_index {
            return Err(RunError::InconsistentCheckpoint {
                stage_number,
                expected_biome,
                expected_index: stage_index,
                found_biome: plan.biome_id,
                found_index: plan.index,
            });
        }

        Ok(Self {
            generator,
            counts,
            cycle,
            biome_index,
            stage_index,
            stage_number,
            stages_into_cycle,
            plan,
            status,
        })
    }

    pub fn seed(&self) -> &str {
        self.generator.run_seed()
    }

    pub fn plan(&self) -> &StagePlan {
        &self.plan
    }

    /// Mutable access to the current plan, for explicit run effects.
    pub fn plan_mut(&mut self) -> &mut StagePlan {
        &mut self.plan
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == RunStatus::Active
    }

    pub fn set_status(&mut self, status: RunStatus) {
        self.status = status;
    }

    pub fn biome_index(&self) -> usize {
        self.biome_index
    }

    pub fn stage_index(&self) -> u32 {
        self.stage_index
    }

    pub fn stage_number(&self) -> u64 {
        self.stage_number
    }

    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Stage counts of the current cycle.
    pub fn biome_counts(&self) -> &[u32] {
        &self.counts
    }

    pub fn position(&self) -> StagePosition {
        StagePosition {
            stage_number: self.stage_number,
            cycle: self.cycle,
            biome_index: self.biome_index,
            stage_index: self.stage_index,
        }
    }

    /// Move to the next stage.
    ///
    /// Wraps into the next biome when the current one is exhausted and into a
    /// fresh cycle (new stage counts) after the last biome. Run modifiers
    /// carry forward; the force-next-boss flag is consumed by the new plan.
    pub fn advance(&mut self) -> Result<&StagePlan, RunError> {
        if !self.is_active() {
            return Err(RunError::NotActive {
                status: self.status,
            });
        }

        self.stage_number += 1;
        self.stages_into_cycle += 1;
        self.stage_index += 1;

        let current_count = self.counts.get(self.biome_index).copied().unwrap_or(0);
        if self.stage_index >= current_count {
            self.stage_index = 0;
            self.biome_index += 1;
            if self.biome_index >= GameConfig::BIOME_COUNT {
                self.biome_index = 0;
                self.cycle += 1;
                self.stages_into_cycle = 0;
                self.counts = self.generator.biome_counts(self.cycle);
            }
        }

        let force_boss = self.plan.modifiers.force_next_boss();
        let modifiers = self.plan.modifiers.carry_forward();
        self.plan = self
            .generator
            .stage_plan(self.position(), force_boss)
            .with_modifiers(modifiers);

        Ok(&self.plan)
    }

    /// Total biomes completed since the run began.
    ///
    /// # Formula
    ///
    /// ```text
    /// cycle × biome_count + (biomes fully covered by stages_into_cycle,
    ///                        walked over the current cycle's counts)
    /// ```
    ///
    /// Never decreases while the run advances.
    pub fn biomes_completed(&self) -> u64 {
        let mut remaining = self.stages_into_cycle;
        let mut completed = 0;
        for &count in &self.counts {
            let count = u64::from(count);
            if remaining < count {
                break;
            }
            remaining -= count;
            completed += 1;
        }
        self.cycle * GameConfig::BIOME_COUNT as u64 + completed
    }
}

fn cycle_length(counts: &BiomeCounts) -> u64 {
    counts.iter().map(|&c| u64::from(c)).sum::<u64>().max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GameConfig {
        GameConfig::default().with_intro_mode(false)
    }

    fn with_counts(run: &mut Run, counts: [u32; GameConfig::BIOME_COUNT]) {
        run.counts = counts.into_iter().collect();
    }

    #[test]
    fn advance_wraps_into_new_cycle() {
        let mut run = Run::start("wrap", &config());
        with_counts(&mut run, [5, 5, 5, 5]);
        // Walk to biome 3, stage 4 (the last stage of the cycle).
        for _ in 0..19 {
            run.advance().unwrap();
        }
        assert_eq!((run.biome_index(), run.stage_index()), (3, 4));
        assert_eq!(run.biomes_completed(), 3);

        run.advance().unwrap();
        assert_eq!((run.biome_index(), run.stage_index()), (0, 0));
        assert_eq!(run.cycle(), 1);
        assert_eq!(run.biome_counts(), run.generator.biome_counts(1).as_slice());
        assert_eq!(run.biomes_completed(), 4);

        let mut last = run.biomes_completed();
        for _ in 0..100 {
            run.advance().unwrap();
            let now = run.biomes_completed();
            assert!(now >= last);
            last = now;
        }
    }

    #[test]
    fn plan_tracks_position() {
        let mut run = Run::start("track", &config());
        for _ in 0..60 {
            let plan = run.advance().unwrap().clone();
            assert_eq!(plan.biome_id, BiomeId::from_index(run.biome_index()));
            assert_eq!(plan.index, run.stage_index());
        }
    }

    #[test]
    fn force_boss_is_consumed() {
        let mut run = Run::start("herald", &config());
        run.plan_mut().modifiers.set_force_next_boss(true);
        run.plan_mut().modifiers.scale_attack(2.0);

        let plan = run.advance().unwrap().clone();
        assert_eq!(plan.combat_type, Some(crate::run::CombatType::Boss));
        assert!(!plan.modifiers.force_next_boss());
        assert_eq!(plan.modifiers.attack_multiplier(), 2.0);
    }

    #[test]
    fn restore_replays_position() {
        let config = GameConfig::default();
        let mut run = Run::start("restore", &config);
        for _ in 0..47 {
            run.advance().unwrap();
        }

        let restored = Run::restore(
            "restore",
            &config,
            run.stage_number(),
            run.plan().clone(),
            run.status(),
        )
        .unwrap();
        assert_eq!(restored, run);
    }

    #[test]
    fn restore_rejects_mismatched_plan() {
        let config = GameConfig::default();
        let run = Run::start("restore", &config);
        let err = Run::restore("restore", &config, 3, run.plan().clone(), RunStatus::Active)
            .unwrap_err();
        assert!(matches!(err, RunError::InconsistentCheckpoint { stage_number: 3, .. }));
        assert_eq!(err.severity(), ErrorSeverity::Internal);
    }

    #[test]
    fn restore_rejects_unreachable_stage_numbers() {
        let config = GameConfig::default();
        let plan = StagePlan::choice(BiomeId::Forest, 0);
        let err = Run::restore("x", &config, u64::MAX, plan, RunStatus::Active).unwrap_err();
        assert_eq!(
            err,
            RunError::CheckpointOutOfRange {
                stage_number: u64::MAX,
                max_cycles: GameConfig::MAX_REPLAY_CYCLES,
            }
        );
        assert_eq!(err.error_code(), "RUN_CHECKPOINT_OUT_OF_RANGE");
    }

    #[test]
    fn finished_runs_do_not_advance() {
        let mut run = Run::start("done", &config());
        run.set_status(RunStatus::Failed);
        assert_eq!(
            run.advance().unwrap_err(),
            RunError::NotActive {
                status: RunStatus::Failed
            }
        );
        assert_eq!(run.stage_number(), 0);
    }

    #[test]
    fn start_uses_configured_lives() {
        let run = Run::start("lives", &GameConfig::default().with_starting_lives(3));
        assert_eq!(run.plan().modifiers.lives_remaining(), 3);
        assert_eq!(run.biomes_completed(), 0);
    }
}
