//! Seeded stage sequencing.
//!
//! The generator never keeps RNG state between calls. Every table it
//! produces is re-derived from a composite seed, so any `(cycle, biome,
//! stage)` can be regenerated in isolation:
//!
//! - `<run>|cycle|<n>|counts`: stage count of every biome in cycle `n`,
//!   drawn together in biome order
//! - `<run>|<stage>|plan`: the plan of global stage number `<stage>`

use arrayvec::ArrayVec;

use crate::config::GameConfig;
use crate::env::{SeededRng, Weighted, compose_seed};

use super::biome::BiomeId;
use super::plan::{CombatType, StagePlan, StageType};
use super::unique::{UniqueEventId, draw_unique_event};

/// Stage count of every biome in one cycle.
pub type BiomeCounts = ArrayVec<u32, { GameConfig::BIOME_COUNT }>;

/// Inclusive range of stages per biome.
pub const STAGE_COUNT_RANGE: (i64, i64) = (5, 9);

/// Forced first-biome length in intro mode.
pub const INTRO_STAGE_COUNT: u32 = 6;

/// Scripted first biome of an intro run.
const INTRO_SCRIPT: [(StageType, Option<CombatType>, Option<UniqueEventId>); 6] = [
    (StageType::Combat, Some(CombatType::Single), None),
    (StageType::Combat, Some(CombatType::Single), None),
    (StageType::Choice, None, None),
    (StageType::Combat, Some(CombatType::Miniboss), None),
    (StageType::Unique, None, Some(UniqueEventId::Shrine)),
    (StageType::Combat, Some(CombatType::Boss), None),
];

const FIRST_BIOME_STAGE_WEIGHTS: [Weighted<StageType>; 2] = [
    Weighted::new(StageType::Combat, 0.70),
    Weighted::new(StageType::Choice, 0.30),
];

const LATER_STAGE_WEIGHTS: [Weighted<StageType>; 3] = [
    Weighted::new(StageType::Combat, 0.62),
    Weighted::new(StageType::Choice, 0.30),
    Weighted::new(StageType::Unique, 0.08),
];

const FIRST_BIOME_COMBAT_WEIGHTS: [Weighted<CombatType>; 3] = [
    Weighted::new(CombatType::Single, 0.60),
    Weighted::new(CombatType::Multi, 0.30),
    Weighted::new(CombatType::Miniboss, 0.10),
];

const LATER_COMBAT_WEIGHTS: [Weighted<CombatType>; 4] = [
    Weighted::new(CombatType::Single, 0.50),
    Weighted::new(CombatType::Multi, 0.33),
    Weighted::new(CombatType::Miniboss, 0.15),
    Weighted::new(CombatType::Boss, 0.02),
];

/// Where a stage sits in the run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StagePosition {
    /// Global 0-based stage counter.
    pub stage_number: u64,
    pub cycle: u64,
    pub biome_index: usize,
    pub stage_index: u32,
}

/// Deterministic stage sequencer for one run seed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StageGenerator {
    run_seed: String,
    intro_mode: bool,
}

impl StageGenerator {
    pub fn new(run_seed: impl Into<String>, config: &GameConfig) -> Self {
        Self {
            run_seed: run_seed.into(),
            intro_mode: config.intro_mode,
        }
    }

    pub fn run_seed(&self) -> &str {
        &self.run_seed
    }

    pub fn intro_mode(&self) -> bool {
        self.intro_mode
    }

    /// Stage counts of a cycle.
    pub fn biome_counts(&self, cycle: u64) -> BiomeCounts {
        let mut rng =
            SeededRng::from_parts(&[&self.run_seed, "cycle", &cycle.to_string(), "counts"]);
        generate_biome_counts(&mut rng, self.intro_mode && cycle == 0)
    }

    /// Plan of the stage at `position`, without run modifiers.
    pub fn stage_plan(&self, position: StagePosition, force_boss: bool) -> StagePlan {
        let seed = compose_seed(&[&self.run_seed, &position.stage_number.to_string(), "plan"]);
        let mut rng = SeededRng::from_seed_str(&seed);
        let intro = self.intro_mode && position.cycle == 0;
        generate_stage_plan(
            &mut rng,
            intro,
            position.biome_index,
            position.stage_index,
            force_boss,
        )
    }
}

/// Draw one stage count per biome, in biome order.
///
/// With `intro_override` the first biome is forced to
/// [`INTRO_STAGE_COUNT`]; its draw still happens so later biomes see the same
/// stream either way.
pub fn generate_biome_counts(rng: &mut SeededRng, intro_override: bool) -> BiomeCounts {
    let (min, max) = STAGE_COUNT_RANGE;
    let mut counts: BiomeCounts = BiomeId::ALL
        .iter()
        .map(|_| rng.int(min, max) as u32)
        .collect();
    if intro_override && let Some(first) = counts.first_mut() {
        *first = INTRO_STAGE_COUNT;
    }
    counts
}

/// Generate the plan of one stage.
///
/// # Order of Precedence
///
/// 1. Intro script (intro, first biome, stage < 6): fixed, no draws
/// 2. `force_boss`: combat / boss, no draws
/// 3. Weighted stage type, then weighted combat subtype or unique event
///
/// The first biome never rolls unique stages or boss fights. Out-of-range
/// biome indices wrap.
pub fn generate_stage_plan(
    rng: &mut SeededRng,
    intro: bool,
    biome_index: usize,
    stage_index: u32,
    force_boss: bool,
) -> StagePlan {
    let biome = BiomeId::from_index(biome_index);
    let first_biome = biome.index() == 0;

    if intro
        && first_biome
        && let Some(&(stage_type, combat_type, unique_id)) = INTRO_SCRIPT.get(stage_index as usize)
    {
        return StagePlan {
            stage_type,
            combat_type,
            unique_id,
            ..StagePlan::choice(biome, stage_index)
        };
    }

    if force_boss {
        return StagePlan::combat(biome, stage_index, CombatType::Boss);
    }

    let stage_weights: &[Weighted<StageType>] = if first_biome {
        &FIRST_BIOME_STAGE_WEIGHTS
    } else {
        &LATER_STAGE_WEIGHTS
    };
    let stage_type = rng
        .pick_weighted(stage_weights)
        .copied()
        .unwrap_or(StageType::Combat);

    match stage_type {
        StageType::Combat => {
            let combat_weights: &[Weighted<CombatType>] = if first_biome {
                &FIRST_BIOME_COMBAT_WEIGHTS
            } else {
                &LATER_COMBAT_WEIGHTS
            };
            let combat_type = rng
                .pick_weighted(combat_weights)
                .copied()
                .unwrap_or(CombatType::Single);
            StagePlan::combat(biome, stage_index, combat_type)
        }
        StageType::Choice => StagePlan::choice(biome, stage_index),
        StageType::Unique => StagePlan::unique(biome, stage_index, draw_unique_event(rng)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator(seed: &str, intro: bool) -> StageGenerator {
        StageGenerator::new(seed, &GameConfig::default().with_intro_mode(intro))
    }

    fn position(stage_number: u64, cycle: u64, biome_index: usize, stage_index: u32) -> StagePosition {
        StagePosition {
            stage_number,
            cycle,
            biome_index,
            stage_index,
        }
    }

    #[test]
    fn same_seed_same_plan() {
        let generator = generator("abc", false);
        let at = position(5, 0, 0, 5);
        assert_eq!(
            generator.stage_plan(at, false).kind(),
            generator.stage_plan(at, false).kind()
        );
    }

    #[test]
    fn counts_in_range_and_intro_forces_six() {
        for n in 0..50 {
            let seed = format!("counts-{n}");
            let plain = generator(&seed, false).biome_counts(0);
            let intro = generator(&seed, true).biome_counts(0);

            assert!(plain.iter().all(|c| (5..=9).contains(c)));
            assert_eq!(intro[0], INTRO_STAGE_COUNT);
            assert_eq!(plain[1..], intro[1..]);
            // Later cycles are not overridden.
            assert_eq!(
                generator(&seed, true).biome_counts(1),
                generator(&seed, false).biome_counts(1)
            );
        }
    }

    #[test]
    fn intro_script_is_fixed() {
        let generator = generator("any", true);
        let kinds: Vec<_> = (0..6)
            .map(|i| generator.stage_plan(position(i.into(), 0, 0, i), false).kind())
            .collect();
        assert_eq!(
            kinds,
            INTRO_SCRIPT.to_vec(),
            "intro must not depend on the seed"
        );
    }

    #[test]
    fn intro_script_wins_over_force_boss() {
        let generator = generator("any", true);
        let plan = generator.stage_plan(position(2, 0, 0, 2), true);
        assert_eq!(plan.stage_type, StageType::Choice);
    }

    #[test]
    fn force_boss_bypasses_weights() {
        let mut rng = SeededRng::new(42);
        let before = rng.clone();
        let plan = generate_stage_plan(&mut rng, false, 2, 3, true);
        assert_eq!(plan.kind(), (StageType::Combat, Some(CombatType::Boss), None));
        assert_eq!(rng, before);
    }

    #[test]
    fn first_biome_has_no_uniques_or_bosses() {
        for n in 0..2_000u32 {
            let mut rng = SeededRng::new(n);
            let plan = generate_stage_plan(&mut rng, false, 0, 0, false);
            assert_ne!(plan.stage_type, StageType::Unique);
            assert_ne!(plan.combat_type, Some(CombatType::Boss));
        }
    }

    #[test]
    fn later_biomes_roll_uniques() {
        let uniques = (0..2_000u32)
            .filter(|&n| {
                let mut rng = SeededRng::new(n);
                generate_stage_plan(&mut rng, false, 1, 0, false).stage_type == StageType::Unique
            })
            .count();
        // 8% of 2000 ≈ 160.
        assert!((100..230).contains(&uniques), "{uniques}");
    }

    #[test]
    fn biome_index_wraps() {
        let mut a = SeededRng::new(3);
        let mut b = SeededRng::new(3);
        assert_eq!(
            generate_stage_plan(&mut a, false, 6, 1, false),
            generate_stage_plan(&mut b, false, 2, 1, false)
        );
    }
}
