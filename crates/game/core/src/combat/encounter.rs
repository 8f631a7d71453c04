//! Encounter shapes and enemy construction.
//!
//! Three battle shapes share one resolution algorithm and differ only in the
//! enemies they field and their tick budget:
//!
//! | Shape | Enemies | HP | Atk | Def | Hit | Tick cap |
//! |-------|---------|----|-----|-----|-----|----------|
//! | Single | 1 | 18–32 | 6 | 1 | 0.75 | 100 |
//! | Multi | 2–4 | 10–20 each | 4 | 0 | 0.70 | 200 |
//! | Elite | 1 | (18–32) × scale | 6 × scale | 1 × scale | 0.80 | 200 |
//!
//! Elite scale is ×2 for a miniboss and ×4 for a boss, times ×3 more when
//! bosses are blessed.

use arrayvec::ArrayVec;

use crate::config::GameConfig;
use crate::env::SeededRng;
use crate::run::{BiomeId, CombatType};

use super::actor::{ActorKind, ActorState};

/// Enemy list of one battle.
pub type EnemyList = ArrayVec<ActorState, { GameConfig::MAX_ENEMIES }>;

/// Resolution shape of a combat type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum EncounterShape {
    Single,
    Multi,
    Elite,
}

impl EncounterShape {
    pub const fn of(combat_type: CombatType) -> Self {
        match combat_type {
            CombatType::Single => Self::Single,
            CombatType::Multi => Self::Multi,
            CombatType::Miniboss | CombatType::Boss => Self::Elite,
        }
    }

    /// Salt appended to `<run>|<stage>` for this shape's battle seed.
    pub const fn seed_salt(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Multi => "multi",
            Self::Elite => "elite",
        }
    }

    /// Whether a timeout is decided by comparing the two sides' HP.
    pub const fn is_single_target(self) -> bool {
        !matches!(self, Self::Multi)
    }
}

/// Hard tick budget of a combat type.
pub const fn tick_cap(combat_type: CombatType) -> u32 {
    match combat_type {
        CombatType::Single => GameConfig::SINGLE_TICK_CAP,
        CombatType::Multi | CombatType::Miniboss | CombatType::Boss => {
            GameConfig::EXTENDED_TICK_CAP
        }
    }
}

/// Fixed baselines of one enemy template.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyProfile {
    pub hp_min: i64,
    pub hp_max: i64,
    pub attack: u32,
    pub defense: u32,
    pub hit_chance: f64,
    pub crit_chance: f64,
    pub crit_multiplier: f64,
    pub dodge_chance: f64,
    pub block_chance: f64,
}

impl EnemyProfile {
    pub const SINGLE: Self = Self {
        hp_min: 18,
        hp_max: 32,
        attack: 6,
        defense: 1,
        hit_chance: 0.75,
        crit_chance: 0.05,
        crit_multiplier: 1.5,
        dodge_chance: 0.05,
        block_chance: 0.02,
    };

    pub const MULTI: Self = Self {
        hp_min: 10,
        hp_max: 20,
        attack: 4,
        defense: 0,
        hit_chance: 0.70,
        crit_chance: 0.03,
        crit_multiplier: 1.5,
        dodge_chance: 0.05,
        block_chance: 0.0,
    };

    /// Unscaled elite template; see [`elite_scale`].
    pub const ELITE: Self = Self {
        hit_chance: 0.80,
        ..Self::SINGLE
    };

    fn spawn(&self, name: String, rng: &mut SeededRng, scale: u32) -> ActorState {
        let hp = rng.int(self.hp_min, self.hp_max).max(1) as u32;
        let mut enemy = ActorState::new(name, ActorKind::Enemy, hp.saturating_mul(scale));
        enemy.attack = self.attack.saturating_mul(scale);
        enemy.defense = self.defense.saturating_mul(scale);
        enemy.hit_chance = self.hit_chance;
        enemy.crit_chance = self.crit_chance;
        enemy.crit_multiplier = self.crit_multiplier;
        enemy.dodge_chance = self.dodge_chance;
        enemy.block_chance = self.block_chance;
        enemy
    }
}

/// Minimum and maximum number of enemies in a multi-target fight.
pub const MULTI_ENEMY_RANGE: (i64, i64) = (2, 4);

/// Chance that an elite's landed hit sets the player on fire.
pub const ELITE_IGNITE_CHANCE: f64 = 0.25;

/// Stat scale of an elite enemy.
///
/// # Formula
///
/// ```text
/// scale = (miniboss ? 2 : boss ? 4 : 1) × (blessed ? 3 : 1)
/// ```
pub const fn elite_scale(combat_type: CombatType, blessed: bool) -> u32 {
    let base = match combat_type {
        CombatType::Miniboss => 2,
        CombatType::Boss => 4,
        CombatType::Single | CombatType::Multi => 1,
    };
    if blessed { base * 3 } else { base }
}

/// Build the enemies of an encounter, drawing HP (and count) from `rng`.
///
/// # RNG Draws
///
/// - Single / elite: one draw for HP
/// - Multi: one draw for the count, then one per enemy for HP
pub fn spawn_enemies(
    rng: &mut SeededRng,
    combat_type: CombatType,
    biome: BiomeId,
    bosses_blessed: bool,
) -> EnemyList {
    let mut enemies = EnemyList::new();
    match EncounterShape::of(combat_type) {
        EncounterShape::Single => {
            enemies.push(EnemyProfile::SINGLE.spawn(biome.creature().to_string(), rng, 1));
        }
        EncounterShape::Multi => {
            let (min, max) = MULTI_ENEMY_RANGE;
            let count = (rng.int(min, max) as usize).min(GameConfig::MAX_ENEMIES);
            for n in 1..=count {
                let name = format!("{} {n}", biome.creature());
                enemies.push(EnemyProfile::MULTI.spawn(name, rng, 1));
            }
        }
        EncounterShape::Elite => {
            let scale = elite_scale(combat_type, bosses_blessed);
            let mut name = biome.champion(combat_type).to_string();
            if bosses_blessed {
                name = format!("Blessed {name}");
            }
            enemies.push(EnemyProfile::ELITE.spawn(name, rng, scale));
        }
    }
    enemies
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_enemy_hp_in_range() {
        for seed in 0..200 {
            let mut rng = SeededRng::new(seed);
            let enemies = spawn_enemies(&mut rng, CombatType::Single, BiomeId::Forest, false);
            assert_eq!(enemies.len(), 1);
            assert!((18..=32).contains(&enemies[0].hp));
            assert_eq!(enemies[0].attack, 6);
        }
    }

    #[test]
    fn multi_fields_two_to_four() {
        for seed in 0..200 {
            let mut rng = SeededRng::new(seed);
            let enemies = spawn_enemies(&mut rng, CombatType::Multi, BiomeId::Ruins, false);
            assert!((2..=4).contains(&enemies.len()));
            assert!(enemies.iter().all(|e| (10..=20).contains(&e.hp)));
        }
    }

    #[test]
    fn blessed_boss_scales_twelvefold() {
        let mut plain_rng = SeededRng::new(3);
        let mut blessed_rng = SeededRng::new(3);
        let plain = spawn_enemies(&mut plain_rng, CombatType::Boss, BiomeId::Abyss, false);
        let blessed = spawn_enemies(&mut blessed_rng, CombatType::Boss, BiomeId::Abyss, true);

        assert_eq!(plain[0].attack, 24);
        assert_eq!(blessed[0].attack, 72);
        assert_eq!(blessed[0].max_hp, plain[0].max_hp * 3);
        assert!(blessed[0].name.starts_with("Blessed "));
    }

    #[test]
    fn tick_caps_follow_shape() {
        assert_eq!(tick_cap(CombatType::Single), 100);
        assert_eq!(tick_cap(CombatType::Multi), 200);
        assert_eq!(tick_cap(CombatType::Boss), 200);
        assert!(EncounterShape::of(CombatType::Boss).is_single_target());
        assert!(!EncounterShape::of(CombatType::Multi).is_single_target());
    }
}
