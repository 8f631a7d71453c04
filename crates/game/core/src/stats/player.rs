//! Level curves for the player's base combat stats.

use super::modifiers::StatKind;

/// Effective player stats.
///
/// Produced by [`compute_base_stats`] and refined by
/// [`apply_item_modifiers`](super::apply_item_modifiers). Every field is
/// always inside its [`StatKind::bounds`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct PlayerStats {
    pub max_hp: u32,
    pub damage: u32,
    pub accuracy: f64,
    pub dodge: f64,
    pub projectile_count: u32,
    pub shield: u32,
    pub lifesteal: f64,
    pub dot_multiplier: f64,
    pub crit_chance: f64,
    pub crit_multiplier: f64,
}

impl PlayerStats {
    /// Read a stat as a float.
    pub fn get(&self, kind: StatKind) -> f64 {
        match kind {
            StatKind::MaxHp => f64::from(self.max_hp),
            StatKind::Damage => f64::from(self.damage),
            StatKind::Accuracy => self.accuracy,
            StatKind::Dodge => self.dodge,
            StatKind::ProjectileCount => f64::from(self.projectile_count),
            StatKind::Shield => f64::from(self.shield),
            StatKind::Lifesteal => self.lifesteal,
            StatKind::DotMultiplier => self.dot_multiplier,
            StatKind::CritChance => self.crit_chance,
            StatKind::CritMultiplier => self.crit_multiplier,
        }
    }

    /// Write a stat, clamping it into its valid domain first.
    pub fn set(&mut self, kind: StatKind, value: f64) {
        let value = kind.bounds().clamp(value);
        match kind {
            StatKind::MaxHp => self.max_hp = value as u32,
            StatKind::Damage => self.damage = value as u32,
            StatKind::Accuracy => self.accuracy = value,
            StatKind::Dodge => self.dodge = value,
            StatKind::ProjectileCount => self.projectile_count = value as u32,
            StatKind::Shield => self.shield = value as u32,
            StatKind::Lifesteal => self.lifesteal = value,
            StatKind::DotMultiplier => self.dot_multiplier = value,
            StatKind::CritChance => self.crit_chance = value,
            StatKind::CritMultiplier => self.crit_multiplier = value,
        }
    }
}

/// Base crit chance at every level.
pub const BASE_CRIT_CHANCE: f64 = 0.05;
/// Base crit multiplier at every level.
pub const BASE_CRIT_MULTIPLIER: f64 = 1.5;

/// Compute level-derived base stats.
///
/// # Curves
///
/// With `l = max(level, 1)`:
///
/// ```text
/// max_hp           = 100 + 10(l-1)
/// damage           = 10 + 2(l-1)
/// accuracy         = min(0.95, 0.80 + 0.002(l-1))
/// dodge            = min(0.35, 0.05 + 0.002(l-1))
/// projectile_count = 1 + l/25
/// shield           = l/15
/// lifesteal        = min(0.25, 0.002(l-1))
/// dot_multiplier   = 1 + min(1.0, 0.01(l-1))
/// ```
pub fn compute_base_stats(level: u32) -> PlayerStats {
    let level = level.max(1);
    let steps = f64::from(level - 1);

    let mut stats = PlayerStats {
        max_hp: (level - 1).saturating_mul(10).saturating_add(100),
        damage: (level - 1).saturating_mul(2).saturating_add(10),
        accuracy: (0.80 + 0.002 * steps).min(0.95),
        dodge: (0.05 + 0.002 * steps).min(0.35),
        projectile_count: 1 + level / 25,
        shield: level / 15,
        lifesteal: (0.002 * steps).min(0.25),
        dot_multiplier: 1.0 + (0.01 * steps).min(1.0),
        crit_chance: BASE_CRIT_CHANCE,
        crit_multiplier: BASE_CRIT_MULTIPLIER,
    };

    for kind in StatKind::ALL {
        stats.set(kind, stats.get(kind));
    }

    stats
}
