//! Item stat modifiers and their aggregation onto player stats.
//!
//! Formula per stat: `clamp((base + Σ add×stacks) × Π mul^stacks)`

use super::bonus::{Bonus, BonusStack, StatBounds};
use super::player::PlayerStats;
use crate::env::ItemDefinition;

/// Player stats that items may modify.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum StatKind {
    MaxHp,
    Damage,
    Accuracy,
    Dodge,
    ProjectileCount,
    Shield,
    Lifesteal,
    DotMultiplier,
    CritChance,
    CritMultiplier,
}

impl StatKind {
    pub const COUNT: usize = 10;

    pub const ALL: [StatKind; Self::COUNT] = [
        Self::MaxHp,
        Self::Damage,
        Self::Accuracy,
        Self::Dodge,
        Self::ProjectileCount,
        Self::Shield,
        Self::Lifesteal,
        Self::DotMultiplier,
        Self::CritChance,
        Self::CritMultiplier,
    ];

    /// Valid domain of this stat after modifiers.
    pub const fn bounds(self) -> StatBounds {
        match self {
            Self::MaxHp | Self::Damage | Self::ProjectileCount => StatBounds::POSITIVE_COUNT,
            Self::Shield => StatBounds::COUNT,
            Self::Accuracy => StatBounds::fraction(0.99),
            Self::Dodge => StatBounds::fraction(0.75),
            Self::Lifesteal => StatBounds::fraction(0.9),
            Self::CritChance => StatBounds::PROBABILITY,
            Self::DotMultiplier => StatBounds::at_least(0.0),
            Self::CritMultiplier => StatBounds::at_least(1.0),
        }
    }

    const fn slot(self) -> usize {
        self as usize
    }
}

/// How a modifier changes its stat.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ModifierOp {
    /// Additive delta, scaled linearly by stack count.
    Add(f64),
    /// Multiplicative factor, raised to the stack count.
    Mul(f64),
}

/// A declared stat modifier on an item definition.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatModifier {
    pub stat: StatKind,
    pub op: ModifierOp,
}

impl StatModifier {
    pub const fn add(stat: StatKind, value: f64) -> Self {
        Self {
            stat,
            op: ModifierOp::Add(value),
        }
    }

    pub const fn mul(stat: StatKind, factor: f64) -> Self {
        Self {
            stat,
            op: ModifierOp::Mul(factor),
        }
    }

    /// The bonus this modifier contributes at `stacks` stacks.
    fn bonus(&self, stacks: u32) -> Bonus {
        match self.op {
            ModifierOp::Add(value) => Bonus::Flat(value * f64::from(stacks)),
            ModifierOp::Mul(factor) => {
                Bonus::Multiplier(factor.powi(i32::try_from(stacks).unwrap_or(i32::MAX)))
            }
        }
    }
}

/// Apply item stat modifiers to base stats.
///
/// `items` yields each equipped definition with its effective stack count.
/// All additive deltas are summed per stat before any multiplicative factor
/// is applied; every stat is then clamped to [`StatKind::bounds`].
///
/// # Example
/// ```
/// # use rogue_core::stats::{StatKind, StatModifier, apply_item_modifiers, compute_base_stats};
/// # use rogue_core::env::{ItemDefinition, Rarity};
/// let lens = ItemDefinition::new("lens", "Lens", Rarity::Common)
///     .with_modifier(StatModifier::mul(StatKind::Damage, 1.1));
///
/// let base = compute_base_stats(1);
/// let stats = apply_item_modifiers(&base, [(&lens, 3)]);
/// // floor(10 × 1.1³) = 13
/// assert_eq!(stats.damage, 13);
/// ```
pub fn apply_item_modifiers<'a>(
    base: &PlayerStats,
    items: impl IntoIterator<Item = (&'a ItemDefinition, u32)>,
) -> PlayerStats {
    let mut stacks: [BonusStack; StatKind::COUNT] = Default::default();

    for (definition, count) in items {
        if count == 0 {
            continue;
        }
        for modifier in &definition.stat_modifiers {
            stacks[modifier.stat.slot()].add(modifier.bonus(count));
        }
    }

    let mut stats = base.clone();
    for kind in StatKind::ALL {
        let stack = &stacks[kind.slot()];
        if stack.is_empty() {
            continue;
        }
        stats.set(kind, stack.apply(base.get(kind), kind.bounds()));
    }
    stats
}
