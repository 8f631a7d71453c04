//! Modifier records returned by item hooks and their aggregation rules.
//!
//! Each hook invocation returns a partial record; fields a hook does not set
//! keep the identity value from `Default`:
//!
//! | Record | Additive fields (Σ) | Multiplicative fields (Π) |
//! |--------|---------------------|---------------------------|
//! | [`HitModifiers`] | all | none |
//! | [`DamageModifiers`] | `flat_damage` | `damage_multiplier`, `dot_amplification` |
//! | [`LootModifiers`] | `rarity_bias` | `quantity_factor` |

use core::iter::{Product, Sum};
use core::ops::{Add, Mul};

/// Additive probability bonuses for one attack resolution.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HitModifiers {
    pub add_crit_chance: f64,
    pub add_hit_chance: f64,
    pub add_dodge_chance: f64,
    pub add_block_chance: f64,
}

impl Add for HitModifiers {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            add_crit_chance: self.add_crit_chance + rhs.add_crit_chance,
            add_hit_chance: self.add_hit_chance + rhs.add_hit_chance,
            add_dodge_chance: self.add_dodge_chance + rhs.add_dodge_chance,
            add_block_chance: self.add_block_chance + rhs.add_block_chance,
        }
    }
}

impl Sum for HitModifiers {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

/// Damage shaping for one attack resolution.
///
/// Multiple damage-boosting items compound multiplicatively.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DamageModifiers {
    pub damage_multiplier: f64,
    pub flat_damage: f64,
    pub dot_amplification: f64,
}

impl Default for DamageModifiers {
    fn default() -> Self {
        Self {
            damage_multiplier: 1.0,
            flat_damage: 0.0,
            dot_amplification: 1.0,
        }
    }
}

impl Mul for DamageModifiers {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self {
            damage_multiplier: self.damage_multiplier * rhs.damage_multiplier,
            flat_damage: self.flat_damage + rhs.flat_damage,
            dot_amplification: self.dot_amplification * rhs.dot_amplification,
        }
    }
}

impl Product for DamageModifiers {
    fn product<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Mul::mul)
    }
}

/// Reward shaping for choice stages.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LootModifiers {
    pub quantity_factor: f64,
    pub rarity_bias: f64,
}

impl Default for LootModifiers {
    fn default() -> Self {
        Self {
            quantity_factor: 1.0,
            rarity_bias: 0.0,
        }
    }
}

impl Mul for LootModifiers {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self {
            quantity_factor: self.quantity_factor * rhs.quantity_factor,
            rarity_bias: self.rarity_bias + rhs.rarity_bias,
        }
    }
}

impl Product for LootModifiers {
    fn product<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Mul::mul)
    }
}
