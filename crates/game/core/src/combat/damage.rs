//! Damage calculation.

use crate::effects::DamageModifiers;

/// Calculate the damage of a landed hit before the critical roll.
///
/// # Formula
///
/// ```text
/// base   = max(1, attack - defense)
/// damage = floor(base * damage_multiplier + flat_damage)
/// ```
///
/// The result never goes below zero even with negative flat modifiers.
pub fn calculate_damage(attack: u32, defense: u32, modifiers: &DamageModifiers) -> u32 {
    let base = attack.saturating_sub(defense).max(1);
    to_damage(f64::from(base) * modifiers.damage_multiplier + modifiers.flat_damage)
}

/// Apply a critical multiplier to already-computed damage.
///
/// Multipliers below 1 are treated as 1.
pub fn apply_critical(damage: u32, multiplier: f64) -> u32 {
    to_damage(f64::from(damage) * multiplier.max(1.0))
}

/// Floor a float into the `u32` damage domain.
pub(crate) fn to_damage(value: f64) -> u32 {
    if value.is_nan() || value <= 0.0 {
        return 0;
    }
    value.floor().min(f64::from(u32::MAX)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defense_never_reduces_below_one() {
        let identity = DamageModifiers::default();
        assert_eq!(calculate_damage(10, 1, &identity), 9);
        assert_eq!(calculate_damage(3, 50, &identity), 1);
    }

    #[test]
    fn modifiers_apply_before_flooring() {
        let modifiers = DamageModifiers {
            damage_multiplier: 1.5,
            flat_damage: 0.4,
            ..Default::default()
        };
        // 9 * 1.5 + 0.4 = 13.9
        assert_eq!(calculate_damage(10, 1, &modifiers), 13);
    }

    #[test]
    fn negative_flat_damage_bottoms_out() {
        let modifiers = DamageModifiers {
            flat_damage: -100.0,
            ..Default::default()
        };
        assert_eq!(calculate_damage(10, 0, &modifiers), 0);
    }

    #[test]
    fn critical_floors_again() {
        assert_eq!(apply_critical(9, 1.5), 13);
        assert_eq!(apply_critical(9, 0.5), 9);
    }
}
