//! Hit chance calculations.

/// Lowest baseline hit chance a player can have, whatever their accuracy.
pub const PLAYER_HIT_FLOOR: f64 = 0.5;
/// Highest baseline hit chance a player can have.
pub const PLAYER_HIT_CEILING: f64 = 0.99;

/// Baseline hit chance of the player, derived from the accuracy stat.
///
/// NaN accuracy maps to the floor.
pub fn player_hit_baseline(accuracy: f64) -> f64 {
    if accuracy.is_nan() {
        return PLAYER_HIT_FLOOR;
    }
    accuracy.clamp(PLAYER_HIT_FLOOR, PLAYER_HIT_CEILING)
}

/// Calculate the probability that an attack lands.
///
/// # Formula
///
/// ```text
/// hit_chance = base + hit_bonus - (dodge + block + avoid_bonus)
/// clamped to [0, 1]
/// ```
///
/// # Arguments
///
/// * `base` - Attacker's baseline hit chance
/// * `hit_bonus` - Aggregated additive hit chance on the attacker's side
/// * `dodge` / `block` - Defender's own avoidance chances
/// * `avoid_bonus` - Aggregated additive dodge + block on the defender's side
pub fn calculate_hit_chance(
    base: f64,
    hit_bonus: f64,
    dodge: f64,
    block: f64,
    avoid_bonus: f64,
) -> f64 {
    let chance = base + hit_bonus - (dodge + block + avoid_bonus);
    if chance.is_nan() {
        return 0.0;
    }
    chance.clamp(0.0, 1.0)
}

/// Check a roll in `[0, 1)` against a hit chance.
pub fn check_hit(chance: f64, roll: f64) -> bool {
    roll < chance
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_baseline_is_clamped() {
        assert_eq!(player_hit_baseline(0.2), 0.5);
        assert_eq!(player_hit_baseline(0.8), 0.8);
        assert_eq!(player_hit_baseline(1.5), 0.99);
        assert_eq!(player_hit_baseline(f64::NAN), 0.5);
    }

    #[test]
    fn avoidance_is_subtracted_and_clamped() {
        let chance = calculate_hit_chance(0.75, 0.05, 0.05, 0.02, 0.0);
        assert!((chance - 0.73).abs() < 1e-12);

        assert_eq!(calculate_hit_chance(0.5, 0.0, 0.4, 0.4, 0.0), 0.0);
        assert_eq!(calculate_hit_chance(0.9, 0.5, 0.0, 0.0, 0.0), 1.0);
    }

    #[test]
    fn certain_hits_never_miss() {
        assert!(check_hit(1.0, 0.999_999));
        assert!(!check_hit(0.0, 0.0));
    }
}
