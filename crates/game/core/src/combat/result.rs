//! Attack resolution.

use crate::effects::{DamageModifiers, HitModifiers, ItemPipeline};

use super::context::{AttackInfo, BattleContext, HitInfo};
use super::damage::{apply_critical, calculate_damage};
use super::hit::{calculate_hit_chance, check_hit};

/// Outcome of an attack attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttackOutcome {
    /// Attack missed the target.
    Miss,
    /// Attack hit the target.
    Hit,
    /// Attack hit and rolled a critical.
    Critical,
}

/// Result of one attack resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttackResult {
    pub outcome: AttackOutcome,
    /// HP actually removed from the defender (0 on a miss).
    pub damage: u32,
}

impl AttackResult {
    const MISS: Self = Self {
        outcome: AttackOutcome::Miss,
        damage: 0,
    };

    pub fn landed(&self) -> bool {
        self.outcome != AttackOutcome::Miss
    }
}

/// Resolve one attack from `info.attacker` against `info.defender`.
///
/// The same logic runs for every attacker/defender pair. Pipeline bonuses are
/// attributed to the player's side: hit and crit bonuses apply when the
/// player attacks, dodge and block bonuses when the player defends, and
/// damage modifiers only shape the player's own attacks.
///
/// # RNG Draws
///
/// Exactly one draw for the hit roll; one more for the critical roll on a
/// hit. Hooks fired along the way may draw further from the same stream.
///
/// # Hook Order
///
/// `before_attack` → hit roll → `after_hit` (player attacks) or
/// `receive_damage` (player defends). Kill settlement is left to the caller.
pub fn resolve_attack(
    ctx: &mut BattleContext,
    pipeline: &ItemPipeline<'_>,
    info: AttackInfo,
) -> AttackResult {
    pipeline.before_attack(ctx, &info);

    let (Some(attacker), Some(defender)) = (ctx.actor(info.attacker), ctx.actor(info.defender))
    else {
        return AttackResult::MISS;
    };
    if !attacker.is_alive() || !defender.is_alive() {
        return AttackResult::MISS;
    }
    let (base_hit, attack, crit_base, crit_multiplier) = (
        attacker.hit_chance,
        attacker.attack,
        attacker.crit_chance,
        attacker.crit_multiplier,
    );
    let (dodge, block, armor) = (defender.dodge_chance, defender.block_chance, defender.defense);

    let (offense, defense) = attribute(&info, pipeline.hit_modifiers(ctx, &info));
    let chance = calculate_hit_chance(
        base_hit,
        offense.add_hit_chance,
        dodge,
        block,
        defense.add_dodge_chance + defense.add_block_chance,
    );
    let crit_chance = (crit_base + offense.add_crit_chance).clamp(0.0, 1.0);

    let attacker_name = ctx.name_of(info.attacker).to_string();
    let defender_name = ctx.name_of(info.defender).to_string();

    let roll = ctx.rng.next_f64();
    if !check_hit(chance, roll) {
        ctx.log(format!("{attacker_name} missed {defender_name}"));
        return AttackResult::MISS;
    }

    let damage_modifiers = if info.attacker.is_player() {
        pipeline.damage_modifiers(ctx, &info)
    } else {
        DamageModifiers::default()
    };
    let mut damage = calculate_damage(attack, armor, &damage_modifiers);

    let critical = ctx.rng.chance(crit_chance);
    if critical {
        damage = apply_critical(damage, crit_multiplier);
    }

    let dealt = ctx
        .actor_mut(info.defender)
        .map_or(0, |defender| defender.take_damage(damage));

    if critical {
        ctx.log(format!(
            "{attacker_name} critically hits {defender_name} for {dealt}"
        ));
    } else {
        ctx.log(format!("{attacker_name} hits {defender_name} for {dealt}"));
    }

    let hit = HitInfo {
        attacker: info.attacker,
        defender: info.defender,
        damage: dealt,
        critical,
    };
    if info.attacker.is_player() {
        pipeline.after_hit(ctx, &hit);
    }
    if info.defender.is_player() {
        pipeline.receive_damage(ctx, &hit);
    }

    AttackResult {
        outcome: if critical {
            AttackOutcome::Critical
        } else {
            AttackOutcome::Hit
        },
        damage: dealt,
    }
}

/// Split aggregated hit modifiers into the attacker's and defender's share.
fn attribute(info: &AttackInfo, modifiers: HitModifiers) -> (HitModifiers, HitModifiers) {
    let mut offense = HitModifiers::default();
    let mut defense = HitModifiers::default();
    if info.attacker.is_player() {
        offense.add_hit_chance = modifiers.add_hit_chance;
        offense.add_crit_chance = modifiers.add_crit_chance;
    }
    if info.defender.is_player() {
        defense.add_dodge_chance = modifiers.add_dodge_chance;
        defense.add_block_chance = modifiers.add_block_chance;
    }
    (offense, defense)
}
