//! Status effect application and damage-over-time.

use crate::effects::ItemPipeline;

use super::actor::Combatant;
use super::context::{AttackInfo, BattleContext, StatusApplication};
use super::damage::to_damage;

/// Apply every queued status application.
///
/// Each application fires `apply_status` hooks, which may queue further
/// applications. The drain runs at most `max_rounds` rounds; anything still
/// queued after that is dropped.
///
/// An enemy-sourced application aimed at the player is redirected onto its
/// source while [`BattleContext::status_reflect`] is set. Applications
/// against defeated actors are discarded.
pub fn drain_statuses(ctx: &mut BattleContext, pipeline: &ItemPipeline<'_>, max_rounds: u32) {
    for _ in 0..max_rounds {
        if !ctx.has_pending_statuses() {
            return;
        }
        for application in ctx.take_pending_statuses() {
            apply_one(ctx, pipeline, application);
        }
    }

    let dropped = ctx.take_pending_statuses().len();
    if dropped > 0 {
        ctx.log(format!("{dropped} status effects fizzle"));
    }
}

fn apply_one(ctx: &mut BattleContext, pipeline: &ItemPipeline<'_>, mut application: StatusApplication) {
    if ctx.status_reflect
        && application.target.is_player()
        && let Some(source @ Combatant::Enemy(_)) = application.source
    {
        application.target = source;
        application.source = Some(Combatant::Player);
        let name = ctx.name_of(source).to_string();
        ctx.log(format!("{} is reflected onto {name}", application.status));
    }

    let Some(target) = ctx.actor_mut(application.target) else {
        return;
    };
    if !target.is_alive() || application.stacks == 0 {
        return;
    }
    target.add_status(application.status, application.stacks);
    let name = target.name.clone();
    ctx.log(format!(
        "{name} suffers {} ({})",
        application.status, application.stacks
    ));

    pipeline.apply_status(ctx, &application);
}

/// Deal one tick of damage-over-time to every living actor, then decay.
///
/// # Formula
///
/// ```text
/// player: stacks × per_stack
/// enemy:  floor(stacks × per_stack × dot_multiplier × dot_amplification)
/// ```
///
/// `dot_amplification` is the aggregated damage-pipeline value for an attack
/// by the player on that enemy.
pub fn tick_damage_over_time(ctx: &mut BattleContext, pipeline: &ItemPipeline<'_>) {
    if ctx.player.is_alive() {
        let raw: u32 = ctx
            .player
            .statuses
            .iter()
            .map(|(status, stacks)| stacks.saturating_mul(status.damage_per_stack()))
            .fold(0, u32::saturating_add);
        if raw > 0 {
            let dealt = ctx.player.take_damage(raw);
            let name = ctx.player.name.clone();
            ctx.log(format!("{name} takes {dealt} damage over time"));
        }
        ctx.player.decay_statuses();
    }

    let living: Vec<usize> = ctx.living_enemies().collect();
    for index in living {
        let target = Combatant::Enemy(index);
        let Some(enemy) = ctx.enemies.get(index) else {
            continue;
        };
        if enemy.statuses.is_empty() {
            continue;
        }
        let raw: f64 = enemy
            .statuses
            .iter()
            .map(|(status, stacks)| f64::from(*stacks) * f64::from(status.damage_per_stack()))
            .sum();

        let amplification = pipeline
            .damage_modifiers(
                ctx,
                &AttackInfo {
                    attacker: Combatant::Player,
                    defender: target,
                },
            )
            .dot_amplification;
        let amount = to_damage(raw * ctx.profile.dot_multiplier * amplification);

        if let Some(enemy) = ctx.enemies.get_mut(index) {
            let dealt = enemy.take_damage(amount);
            enemy.decay_statuses();
            if dealt > 0 {
                let name = enemy.name.clone();
                ctx.log(format!("{name} takes {dealt} damage over time"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use arrayvec::ArrayVec;

    use super::*;
    use crate::combat::{ActorKind, ActorState, PlayerProfile, StatusId};
    use crate::effects::ItemHooks;
    use crate::env::{ItemDefinition, ItemInstance, ItemRegistry, Rarity, SeededRng};

    fn context(enemies: usize) -> BattleContext {
        let mut list = ArrayVec::new();
        for n in 0..enemies {
            list.push(ActorState::new(format!("Bat {n}"), ActorKind::Enemy, 20));
        }
        BattleContext::new(
            SeededRng::new(11),
            ActorState::new("Hero", ActorKind::Player, 50),
            PlayerProfile {
                dot_multiplier: 1.5,
                ..Default::default()
            },
            list,
        )
    }

    fn burn(source: Option<Combatant>, target: Combatant) -> StatusApplication {
        StatusApplication {
            source,
            target,
            status: StatusId::Burn,
            stacks: 1,
        }
    }

    #[test]
    fn reflect_redirects_enemy_statuses() {
        let mut ctx = context(1);
        ctx.status_reflect = true;
        ctx.queue_status(burn(Some(Combatant::Enemy(0)), Combatant::Player));
        drain_statuses(&mut ctx, &ItemPipeline::empty(), 4);

        assert_eq!(ctx.player.status_stacks(StatusId::Burn), 0);
        assert_eq!(ctx.enemies[0].status_stacks(StatusId::Burn), 1);
    }

    fn echo(ctx: &mut BattleContext, application: &StatusApplication) {
        ctx.queue_status(*application);
    }

    #[test]
    fn self_feeding_chains_are_bounded() {
        let registry = ItemRegistry::new(vec![
            ItemDefinition::new("echo", "Echo", Rarity::Common).with_hooks(ItemHooks {
                on_apply_status: Some(echo),
                ..Default::default()
            }),
        ])
        .unwrap();
        let pipeline = ItemPipeline::build(&registry, &[ItemInstance::new("echo", 1)], &[]).unwrap();

        let mut ctx = context(1);
        ctx.queue_status(burn(None, Combatant::Enemy(0)));
        drain_statuses(&mut ctx, &pipeline, 3);

        assert_eq!(ctx.enemies[0].status_stacks(StatusId::Burn), 3);
        assert!(!ctx.has_pending_statuses());
    }

    #[test]
    fn enemy_dot_uses_player_multiplier() {
        let mut ctx = context(2);
        ctx.enemies[0].add_status(StatusId::Poison, 3);
        ctx.player.add_status(StatusId::Burn, 2);
        tick_damage_over_time(&mut ctx, &ItemPipeline::empty());

        // 3 stacks × 2 × 1.5
        assert_eq!(ctx.enemies[0].hp, 11);
        assert_eq!(ctx.enemies[0].status_stacks(StatusId::Poison), 2);
        assert_eq!(ctx.enemies[1].hp, 20);
        assert_eq!(ctx.player.hp, 46);
        assert_eq!(ctx.player.status_stacks(StatusId::Burn), 1);
    }

    #[test]
    fn zero_dot_leaves_no_log_line() {
        let mut ctx = context(1);
        ctx.profile.dot_multiplier = 0.0;
        ctx.enemies[0].add_status(StatusId::Poison, 2);
        tick_damage_over_time(&mut ctx, &ItemPipeline::empty());

        assert_eq!(ctx.enemies[0].hp, 20);
        assert_eq!(ctx.enemies[0].status_stacks(StatusId::Poison), 1);
        assert!(ctx.log_lines().is_empty());
    }
}
