//! Item effect presets.
//!
//! Each preset is an [`ItemHooks`] record built from plain functions. Item
//! data files refer to presets by name; [`effect_hooks`] resolves the name.
//!
//! Every hook here runs once per stack of its item, so effects are written
//! for a single stack and scale by repetition.

use rogue_core::effects::{DamageModifiers, HitModifiers, LootContext, LootModifiers};
use rogue_core::{
    AttackInfo, BattleContext, Combatant, HitInfo, ItemHooks, RunHookContext, StatusApplication,
    StatusId,
};

/// Names of every effect preset, in declaration order.
pub const EFFECT_NAMES: &[&str] = &[
    "keen_edge",
    "steady_aim",
    "ward_charm",
    "whetstone",
    "brass_knuckles",
    "toxic_catalyst",
    "venom_vial",
    "vampire_fang",
    "thorn_mail",
    "second_wind",
    "chaos_orb",
    "ember_heart",
    "lucky_coin",
    "treasure_map",
    "lucky_clover",
];

/// Resolve an effect preset by name.
pub fn effect_hooks(name: &str) -> Option<ItemHooks> {
    let hooks = match name {
        "keen_edge" => ItemHooks {
            on_compute_hit_chance: Some(keen_edge),
            ..Default::default()
        },
        "steady_aim" => ItemHooks {
            on_compute_hit_chance: Some(steady_aim),
            ..Default::default()
        },
        "ward_charm" => ItemHooks {
            on_compute_hit_chance: Some(ward_charm),
            ..Default::default()
        },
        "whetstone" => ItemHooks {
            on_compute_damage: Some(whetstone),
            ..Default::default()
        },
        "brass_knuckles" => ItemHooks {
            on_compute_damage: Some(brass_knuckles),
            ..Default::default()
        },
        "toxic_catalyst" => ItemHooks {
            on_compute_damage: Some(toxic_catalyst),
            ..Default::default()
        },
        "venom_vial" => ItemHooks {
            on_after_hit: Some(venom_vial),
            ..Default::default()
        },
        "vampire_fang" => ItemHooks {
            on_after_hit: Some(vampire_fang),
            ..Default::default()
        },
        "thorn_mail" => ItemHooks {
            on_receive_damage: Some(thorn_mail),
            ..Default::default()
        },
        "second_wind" => ItemHooks {
            on_tick: Some(second_wind),
            ..Default::default()
        },
        "chaos_orb" => ItemHooks {
            on_tick: Some(chaos_orb),
            ..Default::default()
        },
        "ember_heart" => ItemHooks {
            on_after_kill: Some(ember_heart),
            ..Default::default()
        },
        "lucky_coin" => ItemHooks {
            on_modify_loot: Some(lucky_coin),
            ..Default::default()
        },
        "treasure_map" => ItemHooks {
            on_modify_loot: Some(treasure_map),
            ..Default::default()
        },
        "lucky_clover" => ItemHooks {
            on_run_start: Some(lucky_clover),
            ..Default::default()
        },
        _ => return None,
    };
    Some(hooks)
}

// ============================================================================
// Probability
// ============================================================================

fn keen_edge(_: &BattleContext, _: &AttackInfo) -> HitModifiers {
    HitModifiers {
        add_crit_chance: 0.05,
        ..Default::default()
    }
}

fn steady_aim(_: &BattleContext, _: &AttackInfo) -> HitModifiers {
    HitModifiers {
        add_hit_chance: 0.03,
        ..Default::default()
    }
}

fn ward_charm(_: &BattleContext, _: &AttackInfo) -> HitModifiers {
    HitModifiers {
        add_dodge_chance: 0.03,
        add_block_chance: 0.01,
        ..Default::default()
    }
}

// ============================================================================
// Damage
// ============================================================================

fn whetstone(_: &BattleContext, _: &AttackInfo) -> DamageModifiers {
    DamageModifiers {
        flat_damage: 1.0,
        ..Default::default()
    }
}

fn brass_knuckles(_: &BattleContext, _: &AttackInfo) -> DamageModifiers {
    DamageModifiers {
        damage_multiplier: 1.1,
        ..Default::default()
    }
}

fn toxic_catalyst(_: &BattleContext, _: &AttackInfo) -> DamageModifiers {
    DamageModifiers {
        dot_amplification: 1.25,
        ..Default::default()
    }
}

// ============================================================================
// Reactions
// ============================================================================

fn venom_vial(ctx: &mut BattleContext, hit: &HitInfo) {
    if hit.attacker.is_player() {
        ctx.queue_status(StatusApplication {
            source: Some(Combatant::Player),
            target: hit.defender,
            status: StatusId::Poison,
            stacks: 1,
        });
    }
}

fn vampire_fang(ctx: &mut BattleContext, hit: &HitInfo) {
    if hit.attacker.is_player() && hit.damage > 0 {
        ctx.player.heal(1);
    }
}

fn thorn_mail(ctx: &mut BattleContext, hit: &HitInfo) {
    if !hit.defender.is_player() {
        return;
    }
    let Some(attacker) = ctx.actor_mut(hit.attacker) else {
        return;
    };
    let dealt = attacker.take_damage(1);
    if dealt > 0 {
        let name = attacker.name.clone();
        ctx.log(format!("Thorns prick {name} for {dealt}"));
    }
}

/// Below a quarter of max HP, regain 2 HP each tick.
fn second_wind(ctx: &mut BattleContext) {
    let player = &mut ctx.player;
    if player.is_alive() && player.hp.saturating_mul(4) < player.max_hp {
        player.heal(2);
    }
}

/// One in five ticks, set a random living enemy on fire.
fn chaos_orb(ctx: &mut BattleContext) {
    if !ctx.rng.chance(0.2) {
        return;
    }
    let living: Vec<usize> = ctx.living_enemies().collect();
    if living.is_empty() {
        return;
    }
    let pick = living[ctx.rng.index(living.len())];
    ctx.queue_status(StatusApplication {
        source: Some(Combatant::Player),
        target: Combatant::Enemy(pick),
        status: StatusId::Burn,
        stacks: 1,
    });
}

/// A kill spreads fire to the next living enemy.
fn ember_heart(ctx: &mut BattleContext, _victim: Combatant) {
    let next = ctx.living_enemies().next();
    if let Some(next) = next {
        ctx.queue_status(StatusApplication {
            source: Some(Combatant::Player),
            target: Combatant::Enemy(next),
            status: StatusId::Burn,
            stacks: 2,
        });
    }
}

// ============================================================================
// Loot and run lifecycle
// ============================================================================

fn lucky_coin(_: &LootContext<'_>) -> LootModifiers {
    LootModifiers {
        rarity_bias: 0.25,
        ..Default::default()
    }
}

fn treasure_map(_: &LootContext<'_>) -> LootModifiers {
    LootModifiers {
        quantity_factor: 4.0 / 3.0,
        ..Default::default()
    }
}

fn lucky_clover(ctx: &mut RunHookContext<'_>) {
    let lives = ctx.plan.modifiers.lives_remaining().saturating_add(1);
    ctx.plan.modifiers.set_lives_remaining(lives);
}

#[cfg(test)]
mod tests {
    use rogue_core::combat::encounter::EnemyList;
    use rogue_core::combat::status::drain_statuses;
    use rogue_core::effects::ItemPipeline;
    use rogue_core::{
        ActorKind, ActorState, BiomeId, ItemDefinition, ItemInstance, ItemRegistry, Rarity,
        SeededRng, StagePlan,
    };

    use super::*;

    #[test]
    fn every_name_resolves() {
        for name in EFFECT_NAMES {
            let hooks = effect_hooks(name).unwrap();
            assert!(!hooks.is_empty(), "{name} has no hooks");
        }
        assert!(effect_hooks("no_such_effect").is_none());
    }

    fn registry_with(effect: &str) -> ItemRegistry {
        ItemRegistry::new(vec![
            ItemDefinition::new(effect, effect, Rarity::Common)
                .with_hooks(effect_hooks(effect).unwrap()),
        ])
        .unwrap()
    }

    #[test]
    fn treasure_map_adds_an_option_per_stack() {
        let registry = registry_with("treasure_map");
        let pipeline =
            ItemPipeline::build(&registry, &[ItemInstance::new("treasure_map", 1)], &[]).unwrap();
        let plan = StagePlan::choice(BiomeId::Forest, 2);
        let loot = pipeline.loot_modifiers(&LootContext {
            plan: &plan,
            stage_number: 2,
        });
        assert_eq!((3.0 * loot.quantity_factor).floor(), 4.0);
    }

    #[test]
    fn lucky_clover_grants_a_life_per_stack() {
        let registry = registry_with("lucky_clover");
        let pipeline =
            ItemPipeline::build(&registry, &[ItemInstance::new("lucky_clover", 2)], &[]).unwrap();

        let mut plan = StagePlan::choice(BiomeId::Forest, 0);
        plan.modifiers.set_lives_remaining(1);
        let mut rng = SeededRng::new(0);
        pipeline.run_start(&mut RunHookContext {
            run_seed: "clover",
            stage_number: 0,
            plan: &mut plan,
            rng: &mut rng,
        });
        assert_eq!(plan.modifiers.lives_remaining(), 3);
    }

    #[test]
    fn thorns_hurt_the_attacker() {
        let mut enemies = EnemyList::new();
        enemies.push(ActorState::new("Wolf", ActorKind::Enemy, 10));
        let mut ctx = BattleContext::new(
            SeededRng::new(0),
            ActorState::new("Hero", ActorKind::Player, 10),
            Default::default(),
            enemies,
        );
        thorn_mail(
            &mut ctx,
            &HitInfo {
                attacker: Combatant::Enemy(0),
                defender: Combatant::Player,
                damage: 3,
                critical: false,
            },
        );
        assert_eq!(ctx.enemies[0].hp, 9);
        assert_eq!(ctx.log_lines(), ["Thorns prick Wolf for 1"]);
    }

    #[test]
    fn ember_heart_burns_the_next_living_enemy() {
        let mut enemies = EnemyList::new();
        for name in ["Slime", "Wolf", "Bat"] {
            enemies.push(ActorState::new(name, ActorKind::Enemy, 10));
        }
        enemies[0].hp = 0;
        let mut ctx = BattleContext::new(
            SeededRng::new(0),
            ActorState::new("Hero", ActorKind::Player, 10),
            Default::default(),
            enemies,
        );
        ember_heart(&mut ctx, Combatant::Enemy(0));
        drain_statuses(&mut ctx, &ItemPipeline::empty(), 4);

        assert_eq!(ctx.enemies[1].status_stacks(StatusId::Burn), 2);
        assert_eq!(ctx.enemies[2].status_stacks(StatusId::Burn), 0);
    }

    #[test]
    fn second_wind_only_below_a_quarter() {
        let mut ctx = BattleContext::new(
            SeededRng::new(0),
            ActorState::new("Hero", ActorKind::Player, 100),
            Default::default(),
            EnemyList::new(),
        );
        ctx.player.hp = 30;
        second_wind(&mut ctx);
        assert_eq!(ctx.player.hp, 30);

        ctx.player.hp = 20;
        second_wind(&mut ctx);
        assert_eq!(ctx.player.hp, 22);
    }
}
