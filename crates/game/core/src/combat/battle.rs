//! Tick-based battle resolution.
//!
//! [`run_battle`] is the single entry point for all three encounter shapes.
//! A battle is a pure function of its [`BattleRequest`] and the equipped
//! [`ItemPipeline`]: the same request always produces the same
//! [`BattleReport`], log lines included.

use crate::config::GameConfig;
use crate::effects::ItemPipeline;
use crate::env::{SeededRng, compose_seed};
use crate::run::{BiomeId, CombatType, StagePlan, StageType};
use crate::stats::PlayerStats;

use super::actor::{ActorKind, ActorState, Combatant, StatusId};
use super::context::{AttackInfo, BattleContext, PlayerProfile, StatusApplication};
use super::damage::to_damage;
use super::encounter::{ELITE_IGNITE_CHANCE, EncounterShape, spawn_enemies, tick_cap};
use super::hit::player_hit_baseline;
use super::result::resolve_attack;
use super::status::{drain_statuses, tick_damage_over_time};

/// Final result of a battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum BattleOutcome {
    Win,
    Loss,
}

/// Everything a battle needs besides the equipped items.
#[derive(Clone, Debug, PartialEq)]
pub struct BattleRequest {
    pub combat_type: CombatType,
    pub biome: BiomeId,
    /// Composite battle seed, e.g. `"<run>|<stage>|single"`.
    pub seed: String,
    /// Effective player stats (level curve + item modifiers).
    pub stats: PlayerStats,
    pub attack_multiplier: f64,
    pub max_hp_multiplier: f64,
    pub bosses_blessed: bool,
    pub status_reflect: bool,
    pub status_chain_depth: u32,
}

impl BattleRequest {
    pub fn new(
        combat_type: CombatType,
        biome: BiomeId,
        seed: impl Into<String>,
        stats: PlayerStats,
    ) -> Self {
        Self {
            combat_type,
            biome,
            seed: seed.into(),
            stats,
            attack_multiplier: 1.0,
            max_hp_multiplier: 1.0,
            bosses_blessed: false,
            status_reflect: false,
            status_chain_depth: GameConfig::DEFAULT_STATUS_CHAIN_DEPTH,
        }
    }

    /// Build the request for a combat stage of a run.
    ///
    /// Returns `None` when the plan is not a combat stage.
    pub fn for_stage(
        run_seed: &str,
        stage_number: u64,
        plan: &StagePlan,
        stats: PlayerStats,
        config: &GameConfig,
    ) -> Option<Self> {
        if plan.stage_type != StageType::Combat {
            return None;
        }
        let combat_type = plan.combat_type?;
        let salt = EncounterShape::of(combat_type).seed_salt();
        let seed = compose_seed(&[run_seed, &stage_number.to_string(), salt]);

        let modifiers = &plan.modifiers;
        Some(Self {
            attack_multiplier: modifiers.attack_multiplier(),
            max_hp_multiplier: modifiers.max_hp_multiplier(),
            bosses_blessed: modifiers.bosses_blessed(),
            status_reflect: modifiers.status_reflect(),
            status_chain_depth: config.status_chain_depth,
            ..Self::new(combat_type, plan.biome_id, seed, stats)
        })
    }
}

/// Aggregate result of a battle; the only state that outlives it.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct BattleReport {
    pub outcome: BattleOutcome,
    /// Ordered, human-readable event log. Never empty.
    pub log: Vec<String>,
    pub enemies_killed: u32,
    pub ticks: u32,
    pub player_hp: u32,
    pub player_max_hp: u32,
}

/// Build the player's battle actor from effective stats.
///
/// # Formula
///
/// ```text
/// max_hp = max(1, floor(stats.max_hp × max_hp_multiplier))
/// attack = max(1, floor(stats.damage × attack_multiplier))
/// ```
pub fn player_actor(
    stats: &PlayerStats,
    attack_multiplier: f64,
    max_hp_multiplier: f64,
) -> (ActorState, PlayerProfile) {
    let max_hp = to_damage(f64::from(stats.max_hp) * max_hp_multiplier).max(1);
    let mut player = ActorState::new("Hero", ActorKind::Player, max_hp);
    player.attack = to_damage(f64::from(stats.damage) * attack_multiplier).max(1);
    player.defense = stats.shield;
    player.hit_chance = player_hit_baseline(stats.accuracy);
    player.crit_chance = stats.crit_chance;
    player.crit_multiplier = stats.crit_multiplier;
    player.dodge_chance = stats.dodge;
    player.block_chance = 0.0;

    let profile = PlayerProfile {
        projectiles: stats.projectile_count.max(1),
        lifesteal: stats.lifesteal,
        dot_multiplier: stats.dot_multiplier,
    };
    (player, profile)
}

/// Resolve a battle to completion.
///
/// # Tick Order
///
/// 1. Tick hooks, then damage-over-time
/// 2. The player fires one attack per projectile, each at the sole enemy or,
///    in multi-target fights, at a uniformly drawn living enemy
/// 3. Every living enemy attacks the player once, in list order
///
/// After every step queued statuses are drained and new deaths settled
/// (kill counted, after-kill hooks fired). The battle ends as soon as the
/// player is dead (loss) or every enemy is (win).
///
/// # Timeout
///
/// When the tick cap runs out, single-target shapes are won only if the
/// player has strictly more HP than the enemy; multi-target fights are
/// always lost.
pub fn run_battle(request: &BattleRequest, pipeline: &ItemPipeline<'_>) -> BattleReport {
    let shape = EncounterShape::of(request.combat_type);
    let mut rng = SeededRng::from_seed_str(&request.seed);
    let enemies = spawn_enemies(
        &mut rng,
        request.combat_type,
        request.biome,
        request.bosses_blessed,
    );
    let (player, profile) = player_actor(
        &request.stats,
        request.attack_multiplier,
        request.max_hp_multiplier,
    );

    let mut ctx = BattleContext::new(rng, player, profile, enemies);
    ctx.status_reflect = request.status_reflect;
    let depth = request.status_chain_depth;

    let roster = ctx
        .enemies
        .iter()
        .map(|e| format!("{} ({} HP)", e.name, e.hp))
        .collect::<Vec<_>>()
        .join(", ");
    ctx.log(format!(
        "{} encounter in the {}: {roster}",
        request.combat_type, request.biome
    ));

    pipeline.battle_setup(&mut ctx);
    settle(&mut ctx, pipeline, depth);

    let cap = tick_cap(request.combat_type);
    let mut outcome = decide(&ctx);

    while outcome.is_none() && ctx.tick < cap {
        ctx.tick += 1;
        outcome = run_tick(&mut ctx, pipeline, shape, depth);
    }

    let outcome = outcome.unwrap_or_else(|| {
        let outcome = timeout_outcome(&ctx, shape);
        ctx.log("Time runs out");
        outcome
    });

    pipeline.battle_end(&mut ctx, outcome);
    ctx.log(match outcome {
        BattleOutcome::Win => "Victory",
        BattleOutcome::Loss => "Defeat",
    });

    BattleReport {
        outcome,
        enemies_killed: ctx.kills,
        ticks: ctx.tick,
        player_hp: ctx.player.hp,
        player_max_hp: ctx.player.max_hp,
        log: ctx.into_log(),
    }
}

fn run_tick(
    ctx: &mut BattleContext,
    pipeline: &ItemPipeline<'_>,
    shape: EncounterShape,
    depth: u32,
) -> Option<BattleOutcome> {
    pipeline.tick(ctx);
    settle(ctx, pipeline, depth);
    tick_damage_over_time(ctx, pipeline);
    settle(ctx, pipeline, depth);
    if let Some(outcome) = decide(ctx) {
        return Some(outcome);
    }

    for _ in 0..ctx.profile.projectiles {
        let Some(target) = select_target(ctx, shape) else {
            break;
        };
        let info = AttackInfo {
            attacker: Combatant::Player,
            defender: Combatant::Enemy(target),
        };
        let result = resolve_attack(ctx, pipeline, info);
        if result.landed() {
            let heal = to_damage(f64::from(result.damage) * ctx.profile.lifesteal);
            if heal > 0 {
                let healed = ctx.player.heal(heal);
                if healed > 0 {
                    ctx.log(format!("Hero drains {healed} HP"));
                }
            }
        }
        settle(ctx, pipeline, depth);
        if let Some(outcome) = decide(ctx) {
            return Some(outcome);
        }
    }

    let attackers: Vec<usize> = ctx.living_enemies().collect();
    for index in attackers {
        if !ctx.enemies.get(index).is_some_and(ActorState::is_alive) {
            continue;
        }
        let attacker = Combatant::Enemy(index);
        let result = resolve_attack(
            ctx,
            pipeline,
            AttackInfo {
                attacker,
                defender: Combatant::Player,
            },
        );
        if result.landed() && shape == EncounterShape::Elite && ctx.rng.chance(ELITE_IGNITE_CHANCE)
        {
            ctx.queue_status(StatusApplication {
                source: Some(attacker),
                target: Combatant::Player,
                status: StatusId::Burn,
                stacks: 1,
            });
        }
        settle(ctx, pipeline, depth);
        if let Some(outcome) = decide(ctx) {
            return Some(outcome);
        }
    }

    None
}

/// Drain queued statuses, then process deaths nobody has settled yet.
fn settle(ctx: &mut BattleContext, pipeline: &ItemPipeline<'_>, depth: u32) {
    drain_statuses(ctx, pipeline, depth);

    // After-kill hooks may kill again (e.g. chain explosions).
    loop {
        let Some(index) = ctx
            .enemies
            .iter()
            .position(|e| !e.is_alive() && !e.defeated)
        else {
            break;
        };
        ctx.enemies[index].defeated = true;
        ctx.kills += 1;
        let name = ctx.enemies[index].name.clone();
        ctx.log(format!("{name} is defeated"));
        pipeline.after_kill(ctx, Combatant::Enemy(index));
        drain_statuses(ctx, pipeline, depth);
    }

    if !ctx.player.is_alive() && !ctx.player.defeated {
        ctx.player.defeated = true;
        ctx.log("Hero falls");
    }
}

fn decide(ctx: &BattleContext) -> Option<BattleOutcome> {
    if !ctx.player.is_alive() {
        Some(BattleOutcome::Loss)
    } else if ctx.all_enemies_defeated() {
        Some(BattleOutcome::Win)
    } else {
        None
    }
}

fn select_target(ctx: &mut BattleContext, shape: EncounterShape) -> Option<usize> {
    match shape {
        EncounterShape::Single | EncounterShape::Elite => {
            ctx.enemies.first().filter(|e| e.is_alive()).map(|_| 0)
        }
        EncounterShape::Multi => {
            let living: Vec<usize> = ctx.living_enemies().collect();
            if living.is_empty() {
                return None;
            }
            let pick = ctx.rng.index(living.len());
            living.get(pick).copied()
        }
    }
}

fn timeout_outcome(ctx: &BattleContext, shape: EncounterShape) -> BattleOutcome {
    if !shape.is_single_target() {
        return BattleOutcome::Loss;
    }
    let enemy_hp = ctx.enemies.first().map_or(0, |e| e.hp);
    if ctx.player.hp > enemy_hp {
        BattleOutcome::Win
    } else {
        BattleOutcome::Loss
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::encounter::EnemyList;
    use crate::effects::{DamageModifiers, ItemHooks};
    use crate::env::{ItemDefinition, ItemInstance, ItemRegistry, Rarity};
    use crate::stats::compute_base_stats;

    fn request(combat_type: CombatType, seed: &str) -> BattleRequest {
        BattleRequest::new(combat_type, BiomeId::Forest, seed, compute_base_stats(1))
    }

    #[test]
    fn same_request_same_report() {
        for combat_type in [
            CombatType::Single,
            CombatType::Multi,
            CombatType::Miniboss,
            CombatType::Boss,
        ] {
            let req = request(combat_type, "abc|5|x");
            let first = run_battle(&req, &ItemPipeline::empty());
            let second = run_battle(&req, &ItemPipeline::empty());
            assert_eq!(first, second);
        }
    }

    #[test]
    fn reports_are_well_formed() {
        for n in 0..40 {
            for combat_type in [
                CombatType::Single,
                CombatType::Multi,
                CombatType::Miniboss,
                CombatType::Boss,
            ] {
                let seed = format!("bounded|{n}");
                let report = run_battle(&request(combat_type, &seed), &ItemPipeline::empty());

                assert!(report.ticks <= tick_cap(combat_type));
                assert!(report.log.len() >= 2);
                assert!(report.log[0].contains("encounter"));
                let last = report.log.last().map(String::as_str);
                assert!(matches!(last, Some(line) if line.ends_with("Victory") || line.ends_with("Defeat")));
                assert!(report.enemies_killed as usize <= GameConfig::MAX_ENEMIES);
                if report.outcome == BattleOutcome::Loss && report.player_hp == 0 {
                    assert!(report.log.iter().any(|line| line.ends_with("Hero falls")));
                }
            }
        }
    }

    #[test]
    fn single_battle_enemy_hp_is_seeded() {
        let req = request(CombatType::Single, "seed1|0|single");
        let report = run_battle(&req, &ItemPipeline::empty());

        let mut rng = SeededRng::from_seed_str("seed1|0|single");
        let hp = rng.int(18, 32);
        assert!((18..=32).contains(&hp));
        assert!(report.log[0].contains(&format!("({hp} HP)")));
    }

    fn harmless(_: &BattleContext, _: &AttackInfo) -> DamageModifiers {
        DamageModifiers {
            damage_multiplier: 0.0,
            ..Default::default()
        }
    }

    fn pacifist_registry() -> ItemRegistry {
        ItemRegistry::new(vec![
            ItemDefinition::new("white_flag", "White Flag", Rarity::Common).with_hooks(
                ItemHooks {
                    on_compute_damage: Some(harmless),
                    ..Default::default()
                },
            ),
        ])
        .unwrap()
    }

    fn stalemate(combat_type: CombatType) -> BattleReport {
        let registry = pacifist_registry();
        let pipeline =
            ItemPipeline::build(&registry, &[ItemInstance::new("white_flag", 1)], &[]).unwrap();

        let mut stats = compute_base_stats(1);
        stats.max_hp = 100_000;
        let req = BattleRequest::new(combat_type, BiomeId::Caverns, "stalemate", stats);
        run_battle(&req, &pipeline)
    }

    #[test]
    fn multi_timeout_is_always_a_loss() {
        let report = stalemate(CombatType::Multi);
        assert_eq!(report.ticks, GameConfig::EXTENDED_TICK_CAP);
        assert_eq!(report.enemies_killed, 0);
        assert!(report.player_hp > 0);
        assert_eq!(report.outcome, BattleOutcome::Loss);
    }

    #[test]
    fn single_timeout_compares_hp() {
        let report = stalemate(CombatType::Single);
        assert_eq!(report.ticks, GameConfig::SINGLE_TICK_CAP);
        assert_eq!(report.enemies_killed, 0);
        assert_eq!(report.outcome, BattleOutcome::Win);
        assert!(report.log.iter().any(|line| line.ends_with("Time runs out")));
    }

    #[test]
    fn elite_timeout_compares_hp() {
        for combat_type in [CombatType::Miniboss, CombatType::Boss] {
            let report = stalemate(combat_type);
            assert_eq!(report.ticks, tick_cap(combat_type));
            assert_eq!(report.enemies_killed, 0);
            assert_eq!(report.outcome, BattleOutcome::Win, "{combat_type}");
        }
    }

    fn standoff(player_hp: u32, enemy_hp: u32) -> BattleContext {
        let mut enemies = EnemyList::new();
        let mut enemy = ActorState::new("Golem", ActorKind::Enemy, 50);
        enemy.hp = enemy_hp;
        enemies.push(enemy);
        let mut player = ActorState::new("Hero", ActorKind::Player, 50);
        player.hp = player_hp;
        BattleContext::new(SeededRng::new(0), player, PlayerProfile::default(), enemies)
    }

    #[test]
    fn timeout_needs_strictly_more_hp() {
        for shape in [EncounterShape::Single, EncounterShape::Elite] {
            assert_eq!(timeout_outcome(&standoff(21, 20), shape), BattleOutcome::Win);
            assert_eq!(timeout_outcome(&standoff(20, 20), shape), BattleOutcome::Loss);
            assert_eq!(timeout_outcome(&standoff(12, 30), shape), BattleOutcome::Loss);
        }
        assert_eq!(
            timeout_outcome(&standoff(49, 1), EncounterShape::Multi),
            BattleOutcome::Loss
        );
    }

    #[test]
    fn for_stage_uses_shape_salt() {
        let plan = StagePlan::combat(BiomeId::Ruins, 2, CombatType::Miniboss);
        let config = GameConfig::default();
        let req =
            BattleRequest::for_stage("run", 7, &plan, compute_base_stats(1), &config).unwrap();
        assert_eq!(req.seed, "run|7|elite");
        assert_eq!(req.biome, BiomeId::Ruins);

        let choice = StagePlan::choice(BiomeId::Ruins, 3);
        assert!(BattleRequest::for_stage("run", 8, &choice, compute_base_stats(1), &config).is_none());
    }
}
