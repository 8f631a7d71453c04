//! The per-item hook record.
//!
//! Items opt into hooks by filling fields of [`ItemHooks`]; every field is a
//! plain function pointer, so dispatch needs neither trait objects nor
//! reflection and definitions stay `Copy`-cheap to share.

use core::fmt;

use crate::combat::{
    AttackInfo, BattleContext, BattleOutcome, Combatant, HitInfo, StatusApplication,
};
use crate::env::SeededRng;
use crate::run::StagePlan;

use super::modifiers::{DamageModifiers, HitModifiers, LootModifiers};

/// Run-level context handed to lifecycle hooks outside of battles.
///
/// The RNG is seeded from `<run>|<stage>|hooks` by the caller so lifecycle
/// hooks stay reproducible too.
pub struct RunHookContext<'a> {
    pub run_seed: &'a str,
    pub stage_number: u64,
    pub plan: &'a mut StagePlan,
    pub rng: &'a mut SeededRng,
}

/// Read-only context for loot hooks.
#[derive(Clone, Copy, Debug)]
pub struct LootContext<'a> {
    pub plan: &'a StagePlan,
    pub stage_number: u64,
}

pub type LifecycleHook = fn(&mut RunHookContext<'_>);
pub type BattleHook = fn(&mut BattleContext);
pub type BattleEndHook = fn(&mut BattleContext, BattleOutcome);
pub type HitChanceHook = fn(&BattleContext, &AttackInfo) -> HitModifiers;
pub type DamageHook = fn(&BattleContext, &AttackInfo) -> DamageModifiers;
pub type AttackHook = fn(&mut BattleContext, &AttackInfo);
pub type HitHook = fn(&mut BattleContext, &HitInfo);
pub type KillHook = fn(&mut BattleContext, Combatant);
pub type StatusHook = fn(&mut BattleContext, &StatusApplication);
pub type LootHook = fn(&LootContext<'_>) -> LootModifiers;

/// Optional hooks of one item definition.
///
/// # Categories
///
/// - **Lifecycle**: `on_run_start`, `on_stage_start`, `on_stage_end`,
///   `on_battle_setup`, `on_tick`, `on_battle_end`
/// - **Probability**: `on_compute_hit_chance` (summed)
/// - **Damage**: `on_compute_damage` (multiplied / summed)
/// - **Reactions**: `on_before_attack`, `on_after_hit`, `on_receive_damage`,
///   `on_after_kill`, `on_apply_status`
/// - **Loot**: `on_modify_loot` (multiplied / summed)
#[derive(Clone, Copy, Default)]
pub struct ItemHooks {
    pub on_run_start: Option<LifecycleHook>,
    pub on_stage_start: Option<LifecycleHook>,
    pub on_stage_end: Option<LifecycleHook>,
    pub on_battle_setup: Option<BattleHook>,
    pub on_tick: Option<BattleHook>,
    pub on_battle_end: Option<BattleEndHook>,
    pub on_compute_hit_chance: Option<HitChanceHook>,
    pub on_compute_damage: Option<DamageHook>,
    pub on_before_attack: Option<AttackHook>,
    pub on_after_hit: Option<HitHook>,
    pub on_receive_damage: Option<HitHook>,
    pub on_after_kill: Option<KillHook>,
    pub on_apply_status: Option<StatusHook>,
    pub on_modify_loot: Option<LootHook>,
}

impl ItemHooks {
    /// Names of the hooks this record implements.
    pub fn names(&self) -> Vec<&'static str> {
        let slots = [
            ("on_run_start", self.on_run_start.is_some()),
            ("on_stage_start", self.on_stage_start.is_some()),
            ("on_stage_end", self.on_stage_end.is_some()),
            ("on_battle_setup", self.on_battle_setup.is_some()),
            ("on_tick", self.on_tick.is_some()),
            ("on_battle_end", self.on_battle_end.is_some()),
            ("on_compute_hit_chance", self.on_compute_hit_chance.is_some()),
            ("on_compute_damage", self.on_compute_damage.is_some()),
            ("on_before_attack", self.on_before_attack.is_some()),
            ("on_after_hit", self.on_after_hit.is_some()),
            ("on_receive_damage", self.on_receive_damage.is_some()),
            ("on_after_kill", self.on_after_kill.is_some()),
            ("on_apply_status", self.on_apply_status.is_some()),
            ("on_modify_loot", self.on_modify_loot.is_some()),
        ];
        slots
            .into_iter()
            .filter_map(|(name, present)| present.then_some(name))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.names().is_empty()
    }
}

impl fmt::Debug for ItemHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}
