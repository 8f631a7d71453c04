//! Combat resolution system.
//!
//! One tick-based algorithm resolves every encounter shape (single, multi,
//! elite). All randomness is drawn from the [`BattleContext`] stream seeded
//! from the battle request, so a battle replays exactly from its seed.
//!
//! # Core Functions
//!
//! - `run_battle`: full battle from request to report
//! - `resolve_attack`: one attacker/defender exchange (hit roll + damage)
//! - `calculate_hit_chance`: baseline + bonuses − avoidance
//! - `calculate_damage`: attack vs defense with pipeline modifiers

mod actor;
mod battle;
mod context;
pub mod damage;
pub mod encounter;
pub mod hit;
pub mod result;
pub mod status;

pub use actor::{ActorKind, ActorState, Combatant, StatusId};
pub use battle::{BattleOutcome, BattleReport, BattleRequest, player_actor, run_battle};
pub use context::{AttackInfo, BattleContext, HitInfo, PlayerProfile, StatusApplication};
pub use damage::{apply_critical, calculate_damage};
pub use encounter::{EncounterShape, EnemyProfile, elite_scale, spawn_enemies, tick_cap};
pub use hit::{calculate_hit_chance, check_hit, player_hit_baseline};
pub use result::{AttackOutcome, AttackResult, resolve_attack};
