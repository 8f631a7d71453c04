//! Deterministic run simulation shared by every client of the game.
//!
//! `rogue-core` defines the canonical rules of a run: the seeded stage
//! generator, the item hook pipeline, the player stat builder and the
//! tick-based combat resolver. Every API here is a pure function of its
//! inputs and a seed, so a run checkpoint (seed + stage plan) replays to the
//! same outcomes on every device.
//!
//! Data flow:
//!
//! ```text
//! run seed ──► [run::StageGenerator] ──► StagePlan
//!                                          │ (combat)
//! level ──► [stats] ──► PlayerStats ───────┤
//! items ──► [effects::ItemPipeline] ───────┴──► [combat::run_battle] ──► BattleReport
//! ```
pub mod combat;
pub mod config;
pub mod effects;
pub mod env;
pub mod error;
pub mod run;
pub mod stats;

pub use combat::{
    ActorKind, ActorState, AttackInfo, BattleContext, BattleOutcome, BattleReport, BattleRequest,
    Combatant, HitInfo, StatusApplication, StatusId, run_battle,
};
pub use config::GameConfig;
pub use effects::{
    DamageModifiers, HitModifiers, ItemHooks, ItemPipeline, LootContext, LootModifiers,
    RunHookContext,
};
pub use env::{
    ItemCatalog, ItemDefinition, ItemError, ItemInstance, ItemRegistry, Rarity, SeededRng,
    Weighted, compose_seed, hash_seed,
};
pub use error::{ErrorSeverity, GameError};
pub use run::{
    BiomeId, CombatType, RewardOffer, Run, RunError, RunModifiers, RunStatus, StageGenerator,
    StagePlan, StageType, UniqueEventEffect, UniqueEventId,
};
pub use stats::{
    ModifierOp, PlayerStats, StatKind, StatModifier, apply_item_modifiers, compute_base_stats,
};
