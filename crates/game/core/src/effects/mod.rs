//! Item effect pipeline.
//!
//! Items contribute behaviour through [`ItemHooks`]; an [`ItemPipeline`]
//! dispatches those hooks in catalog order, once per stack, and aggregates
//! the modifier records they return.

mod hooks;
mod modifiers;
mod pipeline;

pub use hooks::{
    AttackHook, BattleEndHook, BattleHook, DamageHook, HitChanceHook, HitHook, ItemHooks,
    KillHook, LifecycleHook, LootContext, LootHook, RunHookContext, StatusHook,
};
pub use modifiers::{DamageModifiers, HitModifiers, LootModifiers};
pub use pipeline::{ItemPipeline, PipelineEntry};
