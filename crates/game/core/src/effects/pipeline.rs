//! Hook dispatch across equipped items.

use crate::combat::{
    AttackInfo, BattleContext, BattleOutcome, Combatant, HitInfo, StatusApplication,
};
use crate::config::GameConfig;
use crate::env::{ItemCatalog, ItemDefinition, ItemError, ItemInstance};

use super::hooks::{ItemHooks, LootContext, RunHookContext};
use super::modifiers::{DamageModifiers, HitModifiers, LootModifiers};

/// One equipped item resolved against the catalog.
#[derive(Clone, Copy, Debug)]
pub struct PipelineEntry<'a> {
    pub definition: &'a ItemDefinition,
    /// Effective stack count (blessed items count double).
    pub stacks: u32,
}

/// Ordered hook dispatcher for one set of equipped items.
///
/// # Invocation Contract
///
/// - Entries are kept in catalog registration order, never in loadout order
/// - A hook fires once per stack: three stacks means three invocations, each
///   free to mutate the context or draw from its RNG
/// - Hooks run to completion one at a time; no two invocations interleave
#[derive(Clone, Debug, Default)]
pub struct ItemPipeline<'a> {
    entries: Vec<PipelineEntry<'a>>,
}

impl<'a> ItemPipeline<'a> {
    /// Resolve equipped items against a catalog.
    ///
    /// Duplicate ids are merged by summing stacks; zero-stack entries are
    /// dropped. Items in `blessed` count with
    /// [`GameConfig::BLESSED_STACK_FACTOR`] times their stacks.
    pub fn build<C>(
        catalog: &'a C,
        items: &[ItemInstance],
        blessed: &[String],
    ) -> Result<Self, ItemError>
    where
        C: ItemCatalog + ?Sized,
    {
        let mut resolved: Vec<(usize, PipelineEntry<'a>)> = Vec::with_capacity(items.len());

        for item in items {
            let position = catalog
                .position(&item.id)
                .ok_or_else(|| ItemError::UnknownItem {
                    id: item.id.clone(),
                })?;
            let definition =
                catalog
                    .definition(&item.id)
                    .ok_or_else(|| ItemError::UnknownItem {
                        id: item.id.clone(),
                    })?;

            match resolved.iter_mut().find(|(p, _)| *p == position) {
                Some((_, entry)) => entry.stacks = entry.stacks.saturating_add(item.stacks),
                None => resolved.push((
                    position,
                    PipelineEntry {
                        definition,
                        stacks: item.stacks,
                    },
                )),
            }
        }

        resolved.sort_by_key(|(position, _)| *position);

        let entries = resolved
            .into_iter()
            .map(|(_, mut entry)| {
                if blessed.iter().any(|id| *id == entry.definition.id) {
                    entry.stacks = entry
                        .stacks
                        .saturating_mul(GameConfig::BLESSED_STACK_FACTOR);
                }
                entry
            })
            .filter(|entry| entry.stacks > 0)
            .collect();

        Ok(Self { entries })
    }

    /// A pipeline with no items: every hook is a no-op and every modifier
    /// query returns the identity record.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[PipelineEntry<'a>] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Effective stack count of an item (0 when not equipped).
    pub fn stacks_of(&self, id: &str) -> u32 {
        self.entries
            .iter()
            .find(|e| e.definition.id == id)
            .map_or(0, |e| e.stacks)
    }

    /// Definitions paired with effective stacks, for the stat builder.
    pub fn stacked_definitions(&self) -> impl Iterator<Item = (&'a ItemDefinition, u32)> + '_ {
        self.entries.iter().map(|e| (e.definition, e.stacks))
    }

    /// Yield `select`'s hook once per stack of every item defining it.
    fn per_stack<H: Copy>(
        &self,
        select: impl Fn(&ItemHooks) -> Option<H>,
    ) -> impl Iterator<Item = H> {
        self.entries.iter().flat_map(move |entry| {
            let hook = select(&entry.definition.hooks);
            let count = if hook.is_some() { entry.stacks } else { 0 };
            hook.into_iter()
                .flat_map(move |h| core::iter::repeat_n(h, count as usize))
        })
    }

    // ------------------------------------------------------------------
    // Lifecycle hooks
    // ------------------------------------------------------------------

    pub fn run_start(&self, ctx: &mut RunHookContext<'_>) {
        for hook in self.per_stack(|h| h.on_run_start) {
            hook(ctx);
        }
    }

    pub fn stage_start(&self, ctx: &mut RunHookContext<'_>) {
        for hook in self.per_stack(|h| h.on_stage_start) {
            hook(ctx);
        }
    }

    pub fn stage_end(&self, ctx: &mut RunHookContext<'_>) {
        for hook in self.per_stack(|h| h.on_stage_end) {
            hook(ctx);
        }
    }

    pub fn battle_setup(&self, ctx: &mut BattleContext) {
        for hook in self.per_stack(|h| h.on_battle_setup) {
            hook(ctx);
        }
    }

    pub fn tick(&self, ctx: &mut BattleContext) {
        for hook in self.per_stack(|h| h.on_tick) {
            hook(ctx);
        }
    }

    pub fn battle_end(&self, ctx: &mut BattleContext, outcome: BattleOutcome) {
        for hook in self.per_stack(|h| h.on_battle_end) {
            hook(ctx, outcome);
        }
    }

    // ------------------------------------------------------------------
    // Modifier hooks
    // ------------------------------------------------------------------

    /// Sum of every hit-chance contribution for one attack resolution.
    pub fn hit_modifiers(&self, ctx: &BattleContext, info: &AttackInfo) -> HitModifiers {
        self.per_stack(|h| h.on_compute_hit_chance)
            .map(|hook| hook(ctx, info))
            .sum()
    }

    /// Composition of every damage contribution for one attack resolution.
    pub fn damage_modifiers(&self, ctx: &BattleContext, info: &AttackInfo) -> DamageModifiers {
        self.per_stack(|h| h.on_compute_damage)
            .map(|hook| hook(ctx, info))
            .product()
    }

    /// Composition of every loot contribution.
    pub fn loot_modifiers(&self, ctx: &LootContext<'_>) -> LootModifiers {
        self.per_stack(|h| h.on_modify_loot)
            .map(|hook| hook(ctx))
            .product()
    }

    // ------------------------------------------------------------------
    // Event-reaction hooks
    // ------------------------------------------------------------------

    pub fn before_attack(&self, ctx: &mut BattleContext, info: &AttackInfo) {
        for hook in self.per_stack(|h| h.on_before_attack) {
            hook(ctx, info);
        }
    }

    pub fn after_hit(&self, ctx: &mut BattleContext, hit: &HitInfo) {
        for hook in self.per_stack(|h| h.on_after_hit) {
            hook(ctx, hit);
        }
    }

    pub fn receive_damage(&self, ctx: &mut BattleContext, hit: &HitInfo) {
        for hook in self.per_stack(|h| h.on_receive_damage) {
            hook(ctx, hit);
        }
    }

    pub fn after_kill(&self, ctx: &mut BattleContext, victim: Combatant) {
        for hook in self.per_stack(|h| h.on_after_kill) {
            hook(ctx, victim);
        }
    }

    pub fn apply_status(&self, ctx: &mut BattleContext, application: &StatusApplication) {
        for hook in self.per_stack(|h| h.on_apply_status) {
            hook(ctx, application);
        }
    }
}

#[cfg(test)]
mod tests {
    use arrayvec::ArrayVec;

    use super::*;
    use crate::combat::{ActorKind, ActorState, PlayerProfile};
    use crate::env::{ItemRegistry, Rarity, SeededRng};

    fn accurate(_: &BattleContext, _: &AttackInfo) -> HitModifiers {
        HitModifiers {
            add_hit_chance: 0.01,
            ..Default::default()
        }
    }

    fn heavy(_: &BattleContext, _: &AttackInfo) -> DamageModifiers {
        DamageModifiers {
            damage_multiplier: 2.0,
            ..Default::default()
        }
    }

    fn count_ticks(ctx: &mut BattleContext) {
        ctx.kills += 1;
    }

    fn mark_first(ctx: &mut BattleContext) {
        if ctx.kills == 0 {
            ctx.log("first");
        }
    }

    fn registry() -> ItemRegistry {
        ItemRegistry::new(vec![
            ItemDefinition::new("scope", "Scope", Rarity::Common).with_hooks(ItemHooks {
                on_compute_hit_chance: Some(accurate),
                ..Default::default()
            }),
            ItemDefinition::new("hammer", "Hammer", Rarity::Rare).with_hooks(ItemHooks {
                on_compute_damage: Some(heavy),
                on_tick: Some(count_ticks),
                ..Default::default()
            }),
            ItemDefinition::new("bell", "Bell", Rarity::Common).with_hooks(ItemHooks {
                on_tick: Some(mark_first),
                ..Default::default()
            }),
            ItemDefinition::new("plain", "Plain", Rarity::Common),
        ])
        .unwrap()
    }

    fn context() -> BattleContext {
        let mut enemies = ArrayVec::new();
        enemies.push(ActorState::new("dummy", ActorKind::Enemy, 10));
        BattleContext::new(
            SeededRng::new(1),
            ActorState::new("hero", ActorKind::Player, 10),
            PlayerProfile::default(),
            enemies,
        )
    }

    const PLAYER_ATTACK: AttackInfo = AttackInfo {
        attacker: Combatant::Player,
        defender: Combatant::Enemy(0),
    };

    #[test]
    fn hit_hook_scales_with_stacks() {
        let registry = registry();
        let pipeline =
            ItemPipeline::build(&registry, &[ItemInstance::new("scope", 3)], &[]).unwrap();

        let total = pipeline.hit_modifiers(&context(), &PLAYER_ATTACK);
        assert!((total.add_hit_chance - 0.03).abs() < 1e-12);
        assert_eq!(total.add_crit_chance, 0.0);
    }

    #[test]
    fn damage_hooks_compound_multiplicatively() {
        let registry = registry();
        let pipeline =
            ItemPipeline::build(&registry, &[ItemInstance::new("hammer", 3)], &[]).unwrap();

        let total = pipeline.damage_modifiers(&context(), &PLAYER_ATTACK);
        assert_eq!(total.damage_multiplier, 8.0);
    }

    #[test]
    fn hooks_fire_in_registration_order() {
        let registry = registry();
        // Loadout order is bell first, registry order is hammer first.
        let pipeline = ItemPipeline::build(
            &registry,
            &[ItemInstance::new("bell", 1), ItemInstance::new("hammer", 2)],
            &[],
        )
        .unwrap();

        let mut ctx = context();
        pipeline.tick(&mut ctx);
        assert_eq!(ctx.kills, 2);
        assert!(ctx.log_lines().is_empty());
    }

    #[test]
    fn duplicates_merge_and_blessing_doubles() {
        let registry = registry();
        let pipeline = ItemPipeline::build(
            &registry,
            &[
                ItemInstance::new("scope", 1),
                ItemInstance::new("scope", 2),
                ItemInstance::new("plain", 0),
            ],
            &["scope".to_string()],
        )
        .unwrap();

        assert_eq!(pipeline.entries().len(), 1);
        assert_eq!(pipeline.stacks_of("scope"), 6);
        assert_eq!(pipeline.stacks_of("plain"), 0);
    }

    #[test]
    fn unknown_items_are_rejected() {
        let registry = registry();
        let err = ItemPipeline::build(&registry, &[ItemInstance::new("ghost", 1)], &[])
            .unwrap_err();
        assert_eq!(err, ItemError::UnknownItem { id: "ghost".into() });
    }

    #[test]
    fn empty_pipeline_returns_identity() {
        let pipeline = ItemPipeline::empty();
        let ctx = context();
        assert_eq!(pipeline.hit_modifiers(&ctx, &PLAYER_ATTACK), HitModifiers::default());
        assert_eq!(
            pipeline.damage_modifiers(&ctx, &PLAYER_ATTACK),
            DamageModifiers::default()
        );
    }
}
