//! Run session: the injectable owner of one player's active run.
//!
//! A [`RunSession`] turns the pure rules of `rogue-core` into a persisted
//! play-through. Every state change follows the same order:
//!
//! 1. compute the next state on a working copy
//! 2. persist it through the [`RunRepository`]
//! 3. commit the working copy to the session
//!
//! A failed persistence call therefore leaves the session exactly as it was;
//! nothing is retried. When an operation needs two writes, a failed second
//! write is compensated on the first one so the store never keeps a
//! half-applied step.
//!
//! Whether the current stage was already played is part of the checkpoint:
//! a resumed session refuses to apply a stage outcome twice.
//!
//! All randomness is derived from the run seed (`<run>|<stage>|<salt>`), so
//! resolving the same stage twice, on any device, yields the same result.

use std::sync::Arc;

use rogue_core::combat::{BattleOutcome, BattleReport, BattleRequest, run_battle};
use rogue_core::effects::{ItemPipeline, LootContext, RunHookContext};
use rogue_core::run::{apply_unique_event, grant_item, roll_reward_offer};
use rogue_core::{
    ItemInstance, ItemRegistry, PlayerStats, RewardOffer, Run, RunStatus, SeededRng, StagePlan,
    StageType, UniqueEventEffect, apply_item_modifiers, compute_base_stats,
};
use tracing::{debug, info, warn};

use crate::api::{Result, RuntimeError};
use crate::config::RuntimeConfig;
use crate::repository::{
    LoadoutRepository, RunId, RunProgress, RunRecord, RunRepository, StaticLoadout,
};

/// The run currently driven by a session.
#[derive(Clone, Debug)]
struct ActiveRun {
    id: RunId,
    run: Run,
    items: Vec<ItemInstance>,
    /// Whether the current stage's outcome is already applied.
    resolved: bool,
}

/// Session API over one player's runs.
///
/// Design: the session owns its collaborators; callers serialize access
/// (`&mut self`) so two advances of the same run can never interleave.
pub struct RunSession {
    runs: Arc<dyn RunRepository>,
    loadout: Arc<dyn LoadoutRepository>,
    catalog: Arc<ItemRegistry>,
    config: RuntimeConfig,
    active: Option<ActiveRun>,
}

impl RunSession {
    /// Create a new session builder.
    pub fn builder() -> RunSessionBuilder {
        RunSessionBuilder::new()
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn catalog(&self) -> &ItemRegistry {
        &self.catalog
    }

    /// The loaded run, if any.
    pub fn run(&self) -> Option<&Run> {
        self.active.as_ref().map(|active| &active.run)
    }

    pub fn run_id(&self) -> Option<RunId> {
        self.active.as_ref().map(|active| active.id)
    }

    /// Items of the loaded run; empty without one.
    pub fn items(&self) -> &[ItemInstance] {
        self.active
            .as_ref()
            .map_or(&[][..], |active| active.items.as_slice())
    }

    /// Whether the current stage was already played this session.
    pub fn stage_resolved(&self) -> bool {
        self.active.as_ref().is_some_and(|active| active.resolved)
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Start a new run.
    ///
    /// Snapshots the loadout as the run's items, fires run-start hooks and
    /// persists the run. Without `seed` a fresh random seed is minted.
    pub async fn start_run(&mut self, seed: Option<String>) -> Result<RunRecord> {
        let seed = seed.unwrap_or_else(fresh_seed);
        let items = self.loadout.list_loadout().await?;

        let mut run = Run::start(seed.as_str(), &self.config.game_config);
        {
            let pipeline = ItemPipeline::build(
                self.catalog.as_ref(),
                &items,
                run.plan().modifiers.blessed_item_ids(),
            )?;
            let stage_number = run.stage_number();
            let mut rng = hook_rng(&seed, stage_number);
            pipeline.run_start(&mut RunHookContext {
                run_seed: &seed,
                stage_number,
                plan: run.plan_mut(),
                rng: &mut rng,
            });
        }

        let record = self
            .runs
            .create_run(&seed, &RunProgress::of(&run))
            .await
            .inspect_err(|e| warn!(target: "runtime::session", error = %e, "Run not created"))?;
        if let Err(e) = self.runs.replace_run_items(record.id, &items).await {
            warn!(target: "runtime::session", run_id = record.id, error = %e, "Run items not stored");
            self.abandon(&record).await;
            return Err(e.into());
        }

        info!(
            target: "runtime::session",
            run_id = record.id,
            seed = %seed,
            items = items.len(),
            stage = %run.plan().stage_type,
            "Run started"
        );
        self.active = Some(ActiveRun {
            id: record.id,
            run,
            items,
            resolved: false,
        });
        Ok(record)
    }

    /// Load the repository's active run, if there is one.
    ///
    /// The stored checkpoint is validated by replaying the seed.
    pub async fn resume(&mut self) -> Result<Option<RunRecord>> {
        let Some(record) = self.runs.fetch_active_run().await? else {
            debug!(target: "runtime::session", "No active run to resume");
            return Ok(None);
        };
        let items = self.runs.list_run_items(record.id).await?;

        let progress = &record.progress;
        let run = Run::restore(
            record.seed.as_str(),
            &self.config.game_config,
            progress.stage_number,
            progress.stage_plan.clone(),
            progress.status,
        )?;

        info!(
            target: "runtime::session",
            run_id = record.id,
            stage_number = progress.stage_number,
            resolved = progress.stage_resolved,
            "Run resumed"
        );
        self.active = Some(ActiveRun {
            id: record.id,
            run,
            items,
            resolved: progress.stage_resolved,
        });
        Ok(Some(record))
    }

    /// Mark the run completed.
    pub async fn complete_run(&mut self) -> Result<RunRecord> {
        let active = self.playable()?;
        let id = active.id;
        let resolved = active.resolved;
        let mut working = active.run.clone();
        working.set_status(RunStatus::Completed);

        let record = self.persist(id, &working, resolved).await?;
        info!(
            target: "runtime::session",
            run_id = id,
            biomes_completed = working.biomes_completed(),
            "Run completed"
        );
        self.commit(working, None, resolved);
        Ok(record)
    }

    /// Move to the next stage.
    ///
    /// Fires stage-end hooks on the current plan, advances, then fires
    /// stage-start hooks on the new plan. Each hook pass draws from the
    /// `<run>|<stage>|hooks` stream of its own stage.
    pub async fn advance(&mut self) -> Result<StagePlan> {
        let active = self.playable()?;
        let id = active.id;
        let mut working = active.run.clone();
        let seed = working.seed().to_string();
        {
            let pipeline = ItemPipeline::build(
                self.catalog.as_ref(),
                &active.items,
                working.plan().modifiers.blessed_item_ids(),
            )?;

            let stage_number = working.stage_number();
            let mut rng = hook_rng(&seed, stage_number);
            pipeline.stage_end(&mut RunHookContext {
                run_seed: &seed,
                stage_number,
                plan: working.plan_mut(),
                rng: &mut rng,
            });

            working.advance()?;

            let stage_number = working.stage_number();
            let mut rng = hook_rng(&seed, stage_number);
            pipeline.stage_start(&mut RunHookContext {
                run_seed: &seed,
                stage_number,
                plan: working.plan_mut(),
                rng: &mut rng,
            });
        }

        self.persist(id, &working, false).await?;
        let plan = working.plan().clone();
        info!(
            target: "runtime::session",
            run_id = id,
            stage_number = working.stage_number(),
            biome = %plan.biome_id,
            stage = %plan.stage_type,
            "Advanced"
        );
        self.commit(working, None, false);
        Ok(plan)
    }

    // ========================================================================
    // Stage resolution
    // ========================================================================

    /// Effective player stats for the current run: level curve plus run
    /// items (blessed items count double).
    pub fn player_stats(&self) -> Result<PlayerStats> {
        let active = self.active.as_ref().ok_or(RuntimeError::NoActiveRun)?;
        let pipeline = self.pipeline(active)?;
        Ok(self.stats_for(&pipeline))
    }

    /// Fight the current combat stage.
    ///
    /// A loss consumes a life; losing the last life fails the run.
    pub async fn resolve_combat(&mut self) -> Result<BattleReport> {
        let active = self.unresolved(StageType::Combat)?;
        let id = active.id;
        let run = &active.run;

        let pipeline = self.pipeline(active)?;
        let stats = self.stats_for(&pipeline);
        let request = BattleRequest::for_stage(
            run.seed(),
            run.stage_number(),
            run.plan(),
            stats,
            &self.config.game_config,
        )
        .ok_or(RuntimeError::MissingCombatType {
            stage_number: run.stage_number(),
        })?;

        let report = run_battle(&request, &pipeline);
        let mut working = run.clone();
        settle_battle(&mut working, report.outcome);

        self.persist(id, &working, true).await?;
        info!(
            target: "runtime::session",
            run_id = id,
            stage_number = working.stage_number(),
            outcome = %report.outcome,
            ticks = report.ticks,
            kills = report.enemies_killed,
            lives = working.plan().modifiers.lives_remaining(),
            "Battle resolved"
        );
        if working.status() == RunStatus::Failed {
            info!(target: "runtime::session", run_id = id, "Run failed");
        }
        self.commit(working, None, true);
        Ok(report)
    }

    /// Resolve the current unique-event stage, applying its effect to the
    /// run modifiers.
    pub async fn resolve_unique_event(&mut self) -> Result<UniqueEventEffect> {
        let active = self.unresolved(StageType::Unique)?;
        let id = active.id;
        let mut working = active.run.clone();

        let mut rng = stage_rng(working.seed(), working.stage_number(), "event");
        let event = working.plan().unique_id;
        let effect = apply_unique_event(
            event,
            &mut working.plan_mut().modifiers,
            &active.items,
            &mut rng,
        );

        self.persist(id, &working, true).await?;
        info!(
            target: "runtime::session",
            run_id = id,
            stage_number = working.stage_number(),
            ?event,
            ?effect,
            "Unique event resolved"
        );
        self.commit(working, None, true);
        Ok(effect)
    }

    /// The reward offer of the current choice stage.
    ///
    /// Derived from the `<run>|<stage>|choice` stream and the loot hooks, so
    /// asking twice returns the same offer.
    pub fn reward_offer(&self) -> Result<RewardOffer> {
        let active = self.unresolved(StageType::Choice)?;
        self.roll_offer(active)
    }

    /// Take option `index` of the current reward offer. Returns the granted
    /// item id.
    ///
    /// The stage is checkpointed as resolved before the items are written;
    /// if the item write fails the checkpoint is reverted.
    pub async fn choose_reward(&mut self, index: usize) -> Result<String> {
        let active = self.unresolved(StageType::Choice)?;
        let id = active.id;
        let offer = self.roll_offer(active)?;
        let item_id = offer
            .option(index)
            .ok_or(RuntimeError::InvalidRewardChoice {
                index,
                options: offer.options.len(),
            })?
            .to_string();

        let mut items = active.items.clone();
        grant_item(&mut items, &item_id);
        let working = active.run.clone();

        self.persist(id, &working, true).await?;
        if let Err(e) = self.runs.replace_run_items(id, &items).await {
            warn!(target: "runtime::session", run_id = id, error = %e, "Reward not stored");
            if let Err(revert) = self.persist(id, &working, false).await {
                warn!(
                    target: "runtime::session",
                    run_id = id,
                    error = %revert,
                    "Reward stage left resolved without its item"
                );
            }
            return Err(e.into());
        }
        info!(target: "runtime::session", run_id = id, item = %item_id, "Reward taken");
        self.commit(working, Some(items), true);
        Ok(item_id)
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn playable(&self) -> Result<&ActiveRun> {
        let active = self.active.as_ref().ok_or(RuntimeError::NoActiveRun)?;
        if !active.run.is_active() {
            return Err(RuntimeError::RunNotActive {
                run_id: active.id,
                status: active.run.status(),
            });
        }
        Ok(active)
    }

    fn unresolved(&self, expected: StageType) -> Result<&ActiveRun> {
        let active = self.playable()?;
        let plan = active.run.plan();
        let stage_number = active.run.stage_number();
        if plan.stage_type != expected {
            return Err(RuntimeError::WrongStageType {
                stage_number,
                expected,
                found: plan.stage_type,
            });
        }
        if active.resolved {
            return Err(RuntimeError::StageAlreadyResolved { stage_number });
        }
        Ok(active)
    }

    fn pipeline(&self, active: &ActiveRun) -> Result<ItemPipeline<'_>> {
        Ok(ItemPipeline::build(
            self.catalog.as_ref(),
            &active.items,
            active.run.plan().modifiers.blessed_item_ids(),
        )?)
    }

    fn stats_for(&self, pipeline: &ItemPipeline<'_>) -> PlayerStats {
        let base = compute_base_stats(self.config.player_level);
        apply_item_modifiers(&base, pipeline.stacked_definitions())
    }

    fn roll_offer(&self, active: &ActiveRun) -> Result<RewardOffer> {
        let run = &active.run;
        let pipeline = self.pipeline(active)?;
        let loot = pipeline.loot_modifiers(&LootContext {
            plan: run.plan(),
            stage_number: run.stage_number(),
        });
        let mut rng = stage_rng(run.seed(), run.stage_number(), "choice");
        Ok(roll_reward_offer(self.catalog.as_ref(), loot, &mut rng))
    }

    async fn persist(&self, id: RunId, run: &Run, resolved: bool) -> Result<RunRecord> {
        let progress = RunProgress::of(run).with_stage_resolved(resolved);
        let record = self
            .runs
            .update_run_progress(id, &progress)
            .await
            .inspect_err(|e| {
                warn!(
                    target: "runtime::session",
                    run_id = id,
                    error = %e,
                    "Checkpoint not persisted; keeping previous state"
                )
            })?;
        debug!(target: "runtime::session", run_id = id, stage_number = run.stage_number(), "Checkpoint saved");
        Ok(record)
    }

    /// Mark a freshly created run failed so a half-written start never
    /// resumes. Best effort: the caller is already returning an error.
    async fn abandon(&self, record: &RunRecord) {
        let mut progress = record.progress.clone();
        progress.status = RunStatus::Failed;
        match self.runs.update_run_progress(record.id, &progress).await {
            Ok(_) => debug!(target: "runtime::session", run_id = record.id, "Run abandoned"),
            Err(e) => warn!(
                target: "runtime::session",
                run_id = record.id,
                error = %e,
                "Run not abandoned; it stays active without items"
            ),
        }
    }

    /// Replace the session's run after a successful write.
    fn commit(&mut self, run: Run, items: Option<Vec<ItemInstance>>, resolved: bool) {
        if let Some(active) = self.active.as_mut() {
            active.resolved = resolved;
            active.run = run;
            if let Some(items) = items {
                active.items = items;
            }
        }
    }
}

/// Apply a battle outcome to the run.
fn settle_battle(run: &mut Run, outcome: BattleOutcome) {
    if outcome == BattleOutcome::Win {
        return;
    }
    let modifiers = &mut run.plan_mut().modifiers;
    let lives = modifiers.lives_remaining().saturating_sub(1);
    modifiers.set_lives_remaining(lives);
    if lives == 0 {
        run.set_status(RunStatus::Failed);
    }
}

fn stage_rng(run_seed: &str, stage_number: u64, salt: &str) -> SeededRng {
    SeededRng::from_parts(&[run_seed, &stage_number.to_string(), salt])
}

fn hook_rng(run_seed: &str, stage_number: u64) -> SeededRng {
    stage_rng(run_seed, stage_number, "hooks")
}

fn fresh_seed() -> String {
    format!("{:016x}", rand::random::<u64>())
}

/// Builder for [`RunSession`].
pub struct RunSessionBuilder {
    config: RuntimeConfig,
    runs: Option<Arc<dyn RunRepository>>,
    loadout: Option<Arc<dyn LoadoutRepository>>,
    catalog: Option<Arc<ItemRegistry>>,
}

impl RunSessionBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            runs: None,
            loadout: None,
            catalog: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the required run repository
    pub fn run_repository(mut self, runs: impl RunRepository + 'static) -> Self {
        self.runs = Some(Arc::new(runs));
        self
    }

    /// Share a run repository with other owners
    pub fn shared_run_repository(mut self, runs: Arc<dyn RunRepository>) -> Self {
        self.runs = Some(runs);
        self
    }

    /// Set the loadout source (defaults to an empty loadout)
    pub fn loadout(mut self, loadout: impl LoadoutRepository + 'static) -> Self {
        self.loadout = Some(Arc::new(loadout));
        self
    }

    /// Set the item catalog (defaults to the bundled catalog)
    pub fn catalog(mut self, catalog: impl Into<Arc<ItemRegistry>>) -> Self {
        self.catalog = Some(catalog.into());
        self
    }

    pub fn build(self) -> Result<RunSession> {
        let runs = self.runs.ok_or(RuntimeError::MissingRunRepository)?;
        let loadout = self
            .loadout
            .unwrap_or_else(|| Arc::new(StaticLoadout::empty()));
        let catalog = match self.catalog {
            Some(catalog) => catalog,
            None => Arc::new(rogue_content::standard_catalog()?),
        };

        Ok(RunSession {
            runs,
            loadout,
            catalog,
            config: self.config,
            active: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use rogue_core::GameConfig;

    use super::*;

    #[test]
    fn losing_consumes_lives_then_fails() {
        let mut run = Run::start("lives", &GameConfig::default().with_starting_lives(2));
        settle_battle(&mut run, BattleOutcome::Loss);
        assert_eq!(run.plan().modifiers.lives_remaining(), 1);
        assert!(run.is_active());

        settle_battle(&mut run, BattleOutcome::Win);
        assert_eq!(run.plan().modifiers.lives_remaining(), 1);

        settle_battle(&mut run, BattleOutcome::Loss);
        assert_eq!(run.plan().modifiers.lives_remaining(), 0);
        assert_eq!(run.status(), RunStatus::Failed);
    }

    #[test]
    fn builder_requires_a_run_repository() {
        let err = RunSession::builder().build().err().unwrap();
        assert!(matches!(err, RuntimeError::MissingRunRepository));
    }

    #[test]
    fn stage_streams_are_salted() {
        let mut a = stage_rng("seed1", 0, "choice");
        let mut b = stage_rng("seed1", 0, "event");
        assert_ne!(a.next_u32(), b.next_u32());
        assert_eq!(
            hook_rng("seed1", 3),
            SeededRng::from_seed_str("seed1|3|hooks")
        );
    }
}
