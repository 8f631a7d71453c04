//! Shared mutable state of one battle.

use arrayvec::ArrayVec;

use crate::config::GameConfig;
use crate::env::SeededRng;

use super::actor::{ActorState, Combatant, StatusId};

/// Player traits that have no counterpart on [`ActorState`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerProfile {
    /// Attacks the player fires per tick.
    pub projectiles: u32,
    /// Fraction of landed damage returned as healing.
    pub lifesteal: f64,
    /// Scales damage-over-time the player inflicts.
    pub dot_multiplier: f64,
}

impl Default for PlayerProfile {
    fn default() -> Self {
        Self {
            projectiles: 1,
            lifesteal: 0.0,
            dot_multiplier: 1.0,
        }
    }
}

/// A request to apply a status effect.
///
/// Hooks never mutate statuses directly; they queue applications through
/// [`BattleContext::queue_status`] and the resolver drains the queue so that
/// apply-status hooks observe every application.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusApplication {
    pub source: Option<Combatant>,
    pub target: Combatant,
    pub status: StatusId,
    pub stacks: u32,
}

/// Attacker/defender pair of one attack resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttackInfo {
    pub attacker: Combatant,
    pub defender: Combatant,
}

/// A landed hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HitInfo {
    pub attacker: Combatant,
    pub defender: Combatant,
    pub damage: u32,
    pub critical: bool,
}

/// The shared state of one battle.
///
/// Exclusively owned by one resolver call and passed by reference to every
/// hook invocation. Hooks must draw randomness from [`BattleContext::rng`]
/// and never from a generator of their own.
#[derive(Clone, Debug)]
pub struct BattleContext {
    pub rng: SeededRng,
    pub player: ActorState,
    pub profile: PlayerProfile,
    pub enemies: ArrayVec<ActorState, { GameConfig::MAX_ENEMIES }>,
    pub tick: u32,
    pub kills: u32,
    /// Statuses aimed at the player by an enemy land on that enemy instead.
    pub status_reflect: bool,
    log: Vec<String>,
    pending_statuses: Vec<StatusApplication>,
}

impl BattleContext {
    pub fn new(
        rng: SeededRng,
        player: ActorState,
        profile: PlayerProfile,
        enemies: ArrayVec<ActorState, { GameConfig::MAX_ENEMIES }>,
    ) -> Self {
        Self {
            rng,
            player,
            profile,
            enemies,
            tick: 0,
            kills: 0,
            status_reflect: false,
            log: Vec::new(),
            pending_statuses: Vec::new(),
        }
    }

    pub fn actor(&self, who: Combatant) -> Option<&ActorState> {
        match who {
            Combatant::Player => Some(&self.player),
            Combatant::Enemy(i) => self.enemies.get(i),
        }
    }

    pub fn actor_mut(&mut self, who: Combatant) -> Option<&mut ActorState> {
        match who {
            Combatant::Player => Some(&mut self.player),
            Combatant::Enemy(i) => self.enemies.get_mut(i),
        }
    }

    /// Indices of enemies with HP left, in list order.
    pub fn living_enemies(&self) -> impl Iterator<Item = usize> + '_ {
        self.enemies
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_alive())
            .map(|(i, _)| i)
    }

    pub fn all_enemies_defeated(&self) -> bool {
        self.enemies.iter().all(|e| !e.is_alive())
    }

    /// Queue a status application; applied when the resolver next drains.
    pub fn queue_status(&mut self, application: StatusApplication) {
        self.pending_statuses.push(application);
    }

    pub(crate) fn take_pending_statuses(&mut self) -> Vec<StatusApplication> {
        std::mem::take(&mut self.pending_statuses)
    }

    pub(crate) fn has_pending_statuses(&self) -> bool {
        !self.pending_statuses.is_empty()
    }

    /// Append a line to the battle log, prefixed with the current tick.
    pub fn log(&mut self, message: impl AsRef<str>) {
        let line = if self.tick == 0 {
            message.as_ref().to_string()
        } else {
            format!("[{}] {}", self.tick, message.as_ref())
        };
        self.log.push(line);
    }

    pub fn log_lines(&self) -> &[String] {
        &self.log
    }

    pub(crate) fn into_log(self) -> Vec<String> {
        self.log
    }

    /// Display name of an actor, for log lines.
    pub fn name_of(&self, who: Combatant) -> &str {
        self.actor(who).map_or("?", |a| a.name.as_str())
    }
}
