//! Combatants and their in-battle state.

use std::collections::BTreeMap;

/// Which side an actor fights on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ActorKind {
    Player,
    Enemy,
}

/// Handle to an actor inside a [`BattleContext`](super::BattleContext).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Combatant {
    Player,
    /// Index into the enemy list.
    Enemy(usize),
}

impl Combatant {
    pub const fn kind(self) -> ActorKind {
        match self {
            Self::Player => ActorKind::Player,
            Self::Enemy(_) => ActorKind::Enemy,
        }
    }

    pub const fn is_player(self) -> bool {
        matches!(self, Self::Player)
    }
}

/// Status effects that can be applied during a battle.
///
/// Both are damage-over-time effects: every tick the bearer takes
/// `stacks × damage_per_stack`, then loses one stack.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum StatusId {
    Poison,
    Burn,
}

impl StatusId {
    /// Damage dealt per stack per tick before multipliers.
    pub const fn damage_per_stack(self) -> u32 {
        match self {
            Self::Poison => 2,
            Self::Burn => 2,
        }
    }
}

/// A combatant's mutable battle state.
///
/// Lives only for the duration of one battle; only aggregate results leave
/// the resolver.
#[derive(Clone, Debug, PartialEq)]
pub struct ActorState {
    pub name: String,
    pub kind: ActorKind,
    pub hp: u32,
    pub max_hp: u32,
    pub attack: u32,
    pub defense: u32,
    /// Baseline probability of landing a hit before modifiers.
    pub hit_chance: f64,
    pub crit_chance: f64,
    pub crit_multiplier: f64,
    pub dodge_chance: f64,
    pub block_chance: f64,
    /// Active status effects and their stack counts.
    pub statuses: BTreeMap<StatusId, u32>,
    /// Set once the actor's death has been processed (kill counted, hooks fired).
    pub defeated: bool,
}

impl ActorState {
    pub fn new(name: impl Into<String>, kind: ActorKind, max_hp: u32) -> Self {
        let max_hp = max_hp.max(1);
        Self {
            name: name.into(),
            kind,
            hp: max_hp,
            max_hp,
            attack: 0,
            defense: 0,
            hit_chance: 0.0,
            crit_chance: 0.0,
            crit_multiplier: 1.0,
            dodge_chance: 0.0,
            block_chance: 0.0,
            statuses: BTreeMap::new(),
            defeated: false,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Reduce HP, saturating at zero. Returns the HP actually removed.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let dealt = amount.min(self.hp);
        self.hp -= dealt;
        dealt
    }

    /// Restore HP up to the maximum. Dead actors cannot be healed.
    /// Returns the HP actually restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        if !self.is_alive() {
            return 0;
        }
        let healed = amount.min(self.max_hp - self.hp);
        self.hp += healed;
        healed
    }

    pub fn add_status(&mut self, status: StatusId, stacks: u32) {
        if stacks == 0 {
            return;
        }
        let entry = self.statuses.entry(status).or_insert(0);
        *entry = entry.saturating_add(stacks);
    }

    pub fn status_stacks(&self, status: StatusId) -> u32 {
        self.statuses.get(&status).copied().unwrap_or(0)
    }

    /// Remove one stack of every status, dropping exhausted ones.
    pub fn decay_statuses(&mut self) {
        self.statuses.retain(|_, stacks| {
            *stacks = stacks.saturating_sub(1);
            *stacks > 0
        });
    }
}
