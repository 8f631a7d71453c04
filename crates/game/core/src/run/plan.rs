//! Stage plans: the persisted checkpoint of a run.
//!
//! A [`StagePlan`] serializes (with the `serde` feature) to the run wire shape
//!
//! ```text
//! { biomeId, index, type, combatType?, uniqueId?, livesRemaining?,
//!   blessedItemIds?, attackMultiplier?, maxHpMultiplier?, bossesBlessed?,
//!   statusReflect?, forceNextBoss? }
//! ```
//!
//! Optional fields stay absent when unset so stored plans round-trip exactly.

use super::biome::BiomeId;
use super::unique::UniqueEventId;

/// Kind of stage.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum StageType {
    Combat,
    Choice,
    Unique,
}

/// Combat subtype of a combat stage.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum CombatType {
    Single,
    Multi,
    Miniboss,
    Boss,
}

/// Run-scoped modifiers carried from stage to stage.
///
/// Every field is optional on the wire; accessors supply the neutral value
/// for an absent field.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct RunModifiers {
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    lives_remaining: Option<u32>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    blessed_item_ids: Option<Vec<String>>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    attack_multiplier: Option<f64>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    max_hp_multiplier: Option<f64>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    bosses_blessed: Option<bool>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    status_reflect: Option<bool>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    force_next_boss: Option<bool>,
}

impl RunModifiers {
    pub fn with_lives(lives: u32) -> Self {
        Self {
            lives_remaining: Some(lives),
            ..Self::default()
        }
    }

    pub fn lives_remaining(&self) -> u32 {
        self.lives_remaining.unwrap_or(0)
    }

    pub fn set_lives_remaining(&mut self, lives: u32) {
        self.lives_remaining = Some(lives);
    }

    pub fn blessed_item_ids(&self) -> &[String] {
        self.blessed_item_ids.as_deref().unwrap_or_default()
    }

    pub fn is_blessed(&self, item_id: &str) -> bool {
        self.blessed_item_ids().iter().any(|id| id == item_id)
    }

    /// Bless an item. Returns `false` if it already was.
    pub fn bless(&mut self, item_id: impl Into<String>) -> bool {
        let item_id = item_id.into();
        if self.is_blessed(&item_id) {
            return false;
        }
        self.blessed_item_ids
            .get_or_insert_with(Vec::new)
            .push(item_id);
        true
    }

    pub fn attack_multiplier(&self) -> f64 {
        self.attack_multiplier.unwrap_or(1.0)
    }

    pub fn scale_attack(&mut self, factor: f64) {
        self.attack_multiplier = Some(self.attack_multiplier() * factor);
    }

    pub fn max_hp_multiplier(&self) -> f64 {
        self.max_hp_multiplier.unwrap_or(1.0)
    }

    pub fn scale_max_hp(&mut self, factor: f64) {
        self.max_hp_multiplier = Some(self.max_hp_multiplier() * factor);
    }

    pub fn bosses_blessed(&self) -> bool {
        self.bosses_blessed.unwrap_or(false)
    }

    pub fn set_bosses_blessed(&mut self, blessed: bool) {
        self.bosses_blessed = Some(blessed);
    }

    pub fn status_reflect(&self) -> bool {
        self.status_reflect.unwrap_or(false)
    }

    pub fn set_status_reflect(&mut self, reflect: bool) {
        self.status_reflect = Some(reflect);
    }

    pub fn force_next_boss(&self) -> bool {
        self.force_next_boss.unwrap_or(false)
    }

    pub fn set_force_next_boss(&mut self, force: bool) {
        self.force_next_boss = Some(force);
    }

    /// Modifiers for the next stage: everything carries over except the
    /// one-shot force-next-boss flag.
    pub fn carry_forward(&self) -> Self {
        Self {
            force_next_boss: None,
            ..self.clone()
        }
    }
}

/// Description of one stage.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct StagePlan {
    pub biome_id: BiomeId,
    /// Stage index within the biome.
    pub index: u32,
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub stage_type: StageType,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub combat_type: Option<CombatType>,
    /// `None` on a unique stage means the event was suppressed.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub unique_id: Option<UniqueEventId>,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub modifiers: RunModifiers,
}

impl StagePlan {
    pub fn combat(biome_id: BiomeId, index: u32, combat_type: CombatType) -> Self {
        Self {
            biome_id,
            index,
            stage_type: StageType::Combat,
            combat_type: Some(combat_type),
            unique_id: None,
            modifiers: RunModifiers::default(),
        }
    }

    pub fn choice(biome_id: BiomeId, index: u32) -> Self {
        Self {
            biome_id,
            index,
            stage_type: StageType::Choice,
            combat_type: None,
            unique_id: None,
            modifiers: RunModifiers::default(),
        }
    }

    pub fn unique(biome_id: BiomeId, index: u32, unique_id: Option<UniqueEventId>) -> Self {
        Self {
            biome_id,
            index,
            stage_type: StageType::Unique,
            combat_type: None,
            unique_id,
            modifiers: RunModifiers::default(),
        }
    }

    pub fn with_modifiers(mut self, modifiers: RunModifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn is_combat(&self) -> bool {
        self.stage_type == StageType::Combat
    }

    /// The `(type, combatType, uniqueId)` identity of the stage.
    pub fn kind(&self) -> (StageType, Option<CombatType>, Option<UniqueEventId>) {
        (self.stage_type, self.combat_type, self.unique_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn carry_forward_clears_only_force_boss() {
        let mut modifiers = RunModifiers::with_lives(2);
        modifiers.bless("keen_edge");
        modifiers.scale_attack(1.5);
        modifiers.set_force_next_boss(true);

        let next = modifiers.carry_forward();
        assert_eq!(next.lives_remaining(), 2);
        assert!(next.is_blessed("keen_edge"));
        assert_eq!(next.attack_multiplier(), 1.5);
        assert!(!next.force_next_boss());
    }

    #[test]
    fn blessing_is_idempotent() {
        let mut modifiers = RunModifiers::default();
        assert!(modifiers.bless("a"));
        assert!(!modifiers.bless("a"));
        assert_eq!(modifiers.blessed_item_ids(), ["a".to_string()]);
    }

    #[test]
    fn absent_multipliers_are_neutral() {
        let modifiers = RunModifiers::default();
        assert_eq!(modifiers.attack_multiplier(), 1.0);
        assert_eq!(modifiers.max_hp_multiplier(), 1.0);
        assert!(!modifiers.bosses_blessed());
        assert!(modifiers.blessed_item_ids().is_empty());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn wire_shape_matches_checkpoint_format() {
        let mut plan = StagePlan::combat(BiomeId::Forest, 3, CombatType::Miniboss);
        plan.modifiers.set_lives_remaining(1);

        let value = serde_json::to_value(&plan).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "biomeId": "forest",
                "index": 3,
                "type": "combat",
                "combatType": "miniboss",
                "livesRemaining": 1
            })
        );

        let back: StagePlan = serde_json::from_value(value).unwrap();
        assert_eq!(back, plan);
    }
}
