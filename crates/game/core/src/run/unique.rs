//! Unique-event stages.
//!
//! Selection is two-stage: an event is picked by weight, then a second draw
//! against its show chance may suppress it. A suppressed pick still yields a
//! unique stage, just one without an event.

use crate::env::{ItemInstance, SeededRng, Weighted};

use super::plan::RunModifiers;

/// Identifier of a unique event.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum UniqueEventId {
    Shrine,
    BloodPact,
    Fountain,
    CursedIdol,
    MirrorPool,
    Herald,
}

/// Selection parameters of one catalog entry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UniqueEventEntry {
    pub id: UniqueEventId,
    pub weight: f64,
    /// Probability that the event appears once selected.
    pub show_chance: f64,
}

/// The unique-event catalog, in selection order.
pub const UNIQUE_EVENTS: [UniqueEventEntry; 6] = [
    entry(UniqueEventId::Shrine, 3.0, 0.80),
    entry(UniqueEventId::BloodPact, 2.0, 0.60),
    entry(UniqueEventId::Fountain, 3.0, 0.70),
    entry(UniqueEventId::CursedIdol, 1.0, 0.50),
    entry(UniqueEventId::MirrorPool, 1.0, 0.50),
    entry(UniqueEventId::Herald, 1.0, 0.40),
];

const fn entry(id: UniqueEventId, weight: f64, show_chance: f64) -> UniqueEventEntry {
    UniqueEventEntry {
        id,
        weight,
        show_chance,
    }
}

impl UniqueEventId {
    pub fn entry(self) -> UniqueEventEntry {
        UNIQUE_EVENTS
            .iter()
            .copied()
            .find(|e| e.id == self)
            .unwrap_or(entry(self, 0.0, 0.0))
    }
}

/// Draw a unique event: one weighted draw, then one show-chance draw.
///
/// Returns `None` when the show-chance roll suppresses the pick.
pub fn draw_unique_event(rng: &mut SeededRng) -> Option<UniqueEventId> {
    let table: Vec<Weighted<UniqueEventEntry>> = UNIQUE_EVENTS
        .iter()
        .map(|e| Weighted::new(*e, e.weight))
        .collect();
    let picked = *rng.pick_weighted(&table)?;
    rng.chance(picked.show_chance).then_some(picked.id)
}

/// What resolving a unique event did to the run.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum UniqueEventEffect {
    /// A run item was blessed.
    Blessed { item_id: String },
    /// A shrine with nothing (left) to bless.
    NothingToBless,
    /// Attack and max-HP multipliers were rescaled.
    Pact {
        attack_multiplier: f64,
        max_hp_multiplier: f64,
    },
    ExtraLife { lives_remaining: u32 },
    BossesBlessed { attack_multiplier: f64 },
    StatusReflect,
    BossSummoned,
    /// The stage's event was suppressed; nothing happened.
    Nothing,
}

/// Apply a unique event to the run modifiers.
///
/// # Effects
///
/// | Event | Effect |
/// |-------|--------|
/// | shrine | bless one RNG-chosen run item not yet blessed |
/// | blood_pact | attack × 1.25, max HP × 0.85 |
/// | fountain | lives + 1 |
/// | cursed_idol | bosses blessed, attack × 1.5 |
/// | mirror_pool | status reflect on |
/// | herald | next stage is a boss |
pub fn apply_unique_event(
    event: Option<UniqueEventId>,
    modifiers: &mut RunModifiers,
    run_items: &[ItemInstance],
    rng: &mut SeededRng,
) -> UniqueEventEffect {
    let Some(event) = event else {
        return UniqueEventEffect::Nothing;
    };
    match event {
        UniqueEventId::Shrine => {
            let candidates: Vec<&str> = run_items
                .iter()
                .filter(|item| item.stacks > 0 && !modifiers.is_blessed(&item.id))
                .map(|item| item.id.as_str())
                .collect();
            if candidates.is_empty() {
                return UniqueEventEffect::NothingToBless;
            }
            let item_id = candidates[rng.index(candidates.len())].to_string();
            modifiers.bless(item_id.clone());
            UniqueEventEffect::Blessed { item_id }
        }
        UniqueEventId::BloodPact => {
            modifiers.scale_attack(1.25);
            modifiers.scale_max_hp(0.85);
            UniqueEventEffect::Pact {
                attack_multiplier: modifiers.attack_multiplier(),
                max_hp_multiplier: modifiers.max_hp_multiplier(),
            }
        }
        UniqueEventId::Fountain => {
            let lives = modifiers.lives_remaining().saturating_add(1);
            modifiers.set_lives_remaining(lives);
            UniqueEventEffect::ExtraLife {
                lives_remaining: lives,
            }
        }
        UniqueEventId::CursedIdol => {
            modifiers.set_bosses_blessed(true);
            modifiers.scale_attack(1.5);
            UniqueEventEffect::BossesBlessed {
                attack_multiplier: modifiers.attack_multiplier(),
            }
        }
        UniqueEventId::MirrorPool => {
            modifiers.set_status_reflect(true);
            UniqueEventEffect::StatusReflect
        }
        UniqueEventId::Herald => {
            modifiers.set_force_next_boss(true);
            UniqueEventEffect::BossSummoned
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn suppression_happens_at_expected_rate() {
        let mut rng = SeededRng::from_seed_str("unique-rate");
        let mut shown: HashMap<Option<UniqueEventId>, u32> = HashMap::new();
        for _ in 0..20_000 {
            *shown.entry(draw_unique_event(&mut rng)).or_default() += 1;
        }
        // Expected suppression: Σ weight × (1 − show) / Σ weight = 3.9 / 11.
        let suppressed = f64::from(shown[&None]) / 20_000.0;
        assert!((suppressed - 3.9 / 11.0).abs() < 0.02, "{suppressed}");
        assert!(shown.contains_key(&Some(UniqueEventId::Herald)));
    }

    #[test]
    fn shrine_blesses_each_item_once() {
        let items = [ItemInstance::new("a", 1), ItemInstance::new("b", 2)];
        let mut modifiers = RunModifiers::default();
        let mut rng = SeededRng::new(9);

        let mut blessed = Vec::new();
        for _ in 0..2 {
            match apply_unique_event(Some(UniqueEventId::Shrine), &mut modifiers, &items, &mut rng)
            {
                UniqueEventEffect::Blessed { item_id } => blessed.push(item_id),
                other => panic!("unexpected {other:?}"),
            }
        }
        blessed.sort();
        assert_eq!(blessed, ["a", "b"]);
        assert_eq!(
            apply_unique_event(Some(UniqueEventId::Shrine), &mut modifiers, &items, &mut rng),
            UniqueEventEffect::NothingToBless
        );
    }

    #[test]
    fn pact_and_idol_compound() {
        let mut modifiers = RunModifiers::with_lives(1);
        let mut rng = SeededRng::new(1);
        apply_unique_event(Some(UniqueEventId::BloodPact), &mut modifiers, &[], &mut rng);
        apply_unique_event(Some(UniqueEventId::CursedIdol), &mut modifiers, &[], &mut rng);
        apply_unique_event(Some(UniqueEventId::Fountain), &mut modifiers, &[], &mut rng);

        assert!((modifiers.attack_multiplier() - 1.875).abs() < 1e-12);
        assert!((modifiers.max_hp_multiplier() - 0.85).abs() < 1e-12);
        assert!(modifiers.bosses_blessed());
        assert_eq!(modifiers.lives_remaining(), 2);
    }

    #[test]
    fn suppressed_event_does_nothing() {
        let mut modifiers = RunModifiers::default();
        let before = modifiers.clone();
        let effect = apply_unique_event(None, &mut modifiers, &[], &mut SeededRng::new(0));
        assert_eq!(effect, UniqueEventEffect::Nothing);
        assert_eq!(modifiers, before);
    }
}
