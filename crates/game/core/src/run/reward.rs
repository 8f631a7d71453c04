//! Item rewards offered on choice stages.

use crate::effects::LootModifiers;
use crate::env::{ItemCatalog, ItemInstance, SeededRng, Weighted};

/// Options offered before loot modifiers.
pub const BASE_OFFER_SIZE: u32 = 3;

/// Items offered on one choice stage.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct RewardOffer {
    /// Offered item ids, in draw order.
    pub options: Vec<String>,
    /// Loot modifiers the offer was rolled with.
    pub quantity_factor: f64,
    pub rarity_bias: f64,
}

impl RewardOffer {
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn option(&self, index: usize) -> Option<&str> {
        self.options.get(index).map(String::as_str)
    }
}

/// Number of options for a loot quantity factor.
///
/// # Formula
///
/// ```text
/// size = clamp(floor(BASE_OFFER_SIZE × quantity_factor), 1, catalog_size)
/// ```
pub fn offer_size(quantity_factor: f64, catalog_size: usize) -> usize {
    let scaled = f64::from(BASE_OFFER_SIZE) * quantity_factor;
    let size = if scaled.is_nan() || scaled < 1.0 {
        1
    } else {
        scaled.floor().min(usize::MAX as f64) as usize
    };
    size.min(catalog_size)
}

/// Roll a reward offer: weighted draws without replacement.
///
/// # Formula
///
/// ```text
/// weight(item) = rarity_weight × (1 + rarity_bias × rarity_tier)
/// ```
///
/// Items whose weight drops to zero or below are never offered.
pub fn roll_reward_offer<C>(catalog: &C, loot: LootModifiers, rng: &mut SeededRng) -> RewardOffer
where
    C: ItemCatalog + ?Sized,
{
    let definitions = catalog.definitions();
    let size = offer_size(loot.quantity_factor, definitions.len());

    let mut pool: Vec<Weighted<&str>> = definitions
        .iter()
        .map(|def| {
            let rarity = def.rarity;
            let weight = rarity.weight() * (1.0 + loot.rarity_bias * f64::from(rarity.tier()));
            Weighted::new(def.id.as_str(), weight)
        })
        .collect();

    let mut options = Vec::with_capacity(size);
    while options.len() < size {
        let Some(&picked) = rng.pick_weighted(&pool) else {
            break;
        };
        pool.retain(|entry| entry.value != picked);
        options.push(picked.to_string());
    }

    RewardOffer {
        options,
        quantity_factor: loot.quantity_factor,
        rarity_bias: loot.rarity_bias,
    }
}

/// Add one stack of `item_id` to a run's items.
pub fn grant_item(items: &mut Vec<ItemInstance>, item_id: &str) {
    match items.iter_mut().find(|item| item.id == item_id) {
        Some(item) => item.stacks = item.stacks.saturating_add(1),
        None => items.push(ItemInstance::new(item_id, 1)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{ItemDefinition, ItemRegistry, Rarity};

    fn catalog() -> ItemRegistry {
        ItemRegistry::new(vec![
            ItemDefinition::new("pebble", "Pebble", Rarity::Common),
            ItemDefinition::new("twig", "Twig", Rarity::Common),
            ItemDefinition::new("charm", "Charm", Rarity::Uncommon),
            ItemDefinition::new("relic", "Relic", Rarity::Rare),
            ItemDefinition::new("crown", "Crown", Rarity::Legendary),
        ])
        .unwrap()
    }

    #[test]
    fn offer_is_distinct_and_sized() {
        let catalog = catalog();
        let mut rng = SeededRng::from_seed_str("run|2|choice");
        let offer = roll_reward_offer(&catalog, LootModifiers::default(), &mut rng);

        assert_eq!(offer.options.len(), 3);
        let mut unique = offer.options.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), 3);
    }

    #[test]
    fn quantity_factor_scales_and_caps() {
        assert_eq!(offer_size(1.0, 10), 3);
        assert_eq!(offer_size(1.7, 10), 5);
        assert_eq!(offer_size(0.1, 10), 1);
        assert_eq!(offer_size(10.0, 4), 4);
        assert_eq!(offer_size(1.0, 0), 0);
    }

    #[test]
    fn rarity_bias_shifts_toward_rare_items() {
        let catalog = catalog();
        let count_legendary = |bias: f64| {
            let mut rng = SeededRng::new(5);
            (0..2_000)
                .filter(|_| {
                    let loot = LootModifiers {
                        quantity_factor: 1.0 / 3.0,
                        rarity_bias: bias,
                    };
                    roll_reward_offer(&catalog, loot, &mut rng).options == ["crown"]
                })
                .count()
        };
        assert!(count_legendary(5.0) > count_legendary(0.0) * 3);
    }

    #[test]
    fn grant_stacks_existing_items() {
        let mut items = vec![ItemInstance::new("twig", 2)];
        grant_item(&mut items, "twig");
        grant_item(&mut items, "crown");
        assert_eq!(items, [ItemInstance::new("twig", 3), ItemInstance::new("crown", 1)]);
    }
}
