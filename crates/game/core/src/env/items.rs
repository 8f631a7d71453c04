use std::collections::HashMap;

use crate::effects::ItemHooks;
use crate::error::{ErrorSeverity, GameError};
use crate::stats::StatModifier;

/// Read-only catalog of item definitions.
///
/// Registration order is significant: the item pipeline invokes hooks in
/// this order, so it must be stable for a given catalog.
pub trait ItemCatalog: Send + Sync {
    fn definition(&self, id: &str) -> Option<&ItemDefinition>;

    /// Returns all definitions in registration order.
    fn definitions(&self) -> &[ItemDefinition];

    /// Registration position of an item.
    fn position(&self, id: &str) -> Option<usize> {
        self.definitions().iter().position(|d| d.id == id)
    }
}

/// Item rarity tier.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Rarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    Legendary,
}

impl Rarity {
    /// Base selection weight in reward offers.
    pub const fn weight(self) -> f64 {
        match self {
            Self::Common => 60.0,
            Self::Uncommon => 25.0,
            Self::Rare => 12.0,
            Self::Legendary => 3.0,
        }
    }

    /// Tier index used to scale rarity bias (0 for common).
    pub const fn tier(self) -> u32 {
        match self {
            Self::Common => 0,
            Self::Uncommon => 1,
            Self::Rare => 2,
            Self::Legendary => 3,
        }
    }
}

/// Static catalog entry.
///
/// # Design: Data + Hook Record
///
/// - Display data and stat modifiers are plain data (loadable from content files)
/// - `hooks` is a record of optional function pointers; an item opts into only
///   the hooks it needs and the pipeline skips the rest
#[derive(Clone, Debug)]
pub struct ItemDefinition {
    pub id: String,
    pub name: String,
    pub description: String,
    pub rarity: Rarity,
    pub stat_modifiers: Vec<StatModifier>,
    pub hooks: ItemHooks,
}

impl ItemDefinition {
    pub fn new(id: impl Into<String>, name: impl Into<String>, rarity: Rarity) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            rarity,
            stat_modifiers: Vec::new(),
            hooks: ItemHooks::default(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_modifier(mut self, modifier: StatModifier) -> Self {
        self.stat_modifiers.push(modifier);
        self
    }

    pub fn with_hooks(mut self, hooks: ItemHooks) -> Self {
        self.hooks = hooks;
        self
    }
}

/// An owned item: id plus stack count.
///
/// Stacks are unbounded. Run items are a snapshot of the account loadout
/// taken at run start; the two are never authoritative at the same time.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ItemInstance {
    pub id: String,
    pub stacks: u32,
}

impl ItemInstance {
    pub fn new(id: impl Into<String>, stacks: u32) -> Self {
        Self {
            id: id.into(),
            stacks,
        }
    }
}

/// Errors raised when resolving item ids against a catalog.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ItemError {
    #[error("unknown item id `{id}`")]
    UnknownItem { id: String },

    #[error("item id `{id}` registered twice")]
    DuplicateItem { id: String },
}

impl GameError for ItemError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownItem { .. } => "ITEM_UNKNOWN",
            Self::DuplicateItem { .. } => "ITEM_DUPLICATE",
        }
    }
}

/// Immutable in-memory catalog with id lookup.
#[derive(Clone, Debug, Default)]
pub struct ItemRegistry {
    items: Vec<ItemDefinition>,
    index: HashMap<String, usize>,
}

impl ItemRegistry {
    /// Build a registry, rejecting duplicate ids.
    pub fn new(items: Vec<ItemDefinition>) -> Result<Self, ItemError> {
        let mut index = HashMap::with_capacity(items.len());
        for (position, item) in items.iter().enumerate() {
            if index.insert(item.id.clone(), position).is_some() {
                return Err(ItemError::DuplicateItem {
                    id: item.id.clone(),
                });
            }
        }
        Ok(Self { items, index })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl ItemCatalog for ItemRegistry {
    fn definition(&self, id: &str) -> Option<&ItemDefinition> {
        self.index.get(id).map(|&i| &self.items[i])
    }

    fn definitions(&self) -> &[ItemDefinition] {
        &self.items
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }
}
