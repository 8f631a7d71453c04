//! Item catalog loader.

use std::path::Path;

use rogue_core::{ItemDefinition, ItemRegistry, Rarity, StatModifier};
use serde::{Deserialize, Serialize};

use crate::effects::effect_hooks;
use crate::loaders::{LoadResult, read_file};

/// One item as written in a RON catalog.
///
/// `effect` names a preset from [`crate::effects`]; hooks themselves are code
/// and never appear in data files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub rarity: Rarity,
    #[serde(default)]
    pub modifiers: Vec<StatModifier>,
    #[serde(default)]
    pub effect: Option<String>,
}

impl ItemRecord {
    /// Resolve the record into a definition, attaching its effect hooks.
    pub fn into_definition(self) -> LoadResult<ItemDefinition> {
        let mut definition = ItemDefinition::new(self.id, self.name, self.rarity)
            .with_description(self.description);
        for modifier in self.modifiers {
            definition = definition.with_modifier(modifier);
        }
        if let Some(effect) = self.effect {
            let hooks = effect_hooks(&effect).ok_or_else(|| {
                anyhow::anyhow!("Item `{}` uses unknown effect `{}`", definition.id, effect)
            })?;
            definition = definition.with_hooks(hooks);
        }
        Ok(definition)
    }
}

/// Item catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemCatalogFile {
    pub items: Vec<ItemRecord>,
}

/// Loader for item catalogs from RON files.
pub struct ItemLoader;

impl ItemLoader {
    /// Load an item catalog from a RON file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the RON file containing an [`ItemCatalogFile`]
    ///
    /// # Returns
    ///
    /// An [`ItemRegistry`] in file order. Unknown effects and duplicate ids
    /// are errors.
    pub fn load(path: &Path) -> LoadResult<ItemRegistry> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse an item catalog from RON text.
    pub fn parse(content: &str) -> LoadResult<ItemRegistry> {
        let catalog: ItemCatalogFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse item catalog RON: {}", e))?;

        let definitions = catalog
            .items
            .into_iter()
            .map(ItemRecord::into_definition)
            .collect::<LoadResult<Vec<_>>>()?;

        ItemRegistry::new(definitions)
            .map_err(|e| anyhow::anyhow!("Invalid item catalog: {}", e))
    }
}
