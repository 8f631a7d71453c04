//! Fixed loadout source.

use async_trait::async_trait;
use rogue_core::ItemInstance;

use crate::repository::{LoadoutRepository, Result};

/// A loadout that never changes, for tests and offline play.
#[derive(Clone, Debug, Default)]
pub struct StaticLoadout {
    items: Vec<ItemInstance>,
}

impl StaticLoadout {
    pub fn new(items: Vec<ItemInstance>) -> Self {
        Self { items }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LoadoutRepository for StaticLoadout {
    async fn list_loadout(&self) -> Result<Vec<ItemInstance>> {
        Ok(self.items.clone())
    }
}
