//! Data-driven content definitions and loaders.
//!
//! This crate houses static game content for `rogue-core`:
//! - Item effect presets: the hook implementations items refer to by name
//! - Item catalogs (data-driven via RON)
//! - Game configuration (data-driven via TOML)
//!
//! The standard catalog is compiled in; deployments can load their own
//! through [`ContentFactory`].

pub mod effects;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use effects::{EFFECT_NAMES, effect_hooks};

#[cfg(feature = "loaders")]
pub use loaders::{
    ConfigLoader, ContentFactory, ItemCatalogFile, ItemLoader, ItemRecord, LoadResult,
};

/// The bundled item catalog.
#[cfg(feature = "loaders")]
pub const STANDARD_ITEMS_RON: &str = include_str!("../data/items.ron");

/// Parse the bundled item catalog.
#[cfg(feature = "loaders")]
pub fn standard_catalog() -> LoadResult<rogue_core::ItemRegistry> {
    ItemLoader::parse(STANDARD_ITEMS_RON)
}
