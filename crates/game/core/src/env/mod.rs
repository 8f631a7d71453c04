//! Read-only inputs of the simulation.
//!
//! The item catalog is an oracle: static definitions looked up by id and
//! never part of run state. The RNG is the only source of randomness and is
//! always derived from a seed.
mod items;
mod rng;

pub use items::{ItemCatalog, ItemDefinition, ItemError, ItemInstance, ItemRegistry, Rarity};
pub use rng::{SEED_SEPARATOR, SeededRng, Weighted, compose_seed, hash_seed};
