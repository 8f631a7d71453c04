//! Repository layer for dynamic run data.
//!
//! Repositories handle data that CHANGES during a run:
//! - Run checkpoints (seed, stage number, stage plan, status)
//! - Run items
//! - The player's loadout, read once at run start
//!
//! Static game content (item catalog, configuration) is loaded through
//! `rogue-content`, not through repositories.

mod error;
mod file;
mod memory;
mod record;
mod traits;

pub use error::{RepositoryError, Result};
pub use file::FileRunRepository;
pub use memory::{InMemoryRunRepository, StaticLoadout};
pub use record::{RunId, RunProgress, RunRecord};
pub use traits::{LoadoutRepository, RunRepository};
