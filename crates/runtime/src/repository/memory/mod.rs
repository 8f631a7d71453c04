//! In-memory repository implementations for testing and development.

mod loadout;
mod run;

pub use loadout::StaticLoadout;
pub use run::InMemoryRunRepository;
