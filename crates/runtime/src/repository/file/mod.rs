//! File-based repository implementations.

mod run;

pub use run::FileRunRepository;
