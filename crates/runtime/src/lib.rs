//! Runtime orchestration for the deterministic run simulation.
//!
//! This crate wires the pure rules of `rogue-core` to persistence. Consumers
//! build a [`RunSession`] with a [`RunRepository`] (and optionally a
//! [`LoadoutRepository`] and an item catalog) and drive a run through it:
//! start or resume, resolve each stage, advance.
//!
//! Modules are organized by responsibility:
//! - [`session`] hosts the session and its builder
//! - [`api`] exposes the error types downstream clients interact with
//! - [`repository`] provides the collaborator contracts and their in-memory
//!   and JSON-file implementations
pub mod api;
pub mod config;
pub mod repository;
pub mod session;

pub use api::{Result, RuntimeError};
pub use config::RuntimeConfig;
pub use repository::{
    FileRunRepository, InMemoryRunRepository, LoadoutRepository, RepositoryError, RunId,
    RunProgress, RunRecord, RunRepository, StaticLoadout,
};
pub use session::{RunSession, RunSessionBuilder};
