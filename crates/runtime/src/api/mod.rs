//! Public runtime API surface.
//!
//! This module gathers the types exposed to consumers of the runtime crate so
//! the session and repositories can stay focused on orchestration.

pub mod errors;

pub use errors::{Result, RuntimeError};
