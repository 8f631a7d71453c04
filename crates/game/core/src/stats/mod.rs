//! Player stat builder.
//!
//! ```text
//! [ Level curves ]      compute_base_stats(level)
//!      ↓
//! [ Item modifiers ]    Flat → Multiplier (per stat)
//!      ↓
//! [ Clamp ]             StatKind::bounds()
//! ```
//!
//! Numeric domain violations are never surfaced as errors; every stat is
//! clamped at the point it is computed.

pub mod bonus;
pub mod modifiers;
pub mod player;

pub use bonus::{Bonus, BonusStack, StatBounds};
pub use modifiers::{ModifierOp, StatKind, StatModifier, apply_item_modifiers};
pub use player::{PlayerStats, compute_base_stats};
