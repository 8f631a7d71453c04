//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from repositories, content loading and the core rules so
//! clients can bubble them up with consistent context.
use rogue_core::{ErrorSeverity, GameError, ItemError, RunError, RunStatus, StageType};
use thiserror::Error;

pub use crate::repository::RepositoryError;
use crate::repository::RunId;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("no run is loaded")]
    NoActiveRun,

    #[error("run {run_id} is {status}, not active")]
    RunNotActive { run_id: RunId, status: RunStatus },

    #[error("stage {stage_number} is a {found} stage, not {expected}")]
    WrongStageType {
        stage_number: u64,
        expected: StageType,
        found: StageType,
    },

    #[error("stage {stage_number} is already resolved")]
    StageAlreadyResolved { stage_number: u64 },

    #[error("combat stage {stage_number} has no combat type")]
    MissingCombatType { stage_number: u64 },

    #[error("reward option {index} out of range ({options} offered)")]
    InvalidRewardChoice { index: usize, options: usize },

    #[error("run session requires a run repository before building")]
    MissingRunRepository,

    #[error(transparent)]
    Content(#[from] anyhow::Error),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Item(#[from] ItemError),

    #[error(transparent)]
    Run(#[from] RunError),
}

impl GameError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Item(e) => e.severity(),
            Self::Run(e) => e.severity(),
            Self::Repository(_) => ErrorSeverity::Recoverable,
            Self::MissingRunRepository | Self::Content(_) => ErrorSeverity::Fatal,
            Self::MissingCombatType { .. } => ErrorSeverity::Internal,
            Self::NoActiveRun
            | Self::RunNotActive { .. }
            | Self::WrongStageType { .. }
            | Self::StageAlreadyResolved { .. }
            | Self::InvalidRewardChoice { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Item(e) => e.error_code(),
            Self::Run(e) => e.error_code(),
            Self::NoActiveRun => "SESSION_NO_ACTIVE_RUN",
            Self::RunNotActive { .. } => "SESSION_RUN_NOT_ACTIVE",
            Self::WrongStageType { .. } => "SESSION_WRONG_STAGE_TYPE",
            Self::StageAlreadyResolved { .. } => "SESSION_STAGE_RESOLVED",
            Self::MissingCombatType { .. } => "SESSION_MISSING_COMBAT_TYPE",
            Self::InvalidRewardChoice { .. } => "SESSION_INVALID_REWARD",
            Self::MissingRunRepository => "SESSION_MISSING_REPOSITORY",
            Self::Content(_) => "SESSION_CONTENT",
            Self::Repository(_) => "SESSION_REPOSITORY",
        }
    }
}
