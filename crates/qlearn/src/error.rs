use pitwall_core::WorldModelError;
use thiserror::Error;

/// Errors that can occur while learning.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LearnError {
    #[error("invalid learner configuration: {0}")]
    InvalidConfig(String),

    #[error("no legal actions to choose from")]
    NoLegalActions,

    #[error("episode exceeded {0} steps without reaching a terminal state")]
    EpisodeTooLong(usize),

    #[error("environment failure: {0}")]
    WorldModel(#[from] WorldModelError),
}

/// Convenience Result type for learning operations
pub type Result<T> = std::result::Result<T, LearnError>;
