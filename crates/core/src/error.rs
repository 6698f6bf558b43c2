use thiserror::Error;

/// Failures reported by a world model.
///
/// The planners never inspect or recover from these; they are handed back
/// to the caller unchanged.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WorldModelError {
    #[error("illegal action {action} in state {state}")]
    IllegalAction { action: String, state: String },

    #[error("state is terminal: {0}")]
    TerminalState(String),

    #[error("invalid model configuration: {0}")]
    InvalidConfig(String),

    #[error("{0}")]
    Other(String),
}

/// Errors that can occur while planning.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanError {
    #[error("initial state has no legal actions")]
    InvalidInitialState,

    #[error("simulation budget must be at least 1")]
    InvalidBudget,

    #[error("exploration constant must be finite and non-negative, got {0}")]
    InvalidExplorationConstant(f64),

    #[error("world model failure: {0}")]
    WorldModel(#[from] WorldModelError),

    #[error("simulation produced a non-finite outcome: {0}")]
    NonFiniteOutcome(f64),

    #[error("search finished without expanding any root action")]
    NoActionsExplored,
}

/// Convenience Result type for planning operations
pub type Result<T> = std::result::Result<T, PlanError>;
