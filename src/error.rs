use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SolverError {
    #[error("board size must be greater than 0")]
    InvalidSize,
    #[error("a run is already in progress")]
    RunInProgress,
    #[error("wait was interrupted")]
    InterruptedWait,
    #[error("failed to spawn solver thread: {0}")]
    Spawn(String),
}

pub type Result<T> = std::result::Result<T, SolverError>;
