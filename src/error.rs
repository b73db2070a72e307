use thiserror::Error;

/// Errors that can occur when configuring or stepping an episode.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),
    #[error("episode is already over")]
    EpisodeOver,
    #[error("protocol violation: {0}")]
    Protocol(#[from] ProtocolViolation),
}

/// Driver programming errors: transitions or queries that are never legal at
/// the current node.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolViolation {
    #[error("paddle move applied before the ball was dropped")]
    ChanceNodePending,
    #[error("chance outcome applied after the ball was already dropped")]
    BallAlreadyDropped,
    #[error("starting column {0} is out of range")]
    ColumnOutOfRange(usize),
    #[error("cell ({row}, {column}) is outside the board")]
    CellOutOfRange { row: usize, column: usize },
    #[error("undo does not match the last applied transition")]
    UndoMismatch,
}
