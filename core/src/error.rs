use thiserror::Error;

use crate::CellCount;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Board needs at least one row and one column")]
    EmptyBoard,
    #[error("Too many bombs: requested {bombs} but only {capacity} fit outside the opening area")]
    TooManyBombs { bombs: CellCount, capacity: CellCount },
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Layout has {actual} bombs but the board expects {expected}")]
    BombCountMismatch { expected: CellCount, actual: CellCount },
    #[error("Starting position is not safe")]
    UnsafeOrigin,
    #[error("Game has not started, reveal a tile first")]
    NotStarted,
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
}

impl GameError {
    /// Whether this error rejects the board parameters themselves, as opposed to a single move.
    pub const fn is_construction(self) -> bool {
        matches!(self, Self::EmptyBoard | Self::TooManyBombs { .. })
    }
}

pub type Result<T> = core::result::Result<T, GameError>;
