//! Errors reported by the board and the game session.
//!
//! Every variant is recoverable: a rejected request never leaves the board
//! partially updated.

use thiserror::Error;

use crate::types::{PieceId, Position};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// The identity does not name a live piece (never registered, or captured)
    #[error("No live piece with index {id}")]
    InvalidIdentity { id: PieceId },

    /// The target is not among the piece's generated moves
    #[error("Piece {id} cannot move to {to}")]
    IllegalMove { id: PieceId, to: Position },

    #[error("Coordinates ({file}, {rank}) are off the board (must be 0-7)")]
    OutOfBounds { file: i64, rank: i64 },

    /// Setup tried to place a second live piece on a square
    #[error("Square {position} is already taken by piece {occupant}")]
    SquareTaken { position: Position, occupant: PieceId },

    /// A text layout could not be parsed
    #[error("Bad layout on line {line}: {reason}")]
    Layout { line: usize, reason: String },
}

pub type BoardResult<T> = Result<T, BoardError>;
