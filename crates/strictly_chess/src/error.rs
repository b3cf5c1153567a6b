//! Error types for move application and position parsing.

use derive_more::{Display, Error};

use crate::types::Square;

/// Failure to interpret a string as a board square.
#[derive(Debug, Clone, Display, Error)]
#[display("not a square: {input:?}")]
pub struct ParseSquareError {
    /// The rejected input.
    pub input: String,
}

impl ParseSquareError {
    pub(crate) fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
        }
    }
}

/// Failure to interpret a string as a compact algebraic move.
#[derive(Debug, Clone, Display, Error)]
#[display("not a move: {input:?}")]
pub struct ParseMoveError {
    /// The rejected input.
    pub input: String,
}

impl ParseMoveError {
    pub(crate) fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
        }
    }
}

/// Rejection of a move intent. The position is never mutated when one of
/// these is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum MoveError {
    /// The from-square holds no piece.
    #[display("no piece on {_0}")]
    NoPiece(#[error(not(source))] Square),
    /// The from-square holds a piece of the side not to move.
    #[display("piece on {_0} belongs to the opponent")]
    WrongSide(#[error(not(source))] Square),
    /// No legal move connects the two squares.
    #[display("illegal move {from}{to}")]
    Illegal {
        /// Requested origin.
        from: Square,
        /// Requested destination.
        to: Square,
    },
    /// A pawn move to the last rank was submitted without a promotion kind.
    #[display("move {from}{to} requires a promotion choice")]
    MissingPromotion {
        /// Requested origin.
        from: Square,
        /// Requested destination.
        to: Square,
    },
}

/// Failure to load a position from an exchange (FEN) string.
#[derive(Debug, Clone, Display, Error)]
#[display("invalid position: {message}")]
pub struct FenError {
    /// What was wrong with the input.
    pub message: String,
}

impl FenError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
