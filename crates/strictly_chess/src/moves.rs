//! Move intents and applied-move records.

use std::fmt;

use crate::error::ParseMoveError;
use crate::types::{PieceKind, Side, Square};

/// A candidate move submitted for validation and application.
///
/// Created transiently (two clicked squares, or a parsed engine move),
/// consumed by [`crate::Game::apply`], and discarded whether accepted or
/// rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveIntent {
    /// Origin square.
    pub from: Square,
    /// Destination square.
    pub to: Square,
    /// Promotion kind, required only for pawn moves to the last rank.
    pub promotion: Option<PieceKind>,
}

impl MoveIntent {
    /// Creates an intent without a promotion kind.
    pub fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            promotion: None,
        }
    }

    /// Sets the promotion kind.
    pub fn promoting(mut self, kind: PieceKind) -> Self {
        self.promotion = Some(kind);
        self
    }

    /// Parses compact algebraic form: `<from><to>[promotion]`, e.g.
    /// `e2e4` or `e7e8q`.
    pub fn from_uci(s: &str) -> Result<Self, ParseMoveError> {
        let s = s.trim();
        if !s.is_ascii() || s.len() < 4 || s.len() > 5 {
            return Err(ParseMoveError::new(s));
        }
        let from: Square = s[0..2].parse().map_err(|_| ParseMoveError::new(s))?;
        let to: Square = s[2..4].parse().map_err(|_| ParseMoveError::new(s))?;
        let promotion = match s[4..].chars().next() {
            Some(c) => Some(PieceKind::from_promotion_char(c).ok_or_else(|| ParseMoveError::new(s))?),
            None => None,
        };
        Ok(Self {
            from,
            to,
            promotion,
        })
    }
}

impl fmt::Display for MoveIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(c) = self.promotion.and_then(PieceKind::promotion_char) {
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

/// A legal destination reachable from a queried square.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegalMove {
    /// Destination square.
    pub to: Square,
    /// Promotion kind if this move is one leg of a promotion.
    pub promotion: Option<PieceKind>,
}

/// Record of a move that was actually applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRecord {
    /// Origin square.
    pub from: Square,
    /// Destination square.
    pub to: Square,
    /// Side that moved.
    pub side: Side,
    /// Kind of piece that moved.
    pub piece: PieceKind,
    /// Whether the move captured a piece.
    pub capture: bool,
    /// Promotion kind, if any.
    pub promotion: Option<PieceKind>,
    /// Standard algebraic notation for display.
    pub san: String,
}
