//! Selection state: the currently selected square and its legal targets.

use strictly_chess::{Game, LegalMove, Square};

/// The selected square, if any, and the legal destinations from it.
///
/// Both fields change together; neither is ever stale relative to the
/// other. The controller only stores a selection whose square holds a
/// piece of the side to move.
#[derive(Debug, Default, Clone)]
pub struct Selection {
    selected: Option<Square>,
    targets: Vec<LegalMove>,
}

impl Selection {
    /// Creates an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects a square and computes its legal destinations, replacing any
    /// prior selection. The caller has already verified the square holds a
    /// piece of the side to move.
    pub fn select(&mut self, square: Square, game: &Game) {
        self.selected = Some(square);
        self.targets = game.legal_moves_from(square);
    }

    /// Clears the selection. Idempotent.
    pub fn clear(&mut self) {
        self.selected = None;
        self.targets.clear();
    }

    /// The selected square, if any.
    pub fn selected(&self) -> Option<Square> {
        self.selected
    }

    /// Legal destinations from the selected square.
    pub fn targets(&self) -> &[LegalMove] {
        &self.targets
    }

    /// Whether a square is a legal destination of the current selection.
    pub fn is_target(&self, square: Square) -> bool {
        self.targets.iter().any(|m| m.to == square)
    }
}
