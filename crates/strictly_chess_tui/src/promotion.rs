//! Promotion flow: the short-lived sub-state between a pawn reaching the
//! last rank and the player's choice of replacement piece.

use strictly_chess::{Game, PieceKind, Square};

/// The four pieces a pawn may promote to, in menu order.
pub const PROMOTION_CHOICES: [PieceKind; 4] = [
    PieceKind::Queen,
    PieceKind::Rook,
    PieceKind::Bishop,
    PieceKind::Knight,
];

/// A move suspended awaiting a promotion choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingPromotion {
    /// Pawn's origin.
    pub from: Square,
    /// Last-rank destination.
    pub to: Square,
}

/// Idle -> AwaitingChoice -> Idle state machine. At most one promotion may
/// be pending; while one is, the controller suppresses board input.
#[derive(Debug, Default, Clone)]
pub struct PromotionFlow {
    pending: Option<PendingPromotion>,
    cursor: usize,
}

impl PromotionFlow {
    /// Creates the flow in its idle state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a choice is awaited.
    pub fn awaiting_choice(&self) -> bool {
        self.pending.is_some()
    }

    /// The suspended move, if any.
    pub fn pending(&self) -> Option<PendingPromotion> {
        self.pending
    }

    /// Enters the awaiting-choice state for a move. Called before any
    /// rules-engine mutation.
    pub fn begin(&mut self, from: Square, to: Square) {
        self.pending = Some(PendingPromotion { from, to });
        self.cursor = 0;
    }

    /// Takes the suspended move and returns to idle.
    pub fn complete(&mut self) -> Option<PendingPromotion> {
        self.cursor = 0;
        self.pending.take()
    }

    /// Abandons the suspended move and returns to idle.
    pub fn cancel(&mut self) {
        self.pending = None;
        self.cursor = 0;
    }

    /// Menu cursor position into [`PROMOTION_CHOICES`].
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The piece kind the cursor rests on.
    pub fn choice_at_cursor(&self) -> PieceKind {
        PROMOTION_CHOICES[self.cursor]
    }

    /// Moves the menu cursor left.
    pub fn cursor_prev(&mut self) {
        self.cursor = self.cursor.checked_sub(1).unwrap_or(PROMOTION_CHOICES.len() - 1);
    }

    /// Moves the menu cursor right.
    pub fn cursor_next(&mut self) {
        self.cursor = (self.cursor + 1) % PROMOTION_CHOICES.len();
    }
}

/// Whether a move from `from` to `to` needs a promotion choice before it
/// can be applied: the moving piece is a pawn of the side to move and the
/// destination is its last rank.
pub fn requires_promotion(game: &Game, from: Square, to: Square) -> bool {
    let Some(piece) = game.piece_at(from) else {
        return false;
    };
    piece.kind == PieceKind::Pawn
        && piece.side == game.turn()
        && to.rank_index() == piece.side.promotion_rank()
}
