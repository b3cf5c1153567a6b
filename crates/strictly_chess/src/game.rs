//! The rules facade: position state, legal-move queries, apply/undo/reset,
//! and termination queries.
//!
//! Board legality is delegated to [`shakmaty`]; this module owns the narrow
//! contract the interactive client consumes, plus the undo stack and the
//! verbose move history shakmaty does not keep.

use shakmaty::fen::Fen;
use shakmaty::san::San;
use shakmaty::{CastlingMode, Chess, EnPassantMode, File, Move, Position, Rank, Role};
use tracing::debug;

use crate::error::{FenError, MoveError};
use crate::moves::{LegalMove, MoveIntent, MoveRecord};
use crate::types::{Piece, PieceKind, Side, Square};

/// A chess game: the authoritative position plus move history.
#[derive(Debug, Clone)]
pub struct Game {
    pos: Chess,
    undo_stack: Vec<Chess>,
    history: Vec<MoveRecord>,
}

impl Game {
    /// Creates a game at the standard starting position.
    pub fn new() -> Self {
        Self {
            pos: Chess::default(),
            undo_stack: Vec::new(),
            history: Vec::new(),
        }
    }

    /// Loads a position from an exchange (FEN) string. History starts empty.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let setup: Fen = fen.parse().map_err(|e| FenError::new(format!("{e}")))?;
        let pos: Chess = setup
            .into_position(CastlingMode::Standard)
            .map_err(|e| FenError::new(format!("{e}")))?;
        Ok(Self {
            pos,
            undo_stack: Vec::new(),
            history: Vec::new(),
        })
    }

    /// Complete, round-trippable encoding of the current position.
    pub fn fen(&self) -> String {
        Fen::from_position(&self.pos, EnPassantMode::Legal).to_string()
    }

    /// The piece on a square, if any.
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.pos.board().piece_at(to_shakmaty(square)).map(|p| Piece {
            kind: kind_from_role(p.role),
            side: side_from_color(p.color),
        })
    }

    /// Side to move.
    pub fn turn(&self) -> Side {
        side_from_color(self.pos.turn())
    }

    /// Legal destinations from one square.
    ///
    /// Empty if the square is empty, holds an opposing piece, or the game
    /// is over. Promoting moves appear once per promotion kind.
    pub fn legal_moves_from(&self, from: Square) -> Vec<LegalMove> {
        let from_sq = to_shakmaty(from);
        let mut out = Vec::new();
        for m in &self.pos.legal_moves() {
            let (m_from, m_to) = move_endpoints(m);
            if m_from == from_sq {
                out.push(LegalMove {
                    to: from_shakmaty(m_to),
                    promotion: m.promotion().map(kind_from_role),
                });
            }
        }
        out
    }

    /// Validates and applies a move intent.
    ///
    /// Castling is addressed by the king's origin and destination (`e1g1`).
    /// Rejection never mutates the position.
    pub fn apply(&mut self, intent: MoveIntent) -> Result<MoveRecord, MoveError> {
        let piece = self.piece_at(intent.from).ok_or(MoveError::NoPiece(intent.from))?;
        if piece.side != self.turn() {
            return Err(MoveError::WrongSide(intent.from));
        }

        let m = self.find_legal(intent)?;
        let san = San::from_move(&self.pos, m.clone()).to_string();
        let record = MoveRecord {
            from: intent.from,
            to: intent.to,
            side: self.turn(),
            piece: piece.kind,
            capture: m.is_capture(),
            promotion: m.promotion().map(kind_from_role),
            san,
        };

        let prev = self.pos.clone();
        self.pos = prev.clone().play(m).map_err(|_| MoveError::Illegal {
            from: intent.from,
            to: intent.to,
        })?;
        self.undo_stack.push(prev);
        self.history.push(record.clone());
        debug!(mv = %intent, san = %record.san, "Move applied");
        Ok(record)
    }

    /// Reverts the last applied move. Returns `None` (and does nothing) on
    /// empty history.
    pub fn undo(&mut self) -> Option<MoveRecord> {
        let prev = self.undo_stack.pop()?;
        self.pos = prev;
        let record = self.history.pop();
        debug!("Move undone");
        record
    }

    /// Resets to the standard starting position and clears history.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Whether the game has ended (checkmate, stalemate, or dead draw).
    pub fn is_game_over(&self) -> bool {
        self.pos.is_game_over() || self.is_draw()
    }

    /// Whether the side to move is checkmated.
    pub fn is_checkmate(&self) -> bool {
        self.pos.is_checkmate()
    }

    /// Whether the side to move is in check.
    pub fn is_check(&self) -> bool {
        self.pos.is_check()
    }

    /// Whether the game is drawn (stalemate, insufficient material, or the
    /// 50-move rule).
    pub fn is_draw(&self) -> bool {
        self.is_stalemate() || self.is_insufficient_material() || self.pos.halfmoves() >= 100
    }

    /// Whether the side to move has no legal move but is not in check.
    pub fn is_stalemate(&self) -> bool {
        self.pos.is_stalemate()
    }

    /// Whether neither side retains mating material.
    pub fn is_insufficient_material(&self) -> bool {
        self.pos.is_insufficient_material()
    }

    /// Ordered records of every applied move.
    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    /// The square of the given side's king, if on the board.
    pub fn king_square(&self, side: Side) -> Option<Square> {
        self.pos
            .board()
            .king_of(color_from_side(side))
            .map(from_shakmaty)
    }

    /// Finds the legal shakmaty move matching an intent, enforcing the
    /// promotion-kind requirement.
    fn find_legal(&self, intent: MoveIntent) -> Result<Move, MoveError> {
        let from_sq = to_shakmaty(intent.from);
        let to_sq = to_shakmaty(intent.to);
        let mut needs_promotion = false;
        for m in &self.pos.legal_moves() {
            let (m_from, m_to) = move_endpoints(m);
            if m_from != from_sq || m_to != to_sq {
                continue;
            }
            match (m.promotion(), intent.promotion) {
                (None, None) => return Ok(m.clone()),
                (Some(role), Some(kind)) if kind_from_role(role) == kind => return Ok(m.clone()),
                (Some(_), _) => needs_promotion = true,
                (None, Some(_)) => {}
            }
        }
        if needs_promotion {
            Err(MoveError::MissingPromotion {
                from: intent.from,
                to: intent.to,
            })
        } else {
            Err(MoveError::Illegal {
                from: intent.from,
                to: intent.to,
            })
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

/// Origin and destination as the user addresses them. Castling maps to the
/// king's origin and its two-square destination.
fn move_endpoints(m: &Move) -> (shakmaty::Square, shakmaty::Square) {
    match m {
        Move::Normal { from, to, .. } => (*from, *to),
        Move::EnPassant { from, to } => (*from, *to),
        Move::Castle { king, rook } => {
            let file = if rook.file() > king.file() {
                File::G
            } else {
                File::C
            };
            (*king, shakmaty::Square::from_coords(file, king.rank()))
        }
        Move::Put { to, .. } => (*to, *to),
    }
}

fn to_shakmaty(sq: Square) -> shakmaty::Square {
    shakmaty::Square::from_coords(
        File::new(u32::from(sq.file_index())),
        Rank::new(u32::from(sq.rank_index())),
    )
}

fn from_shakmaty(sq: shakmaty::Square) -> Square {
    Square::new(u32::from(sq.file()) as u8, u32::from(sq.rank()) as u8)
        .expect("shakmaty squares are always on the board")
}

fn side_from_color(color: shakmaty::Color) -> Side {
    match color {
        shakmaty::Color::White => Side::White,
        shakmaty::Color::Black => Side::Black,
    }
}

fn color_from_side(side: Side) -> shakmaty::Color {
    match side {
        Side::White => shakmaty::Color::White,
        Side::Black => shakmaty::Color::Black,
    }
}

fn kind_from_role(role: Role) -> PieceKind {
    match role {
        Role::Pawn => PieceKind::Pawn,
        Role::Knight => PieceKind::Knight,
        Role::Bishop => PieceKind::Bishop,
        Role::Rook => PieceKind::Rook,
        Role::Queen => PieceKind::Queen,
        Role::King => PieceKind::King,
    }
}
