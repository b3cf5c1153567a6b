//! Core domain types shared across the crate.

use std::fmt;
use std::str::FromStr;

use crate::error::ParseSquareError;

/// Side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum Side {
    /// White (moves first).
    White,
    /// Black.
    Black,
}

impl Side {
    /// Returns the opposing side.
    pub fn opponent(self) -> Self {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }

    /// Rank index (0-7) a pawn of this side promotes on.
    pub fn promotion_rank(self) -> u8 {
        match self {
            Side::White => 7,
            Side::Black => 0,
        }
    }
}

/// Kind of chess piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum PieceKind {
    /// Pawn.
    Pawn,
    /// Knight.
    Knight,
    /// Bishop.
    Bishop,
    /// Rook.
    Rook,
    /// Queen.
    Queen,
    /// King.
    King,
}

impl PieceKind {
    /// Parses the lowercase letter used in compact algebraic promotion
    /// suffixes (`q`, `r`, `b`, `n`).
    pub fn from_promotion_char(c: char) -> Option<Self> {
        match c {
            'q' => Some(PieceKind::Queen),
            'r' => Some(PieceKind::Rook),
            'b' => Some(PieceKind::Bishop),
            'n' => Some(PieceKind::Knight),
            _ => None,
        }
    }

    /// Lowercase letter used in compact algebraic promotion suffixes.
    pub fn promotion_char(self) -> Option<char> {
        match self {
            PieceKind::Queen => Some('q'),
            PieceKind::Rook => Some('r'),
            PieceKind::Bishop => Some('b'),
            PieceKind::Knight => Some('n'),
            _ => None,
        }
    }
}

/// A piece on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    /// Kind of piece.
    pub kind: PieceKind,
    /// Side that owns it.
    pub side: Side,
}

/// A square on the 8x8 board, addressed by file (a-h) and rank (1-8).
///
/// Immutable value identifier; parses from and formats as coordinate
/// notation such as `e4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Square {
    file: u8,
    rank: u8,
}

impl Square {
    /// Creates a square from 0-based file and rank indices.
    ///
    /// Returns `None` if either index is outside 0-7.
    pub fn new(file: u8, rank: u8) -> Option<Self> {
        if file < 8 && rank < 8 {
            Some(Self { file, rank })
        } else {
            None
        }
    }

    /// 0-based file index (0 = a-file).
    pub fn file_index(self) -> u8 {
        self.file
    }

    /// 0-based rank index (0 = rank 1).
    pub fn rank_index(self) -> u8 {
        self.rank
    }

    /// File letter, `a` through `h`.
    pub fn file_char(self) -> char {
        (b'a' + self.file) as char
    }

    /// Rank digit, `1` through `8`.
    pub fn rank_char(self) -> char {
        (b'1' + self.rank) as char
    }

    /// The square one step in the given direction, if still on the board.
    pub fn offset(self, dfile: i8, drank: i8) -> Option<Self> {
        let file = self.file as i8 + dfile;
        let rank = self.rank as i8 + drank;
        if (0..8).contains(&file) && (0..8).contains(&rank) {
            Some(Self {
                file: file as u8,
                rank: rank as u8,
            })
        } else {
            None
        }
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file_char(), self.rank_char())
    }
}

impl FromStr for Square {
    type Err = ParseSquareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let (Some(file), Some(rank), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(ParseSquareError::new(s));
        };
        if !('a'..='h').contains(&file) || !('1'..='8').contains(&rank) {
            return Err(ParseSquareError::new(s));
        }
        Ok(Self {
            file: file as u8 - b'a',
            rank: rank as u8 - b'1',
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_round_trips_through_notation() {
        for file in 0..8u8 {
            for rank in 0..8u8 {
                let sq = Square::new(file, rank).unwrap();
                let parsed: Square = sq.to_string().parse().unwrap();
                assert_eq!(sq, parsed);
            }
        }
    }

    #[test]
    fn square_rejects_bad_notation() {
        assert!("i1".parse::<Square>().is_err());
        assert!("a9".parse::<Square>().is_err());
        assert!("e44".parse::<Square>().is_err());
        assert!("".parse::<Square>().is_err());
    }

    #[test]
    fn offset_clamps_to_board() {
        let a1 = Square::new(0, 0).unwrap();
        assert_eq!(a1.offset(-1, 0), None);
        assert_eq!(a1.offset(0, -1), None);
        assert_eq!(a1.offset(1, 1), Square::new(1, 1));
    }

    #[test]
    fn promotion_chars_cover_the_four_choices() {
        for c in ['q', 'r', 'b', 'n'] {
            let kind = PieceKind::from_promotion_char(c).unwrap();
            assert_eq!(kind.promotion_char(), Some(c));
        }
        assert_eq!(PieceKind::from_promotion_char('k'), None);
    }
}
