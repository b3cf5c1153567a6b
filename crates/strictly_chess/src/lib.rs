//! Strictly Chess - chess rules facade
//!
//! Authoritative board state for the interactive client: legal-move
//! queries, move application with rejection semantics, undo, reset, and
//! game-termination queries. Move legality itself is delegated to the
//! `shakmaty` crate; this crate owns the narrow contract, the undo stack,
//! and the verbose move history.
//!
//! # Example
//!
//! ```
//! use strictly_chess::{Game, MoveIntent};
//!
//! let mut game = Game::new();
//! let intent = MoveIntent::from_uci("e2e4")?;
//! let record = game.apply(intent)?;
//! assert_eq!(record.san, "e4");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod game;
mod moves;
mod types;

pub use error::{FenError, MoveError, ParseMoveError, ParseSquareError};
pub use game::Game;
pub use moves::{LegalMove, MoveIntent, MoveRecord};
pub use types::{Piece, PieceKind, Side, Square};
