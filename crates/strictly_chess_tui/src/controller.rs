//! The interaction controller: the state machine that turns clicks into
//! selections and moves, coordinates the asynchronous search engine, and
//! drives the promotion flow.
//!
//! The controller owns the game, the selection, the promotion flow, and
//! the engine client handle; its collaborators are injected at
//! construction and the view renders by reading its state. Every input
//! sequence, including stale or out-of-order engine results, lands the
//! controller back in a well-defined phase.

use derive_getters::Getters;
use tracing::{debug, info, warn};

use strictly_chess::{Game, MoveIntent, PieceKind, Square};

use crate::engine::{EngineEvent, RequestId, SearchClient};
use crate::promotion::{PromotionFlow, requires_promotion};
use crate::selection::Selection;

/// A user intent, already mapped from raw key or mouse input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// A board square was clicked.
    Square(Square),
    /// Start a fresh game.
    NewGame,
    /// Ask the engine to move for the side to move.
    EngineMove,
    /// Take back the last ply.
    Undo,
    /// A promotion piece was chosen.
    PromotionChoice(PieceKind),
    /// The promotion dialog was dismissed without a choice.
    PromotionCancel,
}

/// Top-level controller phase. The phases are mutually exclusive by
/// construction: each is derived from exactly one piece of owned state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing selected, nothing pending.
    Idle,
    /// A piece is selected and its targets are highlighted.
    Selected,
    /// A pawn move is suspended on the promotion choice.
    AwaitingPromotion,
    /// A search request is in flight.
    AwaitingEngineMove,
}

/// The interaction and engine-coordination controller.
#[derive(Getters)]
pub struct Controller {
    /// The rules engine: authoritative board state.
    game: Game,
    /// Current selection and its legal targets.
    selection: Selection,
    /// Promotion sub-state.
    promotion: PromotionFlow,
    /// Status line shown to the player.
    status: String,
    /// King square to highlight while the side to move is in check.
    check_square: Option<Square>,
    /// The one search request we are waiting on, if any.
    pending_search: Option<RequestId>,
    #[getter(skip)]
    client: SearchClient,
}

impl Controller {
    /// Creates a controller over a fresh game with an injected engine
    /// client.
    pub fn new(client: SearchClient) -> Self {
        Self::with_game(Game::new(), client)
    }

    /// Creates a controller over an existing game, for loaded positions.
    pub fn with_game(game: Game, client: SearchClient) -> Self {
        let mut controller = Self {
            game,
            selection: Selection::new(),
            promotion: PromotionFlow::new(),
            status: String::new(),
            check_square: None,
            pending_search: None,
            client,
        };
        controller.refresh_status();
        controller
    }

    /// The current phase, derived from owned state.
    pub fn phase(&self) -> Phase {
        if self.pending_search.is_some() {
            Phase::AwaitingEngineMove
        } else if self.promotion.awaiting_choice() {
            Phase::AwaitingPromotion
        } else if self.selection.selected().is_some() {
            Phase::Selected
        } else {
            Phase::Idle
        }
    }

    /// Consumes one input event and transitions accordingly.
    pub fn handle_input(&mut self, event: InputEvent) {
        debug!(?event, phase = ?self.phase(), "Input event");
        match event {
            InputEvent::Square(square) => self.handle_square_click(square),
            InputEvent::NewGame => self.new_game(),
            InputEvent::Undo => self.undo(),
            InputEvent::EngineMove => self.request_engine_move(),
            InputEvent::PromotionChoice(kind) => self.complete_promotion(kind),
            InputEvent::PromotionCancel => self.cancel_promotion(),
        }
    }

    /// Consumes one engine event.
    pub fn handle_engine_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::Ready => {
                info!("Search engine ready");
            }
            EngineEvent::BestMove { id, mv } => self.apply_engine_move(id, mv),
        }
    }

    /// Asks the engine client to quit.
    pub fn shutdown(&self) {
        self.client.shutdown();
    }

    fn handle_square_click(&mut self, square: Square) {
        // Board input is suppressed while a promotion choice or an engine
        // move is pending.
        if self.promotion.awaiting_choice() || self.pending_search.is_some() {
            return;
        }

        let Some(selected) = self.selection.selected() else {
            self.try_select(square);
            return;
        };

        // Re-clicking the selected square toggles the selection off.
        if selected == square {
            self.selection.clear();
            return;
        }

        // Clicking another own piece moves the selection there.
        if self
            .game
            .piece_at(square)
            .is_some_and(|p| p.side == self.game.turn())
        {
            self.selection.clear();
            self.try_select(square);
            return;
        }

        if !self.selection.is_target(square) {
            self.selection.clear();
            return;
        }

        // Promotion is detected before any rules-engine mutation; the move
        // completes once a piece is chosen.
        if requires_promotion(&self.game, selected, square) {
            self.selection.clear();
            self.promotion.begin(selected, square);
            return;
        }

        self.selection.clear();
        match self.game.apply(MoveIntent::new(selected, square)) {
            Ok(_) => self.refresh_status(),
            Err(e) => debug!(error = %e, "Move rejected"),
        }
    }

    /// Selects a square if it holds a piece of the side to move with at
    /// least one legal destination; otherwise a no-op.
    fn try_select(&mut self, square: Square) {
        if self
            .game
            .piece_at(square)
            .is_some_and(|p| p.side == self.game.turn())
        {
            self.selection.select(square, &self.game);
            if self.selection.targets().is_empty() {
                self.selection.clear();
            }
        }
    }

    fn new_game(&mut self) {
        info!("New game");
        self.game.reset();
        self.selection.clear();
        self.promotion.cancel();
        // Any in-flight search now answers a stale id and is dropped on
        // arrival.
        self.pending_search = None;
        self.refresh_status();
    }

    fn undo(&mut self) {
        if self.game.history().is_empty() {
            return;
        }
        self.game.undo();
        self.selection.clear();
        self.promotion.cancel();
        self.pending_search = None;
        self.refresh_status();
    }

    fn request_engine_move(&mut self) {
        if self.game.is_game_over() {
            return;
        }
        if !matches!(self.phase(), Phase::Idle | Phase::Selected) {
            return;
        }

        match self.client.find_best_move(&self.game.fen()) {
            Ok(id) => {
                self.selection.clear();
                self.pending_search = Some(id);
                self.status = "Engine is thinking...".to_string();
            }
            Err(e) => {
                warn!(error = %e, "Engine move unavailable");
                self.refresh_status();
            }
        }
    }

    fn apply_engine_move(&mut self, id: RequestId, mv: Option<String>) {
        if self.pending_search != Some(id) {
            debug!(id, "Ignoring stale search result");
            return;
        }
        self.pending_search = None;

        let Some(mv) = mv else {
            warn!("Engine found no move");
            self.refresh_status();
            return;
        };

        let intent = match MoveIntent::from_uci(&mv) {
            Ok(intent) => intent,
            Err(e) => {
                warn!(error = %e, "Unparseable engine move");
                self.refresh_status();
                return;
            }
        };

        match self.game.apply(intent) {
            Ok(record) => {
                info!(mv = %intent, san = %record.san, "Engine move applied");
                self.selection.clear();
                self.refresh_status();
            }
            Err(e) => {
                warn!(error = %e, "Engine move rejected by rules");
                self.refresh_status();
            }
        }
    }

    fn complete_promotion(&mut self, kind: PieceKind) {
        let Some(pending) = self.promotion.complete() else {
            return;
        };
        let intent = MoveIntent::new(pending.from, pending.to).promoting(kind);
        match self.game.apply(intent) {
            Ok(record) => {
                debug!(san = %record.san, "Promotion applied");
                self.selection.clear();
                self.refresh_status();
            }
            Err(e) => {
                // Only the final leg was ambiguous; rejection here leaves
                // the board untouched.
                warn!(error = %e, "Promotion rejected");
            }
        }
    }

    fn cancel_promotion(&mut self) {
        self.promotion.cancel();
    }

    /// Moves the promotion menu cursor left. No-op outside a promotion.
    pub fn promotion_cursor_prev(&mut self) {
        if self.promotion.awaiting_choice() {
            self.promotion.cursor_prev();
        }
    }

    /// Moves the promotion menu cursor right. No-op outside a promotion.
    pub fn promotion_cursor_next(&mut self) {
        if self.promotion.awaiting_choice() {
            self.promotion.cursor_next();
        }
    }

    /// Post-move bookkeeping: status text and check highlight. The move
    /// history is read straight off the game by the view.
    fn refresh_status(&mut self) {
        self.status = if self.game.is_game_over() {
            if self.game.is_checkmate() {
                format!("Checkmate! {} wins.", self.game.turn().opponent())
            } else if self.game.is_stalemate() {
                "Stalemate! Draw.".to_string()
            } else if self.game.is_insufficient_material() {
                "Draw by insufficient material.".to_string()
            } else {
                "Draw.".to_string()
            }
        } else {
            let check = if self.game.is_check() { " (check)" } else { "" };
            format!("{} to move{}", self.game.turn(), check)
        };

        self.check_square = if self.game.is_check() {
            self.game.king_square(self.game.turn())
        } else {
            None
        };
    }
}
