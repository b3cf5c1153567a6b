//! Application state: the controller plus terminal-only concerns (board
//! cursor, quit flag) and the key-to-intent mapping.

use crossterm::event::{KeyCode, KeyEvent};
use strictly_chess::{PieceKind, Square};

use crate::controller::{Controller, InputEvent};
use crate::tui::input;

/// TUI application state.
pub struct App {
    controller: Controller,
    cursor: Square,
    should_quit: bool,
}

impl App {
    /// Creates the application around an injected controller.
    pub fn new(controller: Controller) -> Self {
        Self {
            controller,
            cursor: "e2".parse().expect("static square"),
            should_quit: false,
        }
    }

    /// The controller, for rendering.
    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    /// The controller, for event delivery.
    pub fn controller_mut(&mut self) -> &mut Controller {
        &mut self.controller
    }

    /// The keyboard board cursor.
    pub fn cursor(&self) -> Square {
        self.cursor
    }

    /// Whether the user asked to quit.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Maps a key press to controller input or local navigation.
    pub fn handle_key(&mut self, key: KeyEvent) {
        // The promotion menu owns the keyboard while it is open.
        if self.controller.promotion().awaiting_choice() {
            match key.code {
                KeyCode::Left => self.controller.promotion_cursor_prev(),
                KeyCode::Right => self.controller.promotion_cursor_next(),
                KeyCode::Enter => {
                    let kind = self.controller.promotion().choice_at_cursor();
                    self.controller.handle_input(InputEvent::PromotionChoice(kind));
                }
                KeyCode::Esc => self.controller.handle_input(InputEvent::PromotionCancel),
                KeyCode::Char(c) => {
                    if let Some(kind) = PieceKind::from_promotion_char(c) {
                        self.controller.handle_input(InputEvent::PromotionChoice(kind));
                    }
                }
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('n') => self.controller.handle_input(InputEvent::NewGame),
            KeyCode::Char('a') => self.controller.handle_input(InputEvent::EngineMove),
            KeyCode::Char('u') => self.controller.handle_input(InputEvent::Undo),
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.controller.handle_input(InputEvent::Square(self.cursor));
            }
            KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right => {
                self.cursor = input::move_cursor(self.cursor, key.code);
            }
            _ => {}
        }
    }

    /// Delivers a board click (from the mouse).
    pub fn handle_click(&mut self, square: Square) {
        self.cursor = square;
        self.controller.handle_input(InputEvent::Square(square));
    }
}
