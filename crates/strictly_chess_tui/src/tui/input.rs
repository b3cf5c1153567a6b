//! Cursor movement for keyboard board navigation.

use crossterm::event::KeyCode;
use strictly_chess::Square;

/// Moves the board cursor one square, clamped to the board edges.
pub fn move_cursor(cursor: Square, key: KeyCode) -> Square {
    let moved = match key {
        KeyCode::Up => cursor.offset(0, 1),
        KeyCode::Down => cursor.offset(0, -1),
        KeyCode::Left => cursor.offset(-1, 0),
        KeyCode::Right => cursor.offset(1, 0),
        _ => None,
    };
    moved.unwrap_or(cursor)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn moves_within_the_board() {
        assert_eq!(move_cursor(sq("e4"), KeyCode::Up), sq("e5"));
        assert_eq!(move_cursor(sq("e4"), KeyCode::Down), sq("e3"));
        assert_eq!(move_cursor(sq("e4"), KeyCode::Left), sq("d4"));
        assert_eq!(move_cursor(sq("e4"), KeyCode::Right), sq("f4"));
    }

    #[test]
    fn clamps_at_the_edges() {
        assert_eq!(move_cursor(sq("a1"), KeyCode::Left), sq("a1"));
        assert_eq!(move_cursor(sq("a1"), KeyCode::Down), sq("a1"));
        assert_eq!(move_cursor(sq("h8"), KeyCode::Right), sq("h8"));
        assert_eq!(move_cursor(sq("h8"), KeyCode::Up), sq("h8"));
    }

    #[test]
    fn other_keys_leave_the_cursor_alone() {
        assert_eq!(move_cursor(sq("e4"), KeyCode::Enter), sq("e4"));
    }
}
