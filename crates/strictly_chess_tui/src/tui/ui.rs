//! Stateless rendering: a pure projection of controller state.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use strictly_chess::{Piece, PieceKind, Side, Square};

use crate::promotion::PROMOTION_CHOICES;
use crate::tui::app::App;

const CELL_WIDTH: u16 = 5;
const CELL_HEIGHT: u16 = 2;
/// Rank labels to the left of the board.
const LABEL_WIDTH: u16 = 3;

const LIGHT_SQUARE: Color = Color::Rgb(240, 217, 181);
const DARK_SQUARE: Color = Color::Rgb(181, 136, 99);

/// Screen regions shared by rendering and mouse hit-testing.
struct Regions {
    title: Rect,
    board: Rect,
    moves: Rect,
    status: Rect,
}

fn regions(area: Rect) -> Regions {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(8 * CELL_HEIGHT + 1),
            Constraint::Length(3),
        ])
        .split(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(LABEL_WIDTH + 8 * CELL_WIDTH),
            Constraint::Min(16),
        ])
        .split(rows[1]);

    Regions {
        title: rows[0],
        board: columns[0],
        moves: columns[1],
        status: rows[2],
    }
}

/// Smallest frame the layout fits in.
const MIN_WIDTH: u16 = LABEL_WIDTH + 8 * CELL_WIDTH + 16;
const MIN_HEIGHT: u16 = 8 * CELL_HEIGHT + 5;

/// Renders the whole screen.
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();
    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let notice = Paragraph::new(format!(
            "Terminal too small: need at least {MIN_WIDTH}x{MIN_HEIGHT}"
        ));
        frame.render_widget(notice, area);
        return;
    }
    let regions = regions(area);
    let controller = app.controller();

    let title = Paragraph::new("Strictly Chess")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    frame.render_widget(title, regions.title);

    draw_board(frame, regions.board, app);
    draw_moves(frame, regions.moves, app);

    let help = "arrows: move  enter: select  a: engine move  u: undo  n: new game  q: quit";
    let status = Paragraph::new(vec![
        Line::from(controller.status().as_str()),
        Line::from(Span::styled(help, Style::default().fg(Color::DarkGray))),
    ])
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, regions.status);

    if controller.promotion().awaiting_choice() {
        draw_promotion_menu(frame, regions.board, app);
    }
}

/// Maps a screen position to a board square, using the same geometry as
/// [`draw`]. `area` is the full frame area.
pub fn square_at(area: Rect, column: u16, row: u16) -> Option<Square> {
    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        return None;
    }
    let board = regions(area).board;
    let x0 = board.x + LABEL_WIDTH;
    let y0 = board.y;
    if column < x0 || row < y0 {
        return None;
    }
    let file = (column - x0) / CELL_WIDTH;
    let row_index = (row - y0) / CELL_HEIGHT;
    if file >= 8 || row_index >= 8 {
        return None;
    }
    Square::new(file as u8, (7 - row_index) as u8)
}

fn draw_board(frame: &mut Frame, area: Rect, app: &App) {
    let controller = app.controller();
    let selection = controller.selection();
    let check_square = *controller.check_square();

    for rank in 0..8u8 {
        for file in 0..8u8 {
            let square = Square::new(file, rank).expect("on-board indices");
            let cell = Rect::new(
                area.x + LABEL_WIDTH + u16::from(file) * CELL_WIDTH,
                area.y + u16::from(7 - rank) * CELL_HEIGHT,
                CELL_WIDTH,
                CELL_HEIGHT,
            );

            let base = if (file + rank) % 2 == 0 {
                DARK_SQUARE
            } else {
                LIGHT_SQUARE
            };
            let bg = if check_square == Some(square) {
                Color::Red
            } else if selection.selected() == Some(square) {
                Color::Cyan
            } else if selection.is_target(square) {
                Color::LightGreen
            } else if app.cursor() == square {
                Color::Yellow
            } else {
                base
            };

            let symbol = controller
                .game()
                .piece_at(square)
                .map(piece_symbol)
                .unwrap_or(" ");
            let style = Style::default().bg(bg).fg(Color::Black);
            let cell_widget = Paragraph::new(Line::from(Span::raw(symbol)))
                .style(style)
                .alignment(Alignment::Center);
            frame.render_widget(cell_widget, cell);
        }

        // Rank label.
        let label = Rect::new(
            area.x,
            area.y + u16::from(7 - rank) * CELL_HEIGHT,
            LABEL_WIDTH,
            1,
        );
        let text = Paragraph::new(format!("{} ", rank + 1))
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Right);
        frame.render_widget(text, label);
    }

    // File labels under the board.
    let mut spans = Vec::new();
    for file in 0..8u8 {
        let letter = (b'a' + file) as char;
        spans.push(Span::styled(
            format!("{:^width$}", letter, width = CELL_WIDTH as usize),
            Style::default().fg(Color::DarkGray),
        ));
    }
    let labels = Rect::new(
        area.x + LABEL_WIDTH,
        area.y + 8 * CELL_HEIGHT,
        8 * CELL_WIDTH,
        1,
    );
    frame.render_widget(Paragraph::new(Line::from(spans)), labels);
}

fn draw_moves(frame: &mut Frame, area: Rect, app: &App) {
    let history = app.controller().game().history();
    let lines: Vec<Line> = history
        .chunks(2)
        .enumerate()
        .map(|(i, pair)| {
            let white = pair.first().map(|r| r.san.as_str()).unwrap_or("");
            let black = pair.get(1).map(|r| r.san.as_str()).unwrap_or("");
            Line::from(format!("{:>3}. {:<8} {}", i + 1, white, black))
        })
        .collect();

    // Keep the latest moves visible in a short panel.
    let visible = area.height.saturating_sub(2) as usize;
    let skip = lines.len().saturating_sub(visible);
    let paragraph = Paragraph::new(lines[skip..].to_vec())
        .block(Block::default().title("Moves").borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

fn draw_promotion_menu(frame: &mut Frame, board: Rect, app: &App) {
    let controller = app.controller();
    let side = controller.game().turn();

    let width = 4 * CELL_WIDTH + 2;
    let height = 3;
    let popup = Rect::new(
        board.x + (board.width.saturating_sub(width)) / 2,
        board.y + (board.height.saturating_sub(height)) / 2,
        width,
        height,
    );

    frame.render_widget(Clear, popup);

    let mut spans = Vec::new();
    for (i, kind) in PROMOTION_CHOICES.iter().enumerate() {
        let symbol = piece_symbol(Piece { kind: *kind, side });
        let style = if i == controller.promotion().cursor() {
            Style::default().bg(Color::Cyan).fg(Color::Black)
        } else {
            Style::default()
        };
        spans.push(Span::styled(
            format!("{:^width$}", symbol, width = CELL_WIDTH as usize),
            style,
        ));
    }

    let menu = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(Block::default().title("Promote to").borders(Borders::ALL));
    frame.render_widget(menu, popup);
}

/// Unicode figurine for a piece.
fn piece_symbol(piece: Piece) -> &'static str {
    match (piece.side, piece.kind) {
        (Side::White, PieceKind::King) => "♔",
        (Side::White, PieceKind::Queen) => "♕",
        (Side::White, PieceKind::Rook) => "♖",
        (Side::White, PieceKind::Bishop) => "♗",
        (Side::White, PieceKind::Knight) => "♘",
        (Side::White, PieceKind::Pawn) => "♙",
        (Side::Black, PieceKind::King) => "♚",
        (Side::Black, PieceKind::Queen) => "♛",
        (Side::Black, PieceKind::Rook) => "♜",
        (Side::Black, PieceKind::Bishop) => "♝",
        (Side::Black, PieceKind::Knight) => "♞",
        (Side::Black, PieceKind::Pawn) => "♟",
    }
}
