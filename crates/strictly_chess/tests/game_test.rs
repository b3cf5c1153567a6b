//! Tests for the rules facade contract.

use strictly_chess::{Game, MoveError, MoveIntent, PieceKind, Side, Square};

fn sq(s: &str) -> Square {
    s.parse().expect("test square")
}

#[test]
fn test_starting_position_basics() {
    let game = Game::new();
    assert_eq!(game.turn(), Side::White);
    assert!(!game.is_game_over());
    assert!(game.history().is_empty());

    let pawn = game.piece_at(sq("e2")).expect("pawn on e2");
    assert_eq!(pawn.kind, PieceKind::Pawn);
    assert_eq!(pawn.side, Side::White);
    assert_eq!(game.piece_at(sq("e4")), None);
}

#[test]
fn test_legal_moves_from_e2() {
    let game = Game::new();
    let targets: Vec<String> = game
        .legal_moves_from(sq("e2"))
        .iter()
        .map(|m| m.to.to_string())
        .collect();
    assert!(targets.contains(&"e3".to_string()));
    assert!(targets.contains(&"e4".to_string()));
    assert_eq!(targets.len(), 2);
}

#[test]
fn test_no_moves_from_empty_or_opponent_square() {
    let game = Game::new();
    assert!(game.legal_moves_from(sq("e4")).is_empty());
    assert!(game.legal_moves_from(sq("e7")).is_empty());
}

#[test]
fn test_apply_flips_turn_and_records_history() {
    let mut game = Game::new();
    let record = game.apply(MoveIntent::new(sq("e2"), sq("e4"))).unwrap();
    assert_eq!(record.san, "e4");
    assert_eq!(record.side, Side::White);
    assert_eq!(game.turn(), Side::Black);
    assert_eq!(game.history().len(), 1);
}

#[test]
fn test_rejection_never_mutates() {
    let mut game = Game::new();
    let before = game.fen();

    let err = game.apply(MoveIntent::new(sq("e2"), sq("e5"))).unwrap_err();
    assert!(matches!(err, MoveError::Illegal { .. }));
    assert_eq!(game.fen(), before);
    assert!(game.history().is_empty());

    let err = game.apply(MoveIntent::new(sq("e4"), sq("e5"))).unwrap_err();
    assert!(matches!(err, MoveError::NoPiece(_)));

    let err = game.apply(MoveIntent::new(sq("e7"), sq("e5"))).unwrap_err();
    assert!(matches!(err, MoveError::WrongSide(_)));
}

#[test]
fn test_apply_undo_round_trips_fen() {
    let mut game = Game::new();
    let before = game.fen();
    game.apply(MoveIntent::new(sq("e2"), sq("e4"))).unwrap();
    assert_ne!(game.fen(), before);
    game.undo().expect("one move to undo");
    assert_eq!(game.fen(), before);
    assert!(game.history().is_empty());
}

#[test]
fn test_undo_on_empty_history_is_noop() {
    let mut game = Game::new();
    let before = game.fen();
    assert_eq!(game.undo(), None);
    assert_eq!(game.fen(), before);
}

#[test]
fn test_fools_mate_is_checkmate() {
    let mut game = Game::new();
    for mv in ["f2f3", "e7e5", "g2g4", "d8h4"] {
        game.apply(MoveIntent::from_uci(mv).unwrap()).unwrap();
    }
    assert!(game.is_game_over());
    assert!(game.is_checkmate());
    assert!(game.is_check());
    // White is to move and mated; Black delivered the mate.
    assert_eq!(game.turn(), Side::White);
}

#[test]
fn test_promotion_requires_a_kind() {
    // White pawn on e7 with a clear promotion square.
    let mut game = Game::from_fen("k7/4P3/8/8/8/8/8/4K3 w - - 0 1").expect("valid position");
    let err = game
        .apply(MoveIntent::new(sq("e7"), sq("e8")))
        .unwrap_err();
    assert!(matches!(err, MoveError::MissingPromotion { .. }));

    let record = game
        .apply(MoveIntent::new(sq("e7"), sq("e8")).promoting(PieceKind::Knight))
        .unwrap();
    assert_eq!(record.promotion, Some(PieceKind::Knight));
    let piece = game.piece_at(sq("e8")).expect("promoted piece");
    assert_eq!(piece.kind, PieceKind::Knight);
}

#[test]
fn test_promotion_offers_all_four_kinds() {
    let game = Game::from_fen("k7/4P3/8/8/8/8/8/4K3 w - - 0 1").expect("valid position");
    let kinds: Vec<PieceKind> = game
        .legal_moves_from(sq("e7"))
        .iter()
        .filter(|m| m.to == sq("e8"))
        .filter_map(|m| m.promotion)
        .collect();
    assert_eq!(kinds.len(), 4);
    for kind in [
        PieceKind::Queen,
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Knight,
    ] {
        assert!(kinds.contains(&kind));
    }
}

#[test]
fn test_castling_addressed_by_king_destination() {
    // White ready to castle short.
    let mut game =
        Game::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").expect("valid position");
    let targets: Vec<String> = game
        .legal_moves_from(sq("e1"))
        .iter()
        .map(|m| m.to.to_string())
        .collect();
    assert!(targets.contains(&"g1".to_string()));
    assert!(targets.contains(&"c1".to_string()));

    let record = game.apply(MoveIntent::new(sq("e1"), sq("g1"))).unwrap();
    assert_eq!(record.san, "O-O");
    assert_eq!(game.piece_at(sq("g1")).map(|p| p.kind), Some(PieceKind::King));
    assert_eq!(game.piece_at(sq("f1")).map(|p| p.kind), Some(PieceKind::Rook));
}

#[test]
fn test_stalemate_and_insufficient_material() {
    // Queen and king smother the cornered black king without checking it.
    let game = Game::from_fen("k7/2Q5/1K6/8/8/8/8/8 b - - 0 1").expect("valid position");
    assert!(game.is_stalemate());
    assert!(game.is_draw());
    assert!(game.is_game_over());
    assert!(!game.is_checkmate());

    let game = Game::from_fen("k7/8/8/8/8/8/8/K7 w - - 0 1").expect("valid position");
    assert!(game.is_insufficient_material());
    assert!(game.is_draw());
}

#[test]
fn test_king_square_tracks_the_king() {
    let mut game = Game::new();
    assert_eq!(game.king_square(Side::White), Some(sq("e1")));
    assert_eq!(game.king_square(Side::Black), Some(sq("e8")));
    for mv in ["e2e4", "e7e5", "e1e2"] {
        game.apply(MoveIntent::from_uci(mv).unwrap()).unwrap();
    }
    assert_eq!(game.king_square(Side::White), Some(sq("e2")));
}

#[test]
fn test_reset_restores_start() {
    let mut game = Game::new();
    let start = game.fen();
    game.apply(MoveIntent::new(sq("e2"), sq("e4"))).unwrap();
    game.reset();
    assert_eq!(game.fen(), start);
    assert!(game.history().is_empty());
    assert_eq!(game.turn(), Side::White);
}

#[test]
fn test_from_fen_rejects_garbage() {
    assert!(Game::from_fen("not a fen").is_err());
    assert!(Game::from_fen("").is_err());
}
