use super::*;

#[test]
fn test_startpos_roundtrips_fen() {
    let pos = Position::startpos();
    assert_eq!(pos.fen(), START_FEN);
    assert_eq!(Position::from_fen(START_FEN).unwrap(), pos);
    assert_eq!(pos.side_to_move(), Side::White);
}

#[test]
fn test_invalid_fen_is_an_error() {
    assert!(Position::from_fen("not a fen").is_err());
    assert!(Position::from_fen("8/8/8/8/8/8/8/8 w - - 0 1").is_err());
}

#[test]
fn test_startpos_has_twenty_moves() {
    let moves = Position::startpos().legal_moves();
    assert_eq!(moves.len(), 20);
    assert!(moves.contains(&"e2e4".parse().unwrap()));
    assert!(moves.contains(&"g1f3".parse().unwrap()));
}

#[test]
fn test_legal_move_order_is_deterministic() {
    let pos = Position::startpos();
    assert_eq!(pos.legal_moves(), pos.legal_moves());
}

#[test]
fn test_play_returns_new_position() {
    let pos = Position::startpos();
    let next = pos.play(&"e2e4".parse().unwrap()).unwrap();

    assert_eq!(pos, Position::startpos(), "original must not change");
    assert_eq!(next.side_to_move(), Side::Black);
    assert!(next.fen().starts_with("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b"));
}

#[test]
fn test_illegal_move_rejected() {
    let pos = Position::startpos();
    let err = pos.play(&"e2e5".parse().unwrap()).unwrap_err();
    assert!(matches!(err, MoveError::Illegal { .. }));

    // Black piece while white is to move
    assert!(pos.play(&"e7e5".parse().unwrap()).is_err());
}

#[test]
fn test_castling_uses_king_step_notation() {
    let pos = Position::from_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1").unwrap();
    let moves: Vec<String> = pos.legal_moves().iter().map(|m| m.to_string()).collect();
    assert!(moves.contains(&"e1g1".to_string()));
    assert!(moves.contains(&"e1c1".to_string()));
    assert!(!moves.contains(&"e1h1".to_string()));

    let castled = pos.play(&"e1g1".parse().unwrap()).unwrap();
    assert_eq!(castled.board().piece_on(Square::G1), Some(Piece::King));
    assert_eq!(castled.board().piece_on(Square::F1), Some(Piece::Rook));
}

#[test]
fn test_promotion_requires_piece() {
    let pos = Position::from_fen("8/4P3/8/8/8/8/k7/4K3 w - - 0 1").unwrap();
    assert!(pos.is_legal(&"e7e8q".parse().unwrap()));
    assert!(pos.is_legal(&"e7e8n".parse().unwrap()));
    assert!(!pos.is_legal(&"e7e8".parse().unwrap()));
}

#[test]
fn test_replay_matches_incremental_play() {
    let moves = ["e2e4", "e7e5", "g1f3", "b8c6"];
    let replayed = Position::replay(moves).unwrap();

    let mut pos = Position::startpos();
    for mv in moves {
        pos = pos.play(&mv.parse().unwrap()).unwrap();
    }
    assert_eq!(replayed, pos);
    assert_eq!(replayed.fullmove_number(), 3);
}

#[test]
fn test_replay_stops_on_bad_move() {
    assert!(Position::replay(["e2e4", "e2e4"]).is_err());
    assert!(Position::replay(["xx"]).is_err());
}

#[test]
fn test_check_detection() {
    let pos =
        Position::from_fen("rnbqkbnr/ppppp1pp/8/5p1Q/4P3/8/PPPP1PPP/RNB1KBNR b KQkq - 1 2").unwrap();
    assert!(pos.in_check());
    assert!(!pos.is_checkmate());
    assert!(!pos.is_stalemate());
}
