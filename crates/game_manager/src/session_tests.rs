use super::*;

fn play_all(session: &mut Session, moves: &[&str]) {
    for mv in moves {
        session.apply(mv, None).unwrap();
    }
}

#[test]
fn test_new_session() {
    let session = Session::new(Side::Black, Strength::from_level(5));

    assert_eq!(session.fen(), chess_core::START_FEN);
    assert_eq!(session.human_side(), Side::Black);
    assert_eq!(session.engine_side(), Side::White);
    assert_eq!(session.engine_strength().rating(), 1740);
    assert_eq!(session.turn(), Side::White);
    assert_eq!(session.status(), GameStatus::Ongoing);
    assert!(session.history().is_empty());
    assert!(session.last_move().is_none());
    assert!(session.winner().is_none());
    assert_eq!(session.legal_moves().len(), 20);
    assert!(Uuid::parse_str(session.id()).is_ok());
}

#[test]
fn test_ids_are_unique() {
    let a = Session::new(Side::White, Strength::default());
    let b = Session::new(Side::White, Strength::default());
    assert_ne!(a.id(), b.id());
}

#[test]
fn test_apply_updates_everything() {
    let mut session = Session::new(Side::White, Strength::default());
    session.apply("e2e4", Some(Side::White)).unwrap();

    assert_eq!(session.history(), ["e2e4"]);
    assert_eq!(session.last_move(), Some("e2e4"));
    assert_eq!(session.turn(), Side::Black);
    assert!(
        session
            .fen()
            .starts_with("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq")
    );
}

#[test]
fn test_move_spelling_is_normalized() {
    let mut session = Session::new(Side::White, Strength::default());
    session.apply("E2E4", None).unwrap();
    assert_eq!(session.history(), ["e2e4"]);
}

#[test]
fn test_rejections_leave_session_untouched() {
    let mut session = Session::new(Side::White, Strength::default());
    let before = session.fen();

    assert!(matches!(
        session.apply("e2e5", None),
        Err(Rejection::Move(MoveError::Illegal { .. }))
    ));
    assert!(matches!(
        session.apply("zz99", None),
        Err(Rejection::Move(MoveError::Syntax(_)))
    ));
    assert_eq!(
        session.apply("e7e5", Some(Side::Black)),
        Err(Rejection::WrongTurn { turn: Side::White })
    );

    assert_eq!(session.fen(), before);
    assert!(session.history().is_empty());
    assert_eq!(session.turn(), Side::White);
}

#[test]
fn test_checkmate_ends_game() {
    let mut session = Session::new(Side::White, Strength::default());
    play_all(&mut session, &["f2f3", "e7e5", "g2g4", "d8h4"]);

    assert_eq!(session.status(), GameStatus::Checkmate);
    assert_eq!(session.winner(), Some(Side::Black));
    assert!(session.legal_moves().is_empty());
    assert_eq!(
        session.apply("a2a3", None),
        Err(Rejection::Finished(GameStatus::Checkmate))
    );
    assert_eq!(session.history().len(), 4);
}

#[test]
fn test_threefold_repetition_by_knight_shuffle() {
    let mut session = Session::new(Side::White, Strength::default());
    let shuffle = ["g1f3", "g8f6", "f3g1", "f6g8"];

    play_all(&mut session, &shuffle);
    assert!(session.is_ongoing());
    play_all(&mut session, &shuffle);

    assert_eq!(session.status(), GameStatus::Draw);
    assert_eq!(session.draw_reason(), Some(DrawReason::ThreefoldRepetition));
    assert_eq!(session.winner(), None);
    // Moves exist but the game is over
    assert!(!session.legal_moves().is_empty());
    assert!(matches!(
        session.apply("e2e4", None),
        Err(Rejection::Finished(GameStatus::Draw))
    ));
}

#[test]
fn test_history_replays_to_position() {
    let mut session = Session::new(Side::White, Strength::default());
    play_all(&mut session, &["e2e4", "c7c5", "g1f3", "d7d6", "f1b5", "c8d7"]);

    let replayed = Position::replay(session.history().iter().map(String::as_str)).unwrap();
    assert_eq!(&replayed, session.position());
}
