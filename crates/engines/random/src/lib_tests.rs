use super::*;

const BUDGET: Duration = Duration::from_millis(10);

#[tokio::test]
async fn random_engine_returns_legal_move() {
    let engine = RandomEngine::new();
    let pos = Position::startpos();

    let reply = engine
        .request_move(&pos, Strength::default(), BUDGET)
        .await
        .unwrap();

    assert!(pos.legal_moves().contains(&reply.mv));
    assert_eq!(reply.evaluation, None);
}

#[tokio::test]
async fn random_engine_is_reproducible_with_seed() {
    let pos = Position::startpos();
    let a = RandomEngine::with_seed(7);
    let b = RandomEngine::with_seed(7);

    for _ in 0..5 {
        let ma = a.request_move(&pos, Strength::FULL, BUDGET).await.unwrap();
        let mb = b.request_move(&pos, Strength::FULL, BUDGET).await.unwrap();
        assert_eq!(ma.mv, mb.mv);
    }
}

#[tokio::test]
async fn random_engine_handles_checkmate() {
    let engine = RandomEngine::new();
    let pos =
        Position::from_fen("r1bqkbnr/pppp1Qpp/2n5/4p3/2B1P3/8/PPPP1PPP/RNB1K1NR b KQkq - 0 1")
            .unwrap();

    let err = engine
        .request_move(&pos, Strength::default(), BUDGET)
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::NoMove));
}

#[tokio::test]
async fn random_engine_handles_stalemate() {
    let engine = RandomEngine::new();
    let pos = Position::from_fen("k7/8/1Q6/8/8/8/8/1K6 b - - 0 1").unwrap();

    let err = engine
        .request_move(&pos, Strength::default(), BUDGET)
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::NoMove));
}

#[tokio::test]
async fn random_engine_has_no_evaluation() {
    let engine = RandomEngine::new();
    assert_eq!(engine.evaluate(&Position::startpos(), 10).await.unwrap(), None);
}
