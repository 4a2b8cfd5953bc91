//! Drives `UciEngine` against a scripted shell engine.
//!
//! The script logs every line it receives, so the tests can check the exact
//! command sequence the adapter sends.

#![cfg(unix)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chess_core::{Position, UciMove};
use tempfile::TempDir;
use uci_engine::{Engine, EngineCommand, EngineError, Strength, UciEngine};

const STARTUP: Duration = Duration::from_secs(5);

/// `$1` log file, `$2` bestmove reply (`silent` for none), `$3` score.
const SCRIPT: &str = r#"
LOG="$1"
BEST="$2"
SCORE="$3"
while IFS= read -r line; do
  echo "$line" >> "$LOG"
  case "$line" in
    uci)
      echo "id name FakeFish 1.0"
      echo "option name Skill Level type spin default 20 min 0 max 20"
      echo "uciok"
      ;;
    isready) echo "readyok" ;;
    go*)
      if [ "$BEST" != "silent" ]; then
        echo "info depth 1 score $SCORE pv $BEST"
        echo "bestmove $BEST"
      fi
      ;;
    quit) exit 0 ;;
  esac
done
"#;

struct Fixture {
    _dir: TempDir,
    script: PathBuf,
    log: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("fake_engine.sh");
        fs::write(&script, SCRIPT).unwrap();
        let log = dir.path().join("received.log");
        Self {
            _dir: dir,
            script,
            log,
        }
    }

    fn command(&self, best: &str, score: &str) -> EngineCommand {
        EngineCommand::new("/bin/sh").with_args([
            path_str(&self.script),
            path_str(&self.log),
            best.to_string(),
            score.to_string(),
        ])
    }

    async fn engine(&self, best: &str, score: &str) -> UciEngine {
        UciEngine::initialize(self.command(best, score), STARTUP)
            .await
            .unwrap()
    }

    fn received(&self) -> Vec<String> {
        fs::read_to_string(&self.log)
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }
}

fn path_str(path: &Path) -> String {
    path.to_str().unwrap().to_string()
}

fn after_e4() -> Position {
    Position::startpos()
        .play(&"e2e4".parse().unwrap())
        .unwrap()
}

#[tokio::test]
async fn test_handshake_reports_engine_name() {
    let fixture = Fixture::new();
    let engine = fixture.engine("e7e5", "cp 0").await;

    assert_eq!(engine.name(), "FakeFish 1.0");
    assert_eq!(fixture.received(), vec!["uci", "isready"]);
    engine.shutdown().await;
}

#[tokio::test]
async fn test_move_and_white_relative_evaluation() {
    let fixture = Fixture::new();
    let engine = fixture.engine("e7e5", "cp -42").await;

    let reply = engine
        .request_move(&after_e4(), Strength::from_level(5), Duration::from_millis(200))
        .await
        .unwrap();

    assert_eq!(reply.mv, "e7e5".parse::<UciMove>().unwrap());
    // Black to move and down 42 from its own view: white is up 42
    assert_eq!(reply.evaluation, Some(42));
    engine.shutdown().await;
}

#[tokio::test]
async fn test_limited_strength_commands() {
    let fixture = Fixture::new();
    let engine = fixture.engine("e7e5", "cp 10").await;
    let position = after_e4();

    engine
        .request_move(&position, Strength::from_level(5), Duration::from_millis(200))
        .await
        .unwrap();

    let received = fixture.received();
    assert_eq!(
        received[2..].to_vec(),
        vec![
            "setoption name Skill Level value 5".to_string(),
            "setoption name UCI_LimitStrength value true".to_string(),
            "setoption name UCI_Elo value 1740".to_string(),
            "isready".to_string(),
            format!("position fen {}", position.fen()),
            "go movetime 225".to_string(),
        ]
    );
    engine.shutdown().await;
}

#[tokio::test]
async fn test_full_strength_disables_limiting() {
    let fixture = Fixture::new();
    let engine = fixture.engine("e7e5", "cp 10").await;

    engine
        .request_move(&after_e4(), Strength::FULL, Duration::from_millis(200))
        .await
        .unwrap();

    let received = fixture.received();
    assert!(received.contains(&"setoption name Skill Level value 20".to_string()));
    assert!(received.contains(&"setoption name UCI_LimitStrength value false".to_string()));
    assert!(!received.iter().any(|l| l.contains("UCI_Elo")));
    assert!(received.contains(&"go movetime 300".to_string()));
    engine.shutdown().await;
}

#[tokio::test]
async fn test_mate_score_has_no_evaluation() {
    let fixture = Fixture::new();
    let engine = fixture.engine("e7e5", "mate 3").await;

    let reply = engine
        .request_move(&after_e4(), Strength::default(), Duration::from_millis(50))
        .await
        .unwrap();
    assert_eq!(reply.evaluation, None);
    engine.shutdown().await;
}

#[tokio::test]
async fn test_evaluate_runs_depth_search_at_full_strength() {
    let fixture = Fixture::new();
    let engine = fixture.engine("e7e5", "cp 35").await;

    let eval = engine.evaluate(&after_e4(), 12).await.unwrap();
    assert_eq!(eval, Some(-35));

    let received = fixture.received();
    assert!(received.contains(&"go depth 12".to_string()));
    assert!(received.contains(&"setoption name UCI_LimitStrength value false".to_string()));
    engine.shutdown().await;
}

#[tokio::test]
async fn test_no_move_reply() {
    let fixture = Fixture::new();
    let engine = fixture.engine("(none)", "mate 0").await;

    let err = engine
        .request_move(&after_e4(), Strength::default(), Duration::from_millis(50))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NoMove), "{err}");
    engine.shutdown().await;
}

#[tokio::test]
async fn test_illegal_move_reply() {
    let fixture = Fixture::new();
    let engine = fixture.engine("e2e5", "cp 0").await;

    let err = engine
        .request_move(&Position::startpos(), Strength::default(), Duration::from_millis(50))
        .await
        .unwrap_err();
    match err {
        EngineError::IllegalMove { mv, fen } => {
            assert_eq!(mv, "e2e5");
            assert_eq!(fen, Position::startpos().fen());
        }
        other => panic!("expected IllegalMove, got {other}"),
    }
    engine.shutdown().await;
}

#[tokio::test]
async fn test_silent_engine_times_out_and_is_restarted() {
    let fixture = Fixture::new();
    let engine = fixture
        .engine("silent", "cp 0")
        .await
        .with_analysis_timeout(Duration::from_millis(300));

    let err = engine.evaluate(&after_e4(), 5).await.unwrap_err();
    assert!(matches!(err, EngineError::Timeout(_)), "{err}");

    // The hung process was discarded; the next request starts a new one
    let err = engine.evaluate(&after_e4(), 5).await.unwrap_err();
    assert!(matches!(err, EngineError::Timeout(_)), "{err}");
    let handshakes = fixture.received().iter().filter(|l| *l == "uci").count();
    assert_eq!(handshakes, 2);
    engine.shutdown().await;
}

#[tokio::test]
async fn test_engine_that_never_handshakes() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("mute.sh");
    fs::write(&script, "while read -r line; do :; done\n").unwrap();

    let command = EngineCommand::new("/bin/sh").with_args([path_str(&script)]);
    let err = UciEngine::initialize(command, Duration::from_millis(300))
        .await
        .err()
        .unwrap();
    assert!(matches!(err, EngineError::Timeout(_)), "{err}");
}

#[tokio::test]
async fn test_missing_binary_fails_to_spawn() {
    let command = EngineCommand::new("/nonexistent/stockfish");
    let err = UciEngine::initialize(command, STARTUP).await.err().unwrap();
    assert!(matches!(err, EngineError::Spawn { .. }), "{err}");
}

#[tokio::test]
async fn test_shutdown_is_idempotent() {
    let fixture = Fixture::new();
    let engine = fixture.engine("e7e5", "cp 0").await;

    assert!(engine.is_ready());
    engine.shutdown().await;
    engine.shutdown().await;
    assert!(!engine.is_ready());
    assert_eq!(fixture.received().last().map(String::as_str), Some("quit"));

    let err = engine
        .request_move(&after_e4(), Strength::default(), Duration::from_millis(50))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Unavailable), "{err}");
}

#[tokio::test]
async fn test_request_queued_behind_shutdown_does_not_restart() {
    let fixture = Fixture::new();
    let engine = Arc::new(
        fixture
            .engine("silent", "cp 0")
            .await
            .with_analysis_timeout(Duration::from_millis(500)),
    );

    // Holds the process lock until it times out
    let busy = tokio::spawn({
        let engine = Arc::clone(&engine);
        async move { engine.evaluate(&after_e4(), 5).await }
    });
    tokio::time::sleep(Duration::from_millis(100)).await;
    let queued = tokio::spawn({
        let engine = Arc::clone(&engine);
        async move { engine.evaluate(&after_e4(), 5).await }
    });
    tokio::time::sleep(Duration::from_millis(100)).await;

    engine.shutdown().await;

    let busy = busy.await.unwrap().unwrap_err();
    assert!(matches!(busy, EngineError::Timeout(_)), "{busy}");
    let queued = queued.await.unwrap().unwrap_err();
    assert!(matches!(queued, EngineError::Unavailable), "{queued}");
    let handshakes = fixture.received().iter().filter(|l| *l == "uci").count();
    assert_eq!(handshakes, 1);
}
