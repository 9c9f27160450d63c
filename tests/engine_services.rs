//! Pluggable evaluation and tablebase services, and per-search table clearing.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use strix::board::search::{TB_WIN, TB_WIN_BOUND};
use strix::board::Evaluator;
use strix::tablebase::{TablebaseProbe, TbResult, Wdl};
use strix::{Board, Engine, EngineConfig, SearchIterationInfo, SearchLimits};

/// Declares every position with at most three pieces lost for the side to move.
struct LossAtThreePieces;

impl TablebaseProbe for LossAtThreePieces {
    fn max_pieces(&self) -> u32 {
        3
    }

    fn probe(&self, board: &Board) -> Option<TbResult> {
        (board.piece_count() <= 3).then_some(TbResult {
            wdl: Wdl::Loss,
            distance: 10,
        })
    }
}

/// Always scores zero and counts how often it was asked.
#[derive(Default)]
struct CountingEvaluator {
    calls: AtomicU64,
}

impl Evaluator for CountingEvaluator {
    fn evaluate(&self, _board: &Board) -> i32 {
        self.calls.fetch_add(1, Ordering::Relaxed);
        0
    }
}

#[test]
fn tablebase_result_short_circuits_the_search() {
    let hits = Arc::new(AtomicU64::new(0));
    let sink = Arc::clone(&hits);
    let mut engine = Engine::new(EngineConfig::default().with_hash_mb(4))
        .unwrap()
        .with_tablebase(Arc::new(LossAtThreePieces));
    engine.set_info_callback(Some(Arc::new(move |info: &SearchIterationInfo| {
        sink.fetch_max(info.tb_hits, Ordering::Relaxed);
    })));

    // Rxa2 leaves three pieces with Black to move.
    let board = Board::from_fen("4k3/8/8/8/8/8/n7/R3K3 w - - 0 1").unwrap();
    let outcome = engine.search(&board, &SearchLimits::depth(3)).unwrap();

    assert_eq!(outcome.best_move.map(|mv| mv.to_string()).as_deref(), Some("a1a2"));
    assert!(
        outcome.score > TB_WIN_BOUND && outcome.score <= TB_WIN,
        "score {} outside the tablebase band",
        outcome.score
    );
    assert_eq!(outcome.mate_in(), None);
    assert!(hits.load(Ordering::Relaxed) > 0);
}

#[test]
fn injected_evaluator_drives_the_search() {
    let evaluator = Arc::new(CountingEvaluator::default());
    let engine = Engine::new(EngineConfig::default().with_hash_mb(4))
        .unwrap()
        .with_evaluator(Arc::clone(&evaluator) as Arc<dyn Evaluator>);

    let outcome = engine.search(&Board::new(), &SearchLimits::depth(3)).unwrap();
    assert_eq!(outcome.score, 0);
    assert!(evaluator.calls.load(Ordering::Relaxed) > 0);
}

#[test]
fn clean_search_starts_every_search_from_an_empty_table() {
    let board =
        Board::from_fen("r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4").unwrap();

    let mut config = EngineConfig::default().with_hash_mb(4);
    config.clean_search = true;
    let clean = Engine::new(config).unwrap();
    let first = clean.search(&board, &SearchLimits::depth(5)).unwrap();
    let second = clean.search(&board, &SearchLimits::depth(5)).unwrap();
    assert_eq!(first.nodes, second.nodes);
    assert_eq!(first.pv, second.pv);

    let reusing = Engine::new(EngineConfig::default().with_hash_mb(4)).unwrap();
    let cold = reusing.search(&board, &SearchLimits::depth(5)).unwrap();
    let warm = reusing.search(&board, &SearchLimits::depth(5)).unwrap();
    assert_eq!(cold.nodes, first.nodes);
    assert_ne!(warm.nodes, cold.nodes);
}
