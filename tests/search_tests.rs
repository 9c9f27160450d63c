//! Search behaviour through the public engine API.

use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use strix::board::search::{DRAW, MATE};
use strix::{Board, Clock, Engine, EngineConfig, SearchIterationInfo, SearchLimits};

fn engine() -> Engine {
    Engine::new(EngineConfig::default().with_hash_mb(8)).unwrap()
}

#[test]
fn depth_one_from_startpos_is_legal_and_balanced() {
    let board = Board::new();
    let outcome = engine().search(&board, &SearchLimits::depth(1)).unwrap();
    let best = outcome.best_move.expect("a move");
    assert!(board.generate_moves().contains(best));
    assert!(outcome.score.abs() < 100, "score {}", outcome.score);
    assert_eq!(outcome.depth, 1);
    assert!(!outcome.stopped);
}

#[test]
fn single_thread_search_is_deterministic() {
    let board =
        Board::from_fen("r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4").unwrap();
    let first = engine().search(&board, &SearchLimits::depth(6)).unwrap();
    let second = engine().search(&board, &SearchLimits::depth(6)).unwrap();
    assert_eq!(first.best_move, second.best_move);
    assert_eq!(first.score, second.score);
    assert_eq!(first.nodes, second.nodes);
    assert_eq!(first.pv, second.pv);
}

#[test]
fn principal_variation_is_playable() {
    let board =
        Board::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1").unwrap();
    let outcome = engine().search(&board, &SearchLimits::depth(5)).unwrap();
    assert_eq!(outcome.pv.first().copied(), outcome.best_move);
    assert_eq!(outcome.pv.get(1).copied(), outcome.ponder_move);

    let mut replay = board.clone();
    for &mv in &outcome.pv {
        assert!(replay.generate_moves().contains(mv), "{mv} illegal in pv");
        replay.make_move(mv);
    }
}

#[test]
fn captures_free_piece() {
    // The black queen on d4 is unprotected.
    let board = Board::from_fen("4k3/8/8/8/3q4/8/3R4/4K3 w - - 0 1").unwrap();
    let outcome = engine().search(&board, &SearchLimits::depth(4)).unwrap();
    assert_eq!(outcome.best_move.map(|mv| mv.to_string()).as_deref(), Some("d2d4"));
    assert!(outcome.score > 300);
}

#[test]
fn search_moves_restrict_the_root() {
    let board = Board::new();
    let restricted = vec![board.parse_move("a2a3").unwrap(), board.parse_move("h2h3").unwrap()];
    let limits = SearchLimits::depth(4).with_search_moves(restricted.clone());
    let outcome = engine().search(&board, &limits).unwrap();
    assert!(restricted.contains(&outcome.best_move.unwrap()));
}

#[test]
fn illegal_search_move_is_rejected() {
    let board = Board::new();
    let bogus = Board::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1")
        .unwrap()
        .parse_move("a1a8")
        .unwrap();
    let limits = SearchLimits::depth(2).with_search_moves(vec![bogus]);
    assert!(engine().search(&board, &limits).is_err());
}

#[test]
fn node_limit_is_respected() {
    let outcome = engine().search(&Board::new(), &SearchLimits::nodes(20_000)).unwrap();
    assert!(outcome.best_move.is_some());
    assert!(outcome.nodes < 20_000 + 2048, "searched {} nodes", outcome.nodes);
}

#[test]
fn movetime_returns_promptly() {
    let start = Instant::now();
    let outcome = engine()
        .search(&Board::new(), &SearchLimits::movetime(Duration::from_millis(100)))
        .unwrap();
    assert!(outcome.best_move.is_some());
    assert!(start.elapsed() < Duration::from_secs(1), "took {:?}", start.elapsed());
}

#[test]
fn clock_search_stays_within_remaining_time() {
    let clock = Clock {
        remaining: Duration::from_millis(500),
        increment: Duration::ZERO,
        moves_to_go: None,
    };
    let start = Instant::now();
    let outcome = engine()
        .search(&Board::new(), &SearchLimits::default().with_clock(clock))
        .unwrap();
    assert!(outcome.best_move.is_some());
    assert!(start.elapsed() < Duration::from_millis(500));
}

#[test]
fn infinite_search_runs_until_stopped() {
    let engine = engine();
    let pool = engine.start_search(&Board::new(), &SearchLimits::infinite()).unwrap();
    thread::sleep(Duration::from_millis(50));
    assert!(!pool.is_finished());

    let stopped_at = Instant::now();
    engine.stop();
    let outcome = pool.wait_all();
    assert!(stopped_at.elapsed() < Duration::from_millis(500));
    assert!(outcome.best_move.is_some());
    assert!(outcome.stopped);
}

#[test]
fn stop_before_first_iteration_still_returns_a_legal_move() {
    let board = Board::new();
    let engine = engine();
    let pool = engine.start_search(&board, &SearchLimits::infinite()).unwrap();
    pool.stop();
    let outcome = pool.wait_all();
    let best = outcome.best_move.expect("fallback move");
    assert!(board.generate_moves().contains(best));
}

#[test]
fn checkmated_root_has_no_move() {
    let board = Board::from_fen("7k/7Q/7K/8/8/8/8/8 b - - 0 1").unwrap();
    let outcome = engine().search(&board, &SearchLimits::depth(3)).unwrap();
    assert_eq!(outcome.best_move, None);
    assert_eq!(outcome.score, -MATE);
    assert!(outcome.pv.is_empty());
}

#[test]
fn stalemated_root_is_a_draw() {
    let board = Board::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
    let outcome = engine().search(&board, &SearchLimits::depth(3)).unwrap();
    assert_eq!(outcome.best_move, None);
    assert_eq!(outcome.score, DRAW);
}

#[test]
fn callback_reports_every_completed_iteration() {
    let seen: Arc<Mutex<Vec<SearchIterationInfo>>> = Arc::default();
    let sink = Arc::clone(&seen);
    let mut engine = engine();
    engine.set_info_callback(Some(Arc::new(move |info: &SearchIterationInfo| {
        sink.lock().unwrap().push(info.clone());
    })));

    let outcome = engine.search(&Board::new(), &SearchLimits::depth(5)).unwrap();
    let seen = seen.lock().unwrap();
    let depths: Vec<u32> = seen.iter().map(|info| info.depth).collect();
    assert_eq!(depths, vec![1, 2, 3, 4, 5]);

    let last = seen.last().unwrap();
    assert_eq!(last.score, outcome.score);
    assert_eq!(last.pv, outcome.pv);
    assert!(last.nodes > 0);
    assert!(seen.windows(2).all(|w| w[0].nodes <= w[1].nodes));
}

#[test]
fn repeated_search_reuses_the_table() {
    let engine = engine();
    let board = Board::from_fen("r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4").unwrap();
    let cold = engine.search(&board, &SearchLimits::depth(6)).unwrap();
    let warm = engine.search(&board, &SearchLimits::depth(6)).unwrap();
    assert!(warm.nodes <= cold.nodes, "warm {} cold {}", warm.nodes, cold.nodes);
}
