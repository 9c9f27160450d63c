use serde::Deserialize;

use strix::{Board, Engine, EngineConfig, SearchLimits};

#[derive(Deserialize)]
struct ProblemSet {
    problems: Vec<Problem>,
}

#[derive(Deserialize)]
struct Problem {
    name: String,
    fen: String,
    /// Expected move when the mate is unique.
    best: Option<String>,
}

#[test]
fn mate_in_one_suite() {
    let data = include_str!("data/mates.json");
    let set: ProblemSet = serde_json::from_str(data).expect("invalid mates.json");
    let engine = Engine::new(EngineConfig::default().with_hash_mb(4)).unwrap();

    for problem in &set.problems {
        engine.clear();
        let board = Board::from_fen(&problem.fen).unwrap();
        let outcome = engine.search(&board, &SearchLimits::depth(4)).unwrap();

        let best = outcome
            .best_move
            .unwrap_or_else(|| panic!("{}: no move returned", problem.name));
        if let Some(expected) = &problem.best {
            assert_eq!(&best.to_string(), expected, "{}", problem.name);
        }

        let mut after = board.clone();
        after.make_move(best);
        assert!(after.is_checkmate(), "{}: {} does not mate", problem.name, best);
        assert_eq!(outcome.mate_in(), Some(1), "{}: score {}", problem.name, outcome.score);
    }
}

#[test]
fn mated_side_reports_negative_mate_distance() {
    // Kg8 is forced and Ra8 mates.
    let board = Board::from_fen("7k/8/6K1/8/8/8/8/R7 b - - 0 1").unwrap();
    let engine = Engine::new(EngineConfig::default().with_hash_mb(4)).unwrap();
    let outcome = engine.search(&board, &SearchLimits::depth(4)).unwrap();
    assert_eq!(outcome.best_move.map(|mv| mv.to_string()).as_deref(), Some("h8g8"));
    assert_eq!(outcome.mate_in(), Some(-1));
}
