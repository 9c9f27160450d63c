//! Perft (performance test) for move generation correctness.

use crate::board::Board;
use std::time::Instant;

struct TestPosition {
    name: &'static str,
    fen: &'static str,
    depths: &'static [(u32, u64)],
}

const TEST_POSITIONS: &[TestPosition] = &[
    TestPosition {
        name: "Initial Position",
        fen: "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        depths: &[(1, 20), (2, 400), (3, 8902), (4, 197_281)],
    },
    TestPosition {
        name: "Kiwipete",
        fen: "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        depths: &[(1, 48), (2, 2039), (3, 97_862)],
    },
    TestPosition {
        name: "Position 3",
        fen: "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        depths: &[(1, 14), (2, 191), (3, 2812), (4, 43_238)],
    },
    TestPosition {
        name: "Position 4",
        fen: "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
        depths: &[(1, 6), (2, 264), (3, 9467)],
    },
    TestPosition {
        name: "Position 5",
        fen: "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
        depths: &[(1, 44), (2, 1486), (3, 62_379)],
    },
    TestPosition {
        name: "Position 6",
        fen: "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10",
        depths: &[(1, 46), (2, 2079), (3, 89_890)],
    },
    TestPosition {
        name: "En Passant Capture",
        fen: "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3",
        depths: &[(1, 31), (2, 707), (3, 21_637)],
    },
    TestPosition {
        name: "Promotion",
        fen: "n1n5/PPPk4/8/8/8/8/4Kppp/5N1N b - - 0 1",
        depths: &[(1, 24), (2, 496), (3, 9483)],
    },
    TestPosition {
        name: "Castling",
        fen: "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1",
        depths: &[(1, 26), (2, 568), (3, 13_744)],
    },
];

#[test]
fn test_all_perft_positions() {
    for position in TEST_POSITIONS {
        let mut board = Board::from_fen(position.fen).unwrap();
        let fen_before = board.to_fen();

        for &(depth, expected) in position.depths {
            let start = Instant::now();
            let nodes = board.perft(depth);
            println!("  {} depth {}: {} nodes in {:?}", position.name, depth, nodes, start.elapsed());

            assert_eq!(
                nodes, expected,
                "Perft failed for position '{}' at depth {}",
                position.name, depth
            );
        }
        assert_eq!(board.to_fen(), fen_before, "perft left '{}' modified", position.name);
    }
}

#[test]
fn tactical_moves_are_the_captures_and_promotions() {
    for position in TEST_POSITIONS {
        let board = Board::from_fen(position.fen).unwrap();
        let all = board.generate_moves();
        let tactical = board.generate_tactical_moves();
        let expected: Vec<_> = all.iter().copied().filter(|mv| mv.is_tactical()).collect();
        assert_eq!(tactical.len(), expected.len(), "{}", position.name);
        for mv in &tactical {
            assert!(expected.contains(mv), "{}: unexpected {}", position.name, mv);
        }
    }
}

#[test]
fn checkmate_and_stalemate_have_no_moves() {
    let mate = Board::from_fen("7k/7Q/7K/8/8/8/8/8 b - - 0 1").unwrap();
    assert!(mate.is_checkmate());
    assert!(!mate.is_stalemate());

    let stalemate = Board::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
    assert!(stalemate.is_stalemate());
    assert!(stalemate.generate_moves().is_empty());
}
