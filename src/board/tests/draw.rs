//! Draw detection tests.

use crate::board::Board;

fn play(board: &mut Board, moves: &[&str]) {
    for uci in moves {
        let mv = board.parse_move(uci).unwrap();
        board.make_move(mv);
    }
}

#[test]
fn test_fifty_move_rule() {
    let board = Board::from_fen("4k3/8/8/8/8/8/R7/4K3 w - - 100 80").unwrap();
    assert!(board.is_draw());
    let board = Board::from_fen("4k3/8/8/8/8/8/R7/4K3 w - - 99 80").unwrap();
    assert!(!board.is_draw());
}

#[test]
fn test_fifty_move_clock_resets_on_pawn_move() {
    let mut board = Board::from_fen("4k3/8/8/8/8/8/4P3/4K3 w - - 99 80").unwrap();
    play(&mut board, &["e2e3"]);
    assert_eq!(board.halfmove_clock(), 0);
    assert!(!board.is_draw());
}

#[test]
fn test_repetition_detection() {
    let mut board = Board::new();
    assert!(!board.is_repetition());
    play(&mut board, &["g1f3", "g8f6", "f3g1"]);
    assert!(!board.is_repetition());
    play(&mut board, &["f6g8"]);
    assert!(board.is_repetition());
    assert!(board.is_draw());
}

#[test]
fn test_repetition_window_stops_at_irreversible_move() {
    let mut board = Board::new();
    play(&mut board, &["g1f3", "g8f6", "f3g1", "f6g8", "e2e4"]);
    assert!(!board.is_repetition());
    play(&mut board, &["g8f6", "g1f3", "f6g8", "f3g1"]);
    assert!(board.is_repetition());
}

#[test]
fn test_null_move_breaks_repetition_window() {
    let mut board = Board::new();
    play(&mut board, &["g1f3", "g8f6"]);
    let null = board.make_null_move();
    board.unmake_null_move(null);
    play(&mut board, &["f3g1", "f6g8"]);
    assert!(board.is_repetition());
}

#[test]
fn test_insufficient_material() {
    let cases = [
        ("4k3/8/8/8/8/8/8/4K3 w - - 0 1", true),
        ("4k3/8/8/8/8/8/8/4KN2 w - - 0 1", true),
        ("4k3/8/8/8/8/8/8/4KB2 w - - 0 1", true),
        ("4kb2/8/8/8/8/8/8/2B1K3 w - - 0 1", true),
        ("4k3/8/8/8/8/8/8/2B1KB2 w - - 0 1", false),
        ("4k3/8/8/8/8/8/8/3NKN2 w - - 0 1", false),
        ("4k3/8/8/8/8/8/8/4KR2 w - - 0 1", false),
        ("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1", false),
    ];
    for (fen, expected) in cases {
        let board = Board::from_fen(fen).unwrap();
        assert_eq!(board.is_insufficient_material(), expected, "{fen}");
        assert_eq!(board.is_draw(), expected, "{fen}");
    }
}
