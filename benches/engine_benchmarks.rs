//! Benchmarks for move generation, evaluation, search and the shared table.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use strix::board::{Evaluator, PsqtEvaluator};
use strix::tt::{Bound, TranspositionTable};
use strix::{Board, Engine, EngineConfig, SearchLimits};

const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
const MIDDLEGAME: &str = "r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4";

fn bench_perft(c: &mut Criterion) {
    let mut group = c.benchmark_group("perft");

    let mut board = Board::new();
    for depth in 1..=4 {
        group.bench_with_input(BenchmarkId::new("startpos", depth), &depth, |b, &depth| {
            b.iter(|| board.perft(black_box(depth)))
        });
    }

    let mut kiwipete = Board::from_fen(KIWIPETE).unwrap();
    for depth in 1..=3 {
        group.bench_with_input(BenchmarkId::new("kiwipete", depth), &depth, |b, &depth| {
            b.iter(|| kiwipete.perft(black_box(depth)))
        });
    }

    group.finish();
}

fn bench_movegen(c: &mut Criterion) {
    let mut group = c.benchmark_group("movegen");

    for (name, fen) in [("middlegame", MIDDLEGAME), ("kiwipete", KIWIPETE)] {
        let board = Board::from_fen(fen).unwrap();
        group.bench_function(BenchmarkId::new("all", name), |b| {
            b.iter(|| black_box(board.generate_moves()))
        });
        group.bench_function(BenchmarkId::new("tactical", name), |b| {
            b.iter(|| black_box(board.generate_tactical_moves()))
        });
    }

    group.finish();
}

fn bench_eval(c: &mut Criterion) {
    let mut group = c.benchmark_group("eval");

    let positions = [
        ("startpos", "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
        ("middlegame", MIDDLEGAME),
        ("endgame", "8/5k2/8/8/8/8/5K2/4R3 w - - 0 1"),
    ];
    for (name, fen) in positions {
        let board = Board::from_fen(fen).unwrap();
        group.bench_with_input(BenchmarkId::new("psqt", name), &board, |b, board| {
            b.iter(|| black_box(PsqtEvaluator.evaluate(board)))
        });
    }

    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    group.sample_size(10);

    for threads in [1, 4] {
        let config = EngineConfig::default().with_threads(threads).with_hash_mb(16);
        let engine = Engine::new(config).unwrap();
        for depth in [4, 6] {
            let id = BenchmarkId::new(format!("middlegame-{threads}t"), depth);
            group.bench_with_input(id, &depth, |b, &depth| {
                let board = Board::from_fen(MIDDLEGAME).unwrap();
                b.iter(|| {
                    engine.clear();
                    engine.search(&board, &SearchLimits::depth(depth)).unwrap()
                })
            });
        }
    }

    group.finish();
}

fn bench_tt(c: &mut Criterion) {
    let mut group = c.benchmark_group("tt");
    let tt = TranspositionTable::new(16).unwrap();

    group.bench_function("store", |b| {
        let mut key = 0x9E37_79B9_7F4A_7C15_u64;
        b.iter(|| {
            key = key.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
            tt.store(black_box(key), None, 42, 17, 8, Bound::Exact);
        })
    });

    group.bench_function("probe", |b| {
        let mut key = 0x9E37_79B9_7F4A_7C15_u64;
        b.iter(|| {
            key = key.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
            black_box(tt.probe(black_box(key)))
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_perft,
    bench_movegen,
    bench_eval,
    bench_search,
    bench_tt
);
criterion_main!(benches);
