//! Criterion benchmarks measure time of the clearly separated pieces of code.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use chessrules::chess::board::Board;
use chessrules::chess::core::Color;
use chessrules::chess::game::{checkmate, legal_moves};
use chessrules::perft::perft;
use shakmaty::{CastlingMode, Chess, Position};

const POSITIONS: [&str; 8] = [
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
    "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
    "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
    "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10",
    "2r3r1/3p3k/1p3pp1/1B5P/5p2/2P1p1P1/PP4KP/3R4 w - - 0 34",
    "r3k2r/8/8/8/8/8/6N1/4K3 b kq - 0 1",
];

// Mated, nearly mated and quiet positions.
const MATES: [&str; 4] = [
    "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3",
    "8/8/8/8/8/8/7R/k6R b - - 0 1",
    "1r6/8/8/8/8/8/7R/k6R b - - 0 1",
    "r1bqkb1r/pppp1Qpp/2n2n2/4p3/2B1P3/8/PPPP1PPP/RNB1K1NR b KQkq - 0 4",
];

fn movegen_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("Move generation");
    let boards = POSITIONS
        .iter()
        .map(|fen| Board::from_fen(fen).unwrap())
        .collect::<Vec<_>>();
    group.bench_with_input(
        BenchmarkId::new("chessrules", format!("{} positions", boards.len())),
        &boards,
        |b, boards| {
            b.iter(|| {
                for board in boards {
                    criterion::black_box(legal_moves(board, board.side_to_move()));
                }
            });
        },
    );
    // Add a benchmark for shakmaty: this is a reasonable reference that has
    // stable performance and can be compared to. The mailbox board probes every
    // destination square, so it is not expected to come close.
    let shakmaty_positions = POSITIONS
        .iter()
        .map(|fen| {
            fen.parse::<shakmaty::fen::Fen>()
                .unwrap()
                .into_position(CastlingMode::Standard)
                .unwrap()
        })
        .collect::<Vec<Chess>>();
    group.bench_with_input(
        BenchmarkId::new(
            "reference implementation: shakmaty",
            format!("{} positions", shakmaty_positions.len()),
        ),
        &shakmaty_positions,
        |b, positions| {
            b.iter(|| {
                for position in positions {
                    criterion::black_box(position.legal_moves());
                }
            });
        },
    );
    group.finish();
}

fn checkmate_bench(c: &mut Criterion) {
    let boards = MATES
        .iter()
        .map(|fen| Board::from_fen(fen).unwrap())
        .collect::<Vec<_>>();
    c.bench_with_input(
        BenchmarkId::new("checkmate detection", format!("{} positions", boards.len())),
        &boards,
        |b, boards| {
            b.iter(|| {
                for board in boards {
                    for color in [Color::White, Color::Black] {
                        criterion::black_box(checkmate(board, color));
                    }
                }
            });
        },
    );
}

fn perft_bench(c: &mut Criterion) {
    let board = Board::starting();
    for depth in 1..=3 {
        c.bench_with_input(BenchmarkId::new("perft", depth), &depth, |b, &depth| {
            b.iter(|| perft(&board, depth));
        });
    }
}

criterion_group! {
    name = movegen;
    config = Criterion::default().sample_size(100);
    targets = movegen_bench, checkmate_bench
}

criterion_group! {
    name = node_counts;
    config = Criterion::default().sample_size(10);
    targets = perft_bench
}

criterion_main!(movegen, node_counts);
