//! Benchmarks for rules, tree and notation performance.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use chess_tree::board::{Color, Piece, Position, Square};
use chess_tree::game::{GameController, GameState};
use chess_tree::serialize::{deserialize_tree, serialize_tree};

const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

const RUY_LOPEZ: &str = "1. e4 e5 2. Nf3 Nc6 3. Bb5 a6 4. Ba4 Nf6 5. O-O Be7 6. Re1 b5 \
    7. Bb3 d6 8. c3 O-O 9. h3 Nb8 10. d4 Nbd7 11. c4 c6 12. cxb5 axb5 13. Nc3 Bb7 \
    14. Bg5 b4 15. Nb1 h6 16. Bh4 c5 17. dxe5 Nxe4 18. Bxe7 Qxe7 19. exd6 Qf6 20. Nbd2 Nxd6 *";

fn bench_perft(c: &mut Criterion) {
    let mut group = c.benchmark_group("perft");

    let start = Position::standard();
    for depth in 1..=3 {
        group.bench_with_input(BenchmarkId::new("startpos", depth), &depth, |b, &depth| {
            b.iter(|| start.perft(black_box(depth)))
        });
    }

    let kiwipete = Position::try_from_fen(KIWIPETE)
        .expect("valid FEN")
        .position;
    for depth in 1..=2 {
        group.bench_with_input(BenchmarkId::new("kiwipete", depth), &depth, |b, &depth| {
            b.iter(|| kiwipete.perft(black_box(depth)))
        });
    }

    group.finish();
}

fn bench_legal_moves(c: &mut Criterion) {
    let mut group = c.benchmark_group("legal_moves");

    let start = Position::standard();
    group.bench_function("startpos", |b| {
        b.iter(|| black_box(start.legal_moves(Color::White)))
    });

    let kiwipete = Position::try_from_fen(KIWIPETE)
        .expect("valid FEN")
        .position;
    group.bench_function("kiwipete", |b| {
        b.iter(|| black_box(kiwipete.legal_moves(Color::White)))
    });

    let state = GameState::new();
    group.bench_function("apply_move", |b| {
        b.iter(|| {
            black_box(
                state
                    .apply_move(Square(1, 4), Square(3, 4), Piece::Queen)
                    .expect("legal"),
            )
        })
    });

    group.finish();
}

fn bench_notation(c: &mut Criterion) {
    let mut group = c.benchmark_group("notation");

    group.bench_function("parse_ruy_lopez", |b| {
        b.iter(|| GameController::parse_notation_text(black_box(RUY_LOPEZ)).expect("parses"))
    });

    group.bench_function("import_ruy_lopez", |b| {
        b.iter(|| {
            let mut game = GameController::new();
            game.import_notation(black_box(RUY_LOPEZ)).expect("imports");
            game
        })
    });

    let mut game = GameController::new();
    game.import_notation(RUY_LOPEZ).expect("imports");
    group.bench_function("export_ruy_lopez", |b| {
        b.iter(|| black_box(game.export_notation()))
    });

    group.finish();
}

fn bench_serialize(c: &mut Criterion) {
    let mut game = GameController::new();
    game.import_notation(RUY_LOPEZ).expect("imports");
    let portable = serialize_tree(game.tree());
    let initial = GameState::new();

    c.bench_function("serialize_tree", |b| {
        b.iter(|| black_box(serialize_tree(game.tree())))
    });
    c.bench_function("deserialize_tree", |b| {
        b.iter(|| deserialize_tree(black_box(&portable), &initial).expect("valid tree"))
    });
}

criterion_group!(
    benches,
    bench_perft,
    bench_legal_moves,
    bench_notation,
    bench_serialize
);
criterion_main!(benches);
