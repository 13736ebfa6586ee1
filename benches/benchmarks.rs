use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mini_chess::board::Board;
use mini_chess::perft::{run_perft_parallel, run_perft_test};
use mini_chess::types::Position;

const OPEN_LAYOUT: &str = "
r......r
.p..p..p
..p..p..
pP....Pp
........
.P.PP...
P.P..P.P
R......R
";

pub fn bench_legal_moves_from_start(c: &mut Criterion) {
    let bo = Board::new();
    c.bench_function("get legal moves from start", |b| {
        b.iter(|| black_box(&bo).all_legal_moves())
    });
}

pub fn bench_legal_moves_open(c: &mut Criterion) {
    let bo = Board::from_layout(OPEN_LAYOUT).unwrap();
    c.bench_function("get legal moves open position", |b| {
        b.iter(|| black_box(&bo).all_legal_moves())
    });
}

pub fn bench_occupant_scan(c: &mut Criterion) {
    let bo = Board::new();
    c.bench_function("occupant of every square", |b| {
        b.iter(|| {
            Position::all()
                .filter(|pos| black_box(&bo).occupant_at(*pos).is_some())
                .count()
        })
    });
}

pub fn bench_perft_3(c: &mut Criterion) {
    let mut group = c.benchmark_group("flat-sampling");
    group.sample_size(10);

    let bo = Board::new();
    group.bench_function("perft from start 3 ply", |b| {
        b.iter(|| run_perft_test(black_box(&bo), black_box(3)))
    });
    group.bench_function("perft from start 3 ply parallel", |b| {
        b.iter(|| run_perft_parallel(black_box(&bo), black_box(3)))
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_legal_moves_from_start,
    bench_legal_moves_open,
    bench_occupant_scan,
    bench_perft_3,
);
criterion_main!(benches);
