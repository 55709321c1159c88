//! Benchmarks for the constraint-propagation solver.
//!
//! Measures `solve` on two fixed clue strings: one that falls to propagation
//! alone and one that requires backtracking search.
//!
//! # Running
//!
//! ```sh
//! cargo bench --bench solver
//! ```

use std::hint;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use quintoku_solver::solve;

const PUZZLES: [(&str, &str); 2] = [
    (
        "propagation",
        "003020600900305001001806400008102900700000008006708200002609500800203009005010300",
    ),
    (
        "search",
        "4.....8.5.3..........7......2.....6.....8.4......1.......6.3.7.5..2.....1.4......",
    ),
];

fn bench_solve(c: &mut Criterion) {
    for (name, clues) in PUZZLES {
        c.bench_with_input(BenchmarkId::new("solve", name), &clues, |b, &clues| {
            b.iter(|| solve(hint::black_box(clues)));
        });
    }
}

criterion_group!(benches, bench_solve);
criterion_main!(benches);
