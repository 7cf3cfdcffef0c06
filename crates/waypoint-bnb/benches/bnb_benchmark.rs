// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};
use waypoint_bnb::{
    bnb::{BnbConfig, BnbSolver},
    bound::MinEdgeBound,
    monitor::no_op::NoOperationMonitor,
};
use waypoint_model::{index::CityIndex, matrix::CostMatrixBuilder};

/// Builds a random symmetric instance with costs in `1..100`.
fn random_matrix(num_cities: usize, seed: u64) -> waypoint_model::matrix::CostMatrix<i64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut builder = CostMatrixBuilder::<i64>::new(num_cities);

    for from in 0..num_cities {
        for to in (from + 1)..num_cities {
            let cost = rng.gen_range(1..100);
            builder
                .set_cost(CityIndex::new(from), CityIndex::new(to), cost)
                .set_cost(CityIndex::new(to), CityIndex::new(from), cost);
        }
    }

    builder.build().expect("random instance must be valid")
}

fn bench_bnb_solve(c: &mut Criterion) {
    let mut group = c.benchmark_group("bnb_solve");

    for &num_cities in &[8usize, 10, 12] {
        let matrix = random_matrix(num_cities, 42);
        group.bench_with_input(
            BenchmarkId::from_parameter(num_cities),
            &matrix,
            |b, matrix| {
                let mut solver =
                    BnbSolver::preallocated(BnbConfig::default(), matrix.num_cities());
                let mut bound = MinEdgeBound::new();
                b.iter(|| solver.solve(matrix, &mut bound, NoOperationMonitor::new()));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_bnb_solve);
criterion_main!(benches);
