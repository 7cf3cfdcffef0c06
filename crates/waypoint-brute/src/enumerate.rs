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

use crate::permutation::for_each_permutation_from;
use std::time::Duration;
use waypoint_core::num::ops::saturating_arithmetic::SaturatingAddVal;
use waypoint_model::{index::CityIndex, matrix::CostMatrix, tour::Tour};
use waypoint_search::{
    num::SolverNumeric,
    result::{SolverResult, TerminationReason},
};

/// Statistics collected during one exhaustive enumeration run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BruteStatistics {
    /// Total complete tours priced.
    pub tours_evaluated: u64,
    /// Total time spent in the solver.
    pub time_total: Duration,
}

impl std::fmt::Display for BruteStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Waypoint-Brute Solver Statistics:")?;
        writeln!(f, "  Tours evaluated:      {}", self.tours_evaluated)?;
        writeln!(f, "  Total time:           {:.2?}", self.time_total)?;
        Ok(())
    }
}

/// Result of the brute-force solver after termination.
#[derive(Debug, Clone)]
pub struct BruteOutcome<T> {
    result: SolverResult<T>,
    termination_reason: TerminationReason,
    statistics: BruteStatistics,
}

impl<T> BruteOutcome<T> {
    /// Returns the solver result.
    #[inline]
    pub fn result(&self) -> &SolverResult<T> {
        &self.result
    }

    /// Returns the termination reason.
    #[inline]
    pub fn termination_reason(&self) -> &TerminationReason {
        &self.termination_reason
    }

    /// Returns the solver statistics.
    #[inline]
    pub fn statistics(&self) -> &BruteStatistics {
        &self.statistics
    }
}

/// The exhaustive enumeration solver.
///
/// Every ordering of the cities is priced as a cyclic tour and the cheapest
/// one wins; nothing is pruned, so completion proves optimality. With the
/// origin fixed the solver walks `(n-1)!` orderings; in free-origin mode it
/// walks all `n!`, revisiting each cyclic tour once per rotation. Both
/// modes find the same optimal cost, which makes the pair a useful
/// cross-check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BruteForceSolver {
    fix_origin: bool,
}

impl Default for BruteForceSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl BruteForceSolver {
    /// Creates a solver that anchors every tour at city 0.
    #[inline]
    pub fn new() -> Self {
        Self { fix_origin: true }
    }

    /// Creates a solver that also permutes the starting city.
    #[inline]
    pub fn with_free_origin() -> Self {
        Self { fix_origin: false }
    }

    /// Returns whether the tour is anchored at city 0.
    #[inline]
    pub fn fix_origin(&self) -> bool {
        self.fix_origin
    }

    /// Walks every tour of the instance and returns the cheapest one.
    pub fn solve<T>(&self, matrix: &CostMatrix<T>) -> BruteOutcome<T>
    where
        T: SolverNumeric,
    {
        let start_time = std::time::Instant::now();
        let num_cities = matrix.num_cities();

        let mut order: Vec<CityIndex> = (0..num_cities).map(CityIndex::new).collect();
        let permute_from = if self.fix_origin { 1 } else { 0 };

        let mut tours_evaluated = 0u64;
        let mut best: Option<(T, Vec<CityIndex>)> = None;

        for_each_permutation_from(&mut order, permute_from, &mut |perm| {
            tours_evaluated = tours_evaluated.saturating_add_val(1);

            // The matrix was validated against accumulator overflow, so a
            // cycle cost is always available.
            let cost = match matrix.cycle_cost(perm) {
                Some(cost) => cost,
                None => return,
            };

            let improved = match &best {
                Some((best_cost, _)) => cost < *best_cost,
                None => true,
            };
            if improved {
                best = Some((cost, perm.to_vec()));
            }
        });

        let statistics = BruteStatistics {
            tours_evaluated,
            time_total: start_time.elapsed(),
        };

        // Enumeration visits at least one ordering for any validated
        // instance.
        let (cost, path) = best.expect("expected at least one tour from enumeration");
        BruteOutcome {
            result: SolverResult::Optimal(Tour::new(cost, path)),
            termination_reason: TerminationReason::OptimalityProven,
            statistics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ci(i: usize) -> CityIndex {
        CityIndex::new(i)
    }

    fn classic_matrix() -> CostMatrix<i64> {
        CostMatrix::from_rows(vec![
            vec![0, 10, 15, 20],
            vec![10, 0, 35, 25],
            vec![15, 35, 0, 30],
            vec![20, 25, 30, 0],
        ])
        .unwrap()
    }

    #[test]
    fn test_classic_instance_optimum() {
        let matrix = classic_matrix();
        let outcome = BruteForceSolver::new().solve(&matrix);

        let tour = match outcome.result() {
            SolverResult::Optimal(tour) => tour,
            other => panic!("expected an optimal tour, got {}", other),
        };

        assert_eq!(tour.total_cost(), 80);
        assert_eq!(tour.cities(), &[ci(0), ci(1), ci(3), ci(2)]);
        assert_eq!(outcome.statistics().tours_evaluated, 6);
        assert_eq!(
            outcome.termination_reason(),
            &TerminationReason::OptimalityProven
        );
    }

    #[test]
    fn test_free_origin_walks_the_full_factorial() {
        let matrix = classic_matrix();
        let outcome = BruteForceSolver::with_free_origin().solve(&matrix);

        assert_eq!(outcome.statistics().tours_evaluated, 24);
        assert_eq!(outcome.result().tour().unwrap().total_cost(), 80);
    }

    #[test]
    fn test_single_city_instance() {
        let matrix = CostMatrix::from_rows(vec![vec![0]]).unwrap();
        let outcome = BruteForceSolver::new().solve(&matrix);

        let tour = outcome.result().tour().unwrap();
        assert_eq!(tour.total_cost(), 0);
        assert_eq!(tour.cities(), &[ci(0)]);
        assert_eq!(outcome.statistics().tours_evaluated, 1);
    }

    #[test]
    fn test_two_city_instance() {
        let matrix = CostMatrix::from_rows(vec![vec![0, 7], vec![7, 0]]).unwrap();
        let outcome = BruteForceSolver::new().solve(&matrix);
        assert_eq!(outcome.result().tour().unwrap().total_cost(), 14);
    }

    #[test]
    fn test_rotation_and_reversal_preserve_cycle_cost() {
        let matrix = classic_matrix();
        let base = [ci(0), ci(1), ci(3), ci(2)];
        let rotated = [ci(1), ci(3), ci(2), ci(0)];

        assert_eq!(matrix.cycle_cost(&base), matrix.cycle_cost(&rotated));

        // The matrix is symmetric, so the reversed direction costs the
        // same as well.
        let reversed = [ci(0), ci(2), ci(3), ci(1)];
        assert_eq!(matrix.cycle_cost(&base), matrix.cycle_cost(&reversed));
    }

    #[test]
    fn test_asymmetric_instance() {
        // Directed costs: the cheap cycle runs 0 -> 1 -> 2 -> 0.
        let matrix = CostMatrix::from_rows(vec![
            vec![0, 1, 90],
            vec![90, 0, 1],
            vec![1, 90, 0],
        ])
        .unwrap();

        let outcome = BruteForceSolver::new().solve(&matrix);
        let tour = outcome.result().tour().unwrap();
        assert_eq!(tour.total_cost(), 3);
        assert_eq!(tour.cities(), &[ci(0), ci(1), ci(2)]);
    }
}
