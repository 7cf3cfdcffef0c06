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

use crate::prim::SpanningTree;
use std::time::Duration;
use waypoint_core::num::{constants::Zero, ops::saturating_arithmetic::SaturatingAddVal};
use waypoint_model::{matrix::CostMatrix, tour::Tour};
use waypoint_search::{
    num::SolverNumeric,
    result::{SolverResult, TerminationReason},
};

/// Statistics collected during one approximation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MstStatistics<T> {
    /// The total weight of the spanning tree. Doubling it bounds the tour
    /// cost on metric instances.
    pub tree_weight: T,
    /// Total time spent in the solver.
    pub time_total: Duration,
}

impl<T> std::fmt::Display for MstStatistics<T>
where
    T: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Waypoint-MST Solver Statistics:")?;
        writeln!(f, "  Tree weight:          {}", self.tree_weight)?;
        writeln!(f, "  Total time:           {:.2?}", self.time_total)?;
        Ok(())
    }
}

/// Result of the approximation solver after termination.
#[derive(Debug, Clone)]
pub struct MstOutcome<T> {
    result: SolverResult<T>,
    termination_reason: TerminationReason,
    statistics: MstStatistics<T>,
}

impl<T> MstOutcome<T> {
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
    pub fn statistics(&self) -> &MstStatistics<T> {
        &self.statistics
    }
}

/// The spanning-tree tour approximator.
///
/// Builds a minimum spanning tree with Prim's algorithm, walks it in
/// preorder, and closes the walk into a cycle. Skipping already-visited
/// cities in the doubled tree walk never lengthens the route on metric
/// instances, so the tour costs at most twice the optimum there. The tour
/// carries no optimality proof; the outcome is `Feasible` with the
/// `HeuristicCompleted` termination label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MstApproximator;

impl MstApproximator {
    /// Creates a new `MstApproximator`.
    #[inline]
    pub fn new() -> Self {
        Self
    }

    /// Derives an approximate tour for the given instance.
    pub fn approximate<T>(&self, matrix: &CostMatrix<T>) -> MstOutcome<T>
    where
        T: SolverNumeric,
    {
        let start_time = std::time::Instant::now();

        let tree = SpanningTree::build(matrix);
        let order = tree.preorder();

        // Consecutive edges of the preorder walk plus the closing edge.
        // The matrix was validated against accumulator overflow, so the
        // saturating sum is exact.
        let mut total = T::ZERO;
        for pair in order.windows(2) {
            total = total.saturating_add_val(matrix.cost(pair[0], pair[1]));
        }
        if order.len() > 1 {
            let last = order[order.len() - 1];
            total = total.saturating_add_val(matrix.cost(last, order[0]));
        }

        let statistics = MstStatistics {
            tree_weight: tree.total_weight(),
            time_total: start_time.elapsed(),
        };

        MstOutcome {
            result: SolverResult::Feasible(Tour::new(total, order)),
            termination_reason: TerminationReason::HeuristicCompleted,
            statistics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waypoint_model::index::CityIndex;

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
    fn test_classic_instance_stays_below_twice_optimum() {
        let matrix = classic_matrix();
        let outcome = MstApproximator::new().approximate(&matrix);

        let tour = match outcome.result() {
            SolverResult::Feasible(tour) => tour,
            other => panic!("expected a feasible tour, got {}", other),
        };

        // Preorder of the star-shaped tree: 0 -> 1 -> 2 -> 3 -> 0.
        assert_eq!(tour.cities(), &[ci(0), ci(1), ci(2), ci(3)]);
        assert_eq!(tour.total_cost(), 95);
        // The optimum is 80; twice that bounds the approximation.
        assert!(tour.total_cost() <= 160);
        assert_eq!(
            outcome.termination_reason(),
            &TerminationReason::HeuristicCompleted
        );
        assert_eq!(outcome.statistics().tree_weight, 45);
    }

    #[test]
    fn test_line_instance_is_solved_exactly() {
        // Cities on a line; the preorder chain happens to be the optimal
        // tour here.
        let matrix = CostMatrix::from_rows(vec![
            vec![0, 1, 2, 3],
            vec![1, 0, 1, 2],
            vec![2, 1, 0, 1],
            vec![3, 2, 1, 0],
        ])
        .unwrap();

        let outcome = MstApproximator::new().approximate(&matrix);
        let tour = outcome.result().tour().unwrap();
        assert_eq!(tour.total_cost(), 6);
    }

    #[test]
    fn test_square_instance_respects_the_metric_bound() {
        // Manhattan distances of the corners of a 2x2 square. The optimal
        // tour walks the perimeter at cost 8.
        let matrix = CostMatrix::from_rows(vec![
            vec![0, 2, 2, 4],
            vec![2, 0, 4, 2],
            vec![2, 4, 0, 2],
            vec![4, 2, 2, 0],
        ])
        .unwrap();

        let outcome = MstApproximator::new().approximate(&matrix);
        let tour = outcome.result().tour().unwrap();
        assert!(tour.total_cost() <= 16);
    }

    #[test]
    fn test_single_city_instance() {
        let matrix = CostMatrix::from_rows(vec![vec![0]]).unwrap();
        let outcome = MstApproximator::new().approximate(&matrix);

        let tour = outcome.result().tour().unwrap();
        assert_eq!(tour.total_cost(), 0);
        assert_eq!(tour.cities(), &[ci(0)]);
        assert_eq!(outcome.statistics().tree_weight, 0);
    }
}
