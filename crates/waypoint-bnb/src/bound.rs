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

//! Lower-bound estimation for branch‑and‑bound.
//!
//! A `BoundEstimator` prices the cheapest possible completion of a partial
//! tour. The estimate must be admissible: it may never exceed the cost of
//! the best completion, otherwise the engine would prune optimal subtrees.

use crate::state::SearchState;
use num_traits::{PrimInt, Signed};
use waypoint_core::num::{constants::Zero, ops::saturating_arithmetic::SaturatingAddVal};
use waypoint_model::matrix::CostMatrix;
use waypoint_search::num::SolverNumeric;

/// A strategy for computing an admissible lower bound on the remaining tour
/// cost from a partial path.
///
/// The engine calls `estimate_remaining_cost` once per expanded node and
/// prunes the subtree when `lower_bound >= incumbent`.
pub trait BoundEstimator<T>
where
    T: PrimInt + Signed,
{
    /// Returns the name of the estimator.
    fn name(&self) -> &str;

    /// Estimates the cheapest possible cost of the edges still missing from
    /// the tour: the continuation from the last visited city through every
    /// unvisited city and back to the start.
    ///
    /// The estimate must never exceed the true cost of the best completion.
    fn estimate_remaining_cost(&mut self, matrix: &CostMatrix<T>, state: &SearchState<T>) -> T
    where
        T: SolverNumeric;

    /// Computes the total lower bound for the current branch: the cost
    /// already paid plus the estimated remaining cost.
    fn lower_bound(&mut self, matrix: &CostMatrix<T>, state: &SearchState<T>) -> T
    where
        T: SolverNumeric,
    {
        let remaining = self.estimate_remaining_cost(matrix, state);
        state.current_cost().saturating_add_val(remaining)
    }
}

impl<T> std::fmt::Debug for dyn BoundEstimator<T>
where
    T: PrimInt + Signed,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BoundEstimator({})", self.name())
    }
}

impl<T> std::fmt::Display for dyn BoundEstimator<T>
where
    T: PrimInt + Signed,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BoundEstimator({})", self.name())
    }
}

/// The minimum-outgoing-edge estimator.
///
/// Any completion of the partial path `p0 .. pk` with unvisited set `U`
/// must contain one edge from `pk` into `U` and, for every `u` in `U`, one
/// edge from `u` to another unvisited city or back to `p0`. These edge
/// slots are disjoint, so summing the cheapest admissible choice for each
/// slot never overestimates:
///
/// - `U` empty: the bound is the closing edge `cost(pk, p0)`.
/// - Empty path (no start chosen yet): the bound is the sum of each city's
///   cheapest outgoing edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MinEdgeBound;

impl MinEdgeBound {
    /// Creates a new `MinEdgeBound`.
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl<T> BoundEstimator<T> for MinEdgeBound
where
    T: PrimInt + Signed,
{
    #[inline]
    fn name(&self) -> &str {
        "MinEdgeBound"
    }

    fn estimate_remaining_cost(&mut self, matrix: &CostMatrix<T>, state: &SearchState<T>) -> T
    where
        T: SolverNumeric,
    {
        let (start, last) = match (state.start_city(), state.last_city()) {
            (Some(start), Some(last)) => (start, last),
            _ => {
                // No start chosen yet: each city must be left through some
                // outgoing edge, so the cheapest one per city is admissible.
                let mut total = T::ZERO;
                for c in 0..matrix.num_cities() {
                    if let Some(min) = matrix.min_outgoing_cost(c.into(), |_| true) {
                        total = total.saturating_add_val(min);
                    }
                }
                return total;
            }
        };

        if state.is_complete() {
            return matrix.cost(last, start);
        }

        // One edge leads from the last visited city into the unvisited set.
        let mut total = match matrix.min_outgoing_cost(last, |t| !state.is_visited(t)) {
            Some(min) => min,
            None => T::ZERO,
        };

        // Each unvisited city is left towards another unvisited city or
        // back to the start.
        for c in 0..matrix.num_cities() {
            let from = c.into();
            if state.is_visited(from) {
                continue;
            }
            let min = matrix.min_outgoing_cost(from, |t| !state.is_visited(t) || t == start);
            if let Some(min) = min {
                total = total.saturating_add_val(min);
            }
        }

        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};
    use waypoint_model::{index::CityIndex, matrix::CostMatrixBuilder};

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
    fn test_estimate_at_root_with_origin_fixed() {
        let matrix = classic_matrix();
        let mut state = SearchState::<i64>::new(4);
        state.visit(ci(0));

        let mut bound = MinEdgeBound::new();
        // Edge out of 0 into {1,2,3}: 10. Slots for 1, 2, 3: 10, 15, 20.
        assert_eq!(bound.estimate_remaining_cost(&matrix, &state), 55);
        assert_eq!(bound.lower_bound(&matrix, &state), 55);
    }

    #[test]
    fn test_estimate_on_empty_path() {
        let matrix = classic_matrix();
        let state = SearchState::<i64>::new(4);

        let mut bound = MinEdgeBound::new();
        // Cheapest outgoing edge per city: 10 + 10 + 15 + 20.
        assert_eq!(bound.estimate_remaining_cost(&matrix, &state), 55);
    }

    #[test]
    fn test_estimate_on_complete_path_is_closing_edge() {
        let matrix = classic_matrix();
        let mut state = SearchState::<i64>::new(4);
        for c in [0, 1, 3, 2] {
            state.visit(ci(c));
        }
        state.set_current_cost(10 + 25 + 30);

        let mut bound = MinEdgeBound::new();
        assert_eq!(bound.estimate_remaining_cost(&matrix, &state), 15);
        // The optimal tour of this instance costs exactly 80.
        assert_eq!(bound.lower_bound(&matrix, &state), 80);
    }

    #[test]
    fn test_lower_bound_never_exceeds_optimum() {
        let matrix = classic_matrix();
        let mut state = SearchState::<i64>::new(4);
        state.visit(ci(0));

        let mut bound = MinEdgeBound::new();
        let optimum = matrix
            .cycle_cost(&[ci(0), ci(1), ci(3), ci(2)])
            .unwrap();
        assert_eq!(optimum, 80);
        assert!(bound.lower_bound(&matrix, &state) <= optimum);
    }

    #[test]
    fn test_bound_is_admissible_at_every_prefix() {
        let matrix = classic_matrix();
        let order = [ci(0), ci(1), ci(3), ci(2)];
        let optimum = matrix.cycle_cost(&order).unwrap();

        let mut state = SearchState::<i64>::new(4);
        let mut bound = MinEdgeBound::new();
        let mut cost = 0i64;

        for (i, &city) in order.iter().enumerate() {
            if i > 0 {
                cost += matrix.cost(order[i - 1], city);
            }
            state.visit(city);
            state.set_current_cost(cost);
            assert!(
                bound.lower_bound(&matrix, &state) <= optimum,
                "bound overestimates at prefix length {}",
                i + 1
            );
        }
    }

    /// Cheapest way to finish the tour from the current partial path.
    fn best_completion(matrix: &CostMatrix<i64>, state: &mut SearchState<i64>) -> i64 {
        let last = state.last_city().unwrap();
        if state.is_complete() {
            return matrix.cost(last, state.start_city().unwrap());
        }

        let mut best = i64::MAX;
        for c in 0..matrix.num_cities() {
            let next = ci(c);
            if state.is_visited(next) {
                continue;
            }
            let cost = state.current_cost();
            state.visit(next);
            state.set_current_cost(cost + matrix.cost(last, next));
            let total = matrix.cost(last, next) + best_completion(matrix, state);
            state.unvisit(next);
            state.set_current_cost(cost);
            best = best.min(total);
        }
        best
    }

    /// Walks every partial path of the instance and checks the bound
    /// against the true cheapest completion.
    fn check_all_prefixes(
        matrix: &CostMatrix<i64>,
        state: &mut SearchState<i64>,
        bound: &mut MinEdgeBound,
    ) {
        let truth = best_completion(matrix, state);
        let estimate = bound.estimate_remaining_cost(matrix, state);
        assert!(
            estimate <= truth,
            "estimate {} exceeds cheapest completion {} after {} visits",
            estimate,
            truth,
            state.num_visited()
        );

        if state.is_complete() {
            return;
        }
        let last = state.last_city().unwrap();
        for c in 0..matrix.num_cities() {
            let next = ci(c);
            if state.is_visited(next) {
                continue;
            }
            let cost = state.current_cost();
            state.visit(next);
            state.set_current_cost(cost + matrix.cost(last, next));
            check_all_prefixes(matrix, state, bound);
            state.unvisit(next);
            state.set_current_cost(cost);
        }
    }

    #[test]
    fn test_bound_is_admissible_on_random_instances() {
        let mut rng = StdRng::seed_from_u64(97);

        for _ in 0..5 {
            let num_cities = 6;
            let mut builder = CostMatrixBuilder::new(num_cities);
            for from in 0..num_cities {
                for to in 0..num_cities {
                    if from != to {
                        builder.set_cost(ci(from), ci(to), rng.gen_range(1..100));
                    }
                }
            }
            let matrix = builder.build().unwrap();

            let mut state = SearchState::<i64>::new(num_cities);
            state.visit(ci(0));
            let mut bound = MinEdgeBound::new();
            check_all_prefixes(&matrix, &mut state, &mut bound);
        }
    }
}
