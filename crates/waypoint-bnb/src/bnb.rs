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

//! Branch-and-bound solver for the traveling salesman problem.
//!
//! This module implements a stateful depth-first search engine over a cost
//! matrix. The partial tour is extended city by city; a subtree is cut when
//! the accumulated cost or the admissible lower bound reaches the incumbent.
//! The `BnbSolver` owns reusable internal structures so repeated solves do
//! not reallocate, and a fast `reset` keeps capacities while clearing
//! per-run state.
//!
//! A search session object encapsulates per-run state, statistics, and
//! timing. Candidate cities are expanded in ascending index order, which
//! makes runs reproducible node for node.

use crate::{
    bound::BoundEstimator,
    monitor::tree_search_monitor::{PruneReason, TreeSearchMonitor},
    result::BnbOutcome,
    stack::CandidateStack,
    state::SearchState,
    stats::BnbStatistics,
    trail::SearchTrail,
};
use num_traits::{PrimInt, Signed};
use waypoint_core::num::ops::saturating_arithmetic::SaturatingAddVal;
use waypoint_model::{
    index::{CityIndex, ORIGIN},
    matrix::CostMatrix,
    tour::Tour,
};
use waypoint_search::{monitor::search_monitor::SearchCommand, num::SolverNumeric};

/// Configuration for one branch-and-bound run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BnbConfig {
    /// Whether the tour is anchored at city 0. Anchoring removes the
    /// rotational symmetry of the cycle and shrinks the tree by a factor of
    /// the instance size without losing any tour cost.
    pub fix_origin: bool,
}

impl Default for BnbConfig {
    fn default() -> Self {
        Self { fix_origin: true }
    }
}

impl BnbConfig {
    /// Creates the default configuration with the origin fixed.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration that also branches on the starting city.
    /// Every tour cost reachable this way is also reachable with the origin
    /// fixed; the mode exists for validation.
    #[inline]
    pub fn with_free_origin() -> Self {
        Self { fix_origin: false }
    }
}

/// A depth-first branch-and-bound solver over a cost matrix.
///
/// This is just the execution engine; lower bounds come from a
/// `BoundEstimator` and run control from a `TreeSearchMonitor`.
#[derive(Debug, Clone)]
pub struct BnbSolver<T> {
    config: BnbConfig,
    trail: SearchTrail<T>,
    stack: CandidateStack,
}

impl<T> Default for BnbSolver<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> BnbSolver<T> {
    /// Creates a new solver with the default configuration.
    #[inline]
    pub fn new() -> Self {
        Self::with_config(BnbConfig::default())
    }

    /// Creates a new solver with the given configuration.
    #[inline]
    pub fn with_config(config: BnbConfig) -> Self {
        Self {
            config,
            trail: SearchTrail::new(),
            stack: CandidateStack::new(),
        }
    }

    /// Creates a new solver with preallocated storage for the given number
    /// of cities.
    ///
    /// # Note
    ///
    /// When invoked, the solver will internally ensure that the trail and
    /// stack have sufficient capacity for the given instance. Constructing
    /// the solver with preallocated storage only moves the cost of the
    /// memory allocations to construction time.
    #[inline]
    pub fn preallocated(config: BnbConfig, num_cities: usize) -> Self {
        Self {
            config,
            trail: SearchTrail::preallocated(num_cities),
            stack: CandidateStack::preallocated(num_cities),
        }
    }

    /// Returns the configuration of this solver.
    #[inline]
    pub fn config(&self) -> BnbConfig {
        self.config
    }

    /// Solves the given instance using the provided `BoundEstimator` and
    /// `TreeSearchMonitor`.
    #[inline]
    pub fn solve<B, S>(
        &mut self,
        matrix: &CostMatrix<T>,
        bound: &mut B,
        mut monitor: S,
    ) -> BnbOutcome<T>
    where
        B: BoundEstimator<T>,
        S: TreeSearchMonitor<T>,
        T: SolverNumeric,
    {
        let session = BnbSearchSession::new(self, matrix, bound, &mut monitor);
        let res = session.run();
        self.reset();
        res
    }

    /// Resets the internal state of the solver, clearing any stored trail
    /// and stack information.
    ///
    /// # Note
    ///
    /// This does not deallocate any memory used by the trail or stack, but
    /// only resets their logical state.
    #[inline]
    fn reset(&mut self) {
        self.trail.reset();
        self.stack.reset();
    }
}

/// A search session for the branch-and-bound solver. This struct
/// encapsulates the state and logic of a single search run.
struct BnbSearchSession<'a, T, B, S>
where
    T: SolverNumeric,
{
    solver: &'a mut BnbSolver<T>,
    matrix: &'a CostMatrix<T>,
    bound: &'a mut B,
    monitor: &'a mut S,
    state: SearchState<T>,
    best_cost: T,
    best_tour: Option<Tour<T>>,
    stats: BnbStatistics<T>,
    start_time: std::time::Instant,
}

impl<'a, T, B, S> std::fmt::Display for BnbSearchSession<'a, T, B, S>
where
    T: SolverNumeric,
    B: BoundEstimator<T>,
    S: TreeSearchMonitor<T>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tour_str = match &self.best_tour {
            Some(tour) => format!("Tour(cost: {})", tour.total_cost()),
            None => "No tour found".to_string(),
        };
        write!(
            f,
            "SearchSession(best_cost: {}, best_tour: {}, stats: {})",
            self.best_cost, tour_str, self.stats
        )
    }
}

impl<'a, T, B, S> BnbSearchSession<'a, T, B, S>
where
    T: SolverNumeric,
    B: BoundEstimator<T>,
    S: TreeSearchMonitor<T>,
{
    /// Creates a new search session.
    #[inline]
    fn new(
        solver: &'a mut BnbSolver<T>,
        matrix: &'a CostMatrix<T>,
        bound: &'a mut B,
        monitor: &'a mut S,
    ) -> Self {
        let state = SearchState::new(matrix.num_cities());

        Self {
            solver,
            matrix,
            bound,
            monitor,
            state,
            best_cost: T::max_value(),
            best_tour: None,
            stats: BnbStatistics::default(),
            start_time: std::time::Instant::now(),
        }
    }

    /// Runs the search session to completion.
    #[inline]
    fn run(mut self) -> BnbOutcome<T> {
        self.monitor.on_enter_search(self.matrix, &self.stats);
        self.initialize();

        // `None` means the tree was exhausted and the incumbent is optimal.
        let abort_reason: Option<String> = loop {
            self.monitor.on_step(&self.state, &self.stats);

            if let SearchCommand::Terminate(msg) =
                self.monitor.search_command(&self.state, &self.stats)
            {
                break Some(msg);
            }

            if self.solver.stack.is_current_level_empty() {
                if self.solver.stack.depth() <= 1 {
                    break None;
                }
                self.backtrack_step();
            } else {
                unsafe {
                    self.process_next_decision();
                }
            }
        };

        self.stats.set_total_time(self.start_time.elapsed());
        self.monitor.on_exit_search(&self.stats);
        self.finalize_result(abort_reason)
    }

    /// Finalizes the solver result based on the best tour found and the
    /// abort reason, if any.
    ///
    /// # Note
    ///
    /// This consumes self.
    #[inline]
    fn finalize_result(self, abort_reason: Option<String>) -> BnbOutcome<T> {
        match abort_reason {
            None => {
                // A validated matrix always admits a tour, so an exhausted
                // tree must carry an incumbent.
                let tour = self
                    .best_tour
                    .expect("expected an incumbent tour when the search tree is exhausted");
                BnbOutcome::optimal(tour, self.stats)
            }
            Some(msg) => BnbOutcome::aborted(self.best_tour, msg, self.stats),
        }
    }

    /// Initializes the search session.
    ///
    /// This anchors the tour at the origin if configured, records the root
    /// lower bound, makes sure enough memory is allocated to *not* resize
    /// during the search, and pushes the first candidates onto the stack.
    #[inline]
    fn initialize(&mut self) {
        self.solver.trail.ensure_capacity(self.matrix.num_cities());
        self.solver.stack.ensure_capacity(self.matrix.num_cities());

        if self.solver.config.fix_origin {
            self.state.visit(ORIGIN);
        }

        let root_bound = self.bound.lower_bound(self.matrix, &self.state);
        self.stats.set_root_lower_bound(root_bound);

        // A single-city instance is already complete at the root.
        if self.state.is_complete() {
            if let Some(start) = self.state.start_city() {
                let closing = self.matrix.cost(start, start);
                let total = self.state.current_cost().saturating_add_val(closing);
                self.handle_complete_solution(total);
            }
        }

        // Root frame. Crucial to have this before pushing candidates!
        self.solver.trail.push_frame();
        self.solver.stack.push_frame();
        self.stats.on_node_explored();

        let count = self.push_candidates();
        self.monitor
            .on_decisions_enqueued(&self.state, count, &self.stats);
    }

    /// Pushes all unvisited cities as candidates onto the current frame,
    /// in decreasing index order so that pops ascend. Returns the number of
    /// candidates pushed.
    #[inline(always)]
    fn push_candidates(&mut self) -> usize {
        let count_before = self.solver.stack.num_entries();
        for c in (0..self.matrix.num_cities()).rev() {
            let city = CityIndex::new(c);
            if !self.state.is_visited(city) {
                self.solver.stack.push(city);
            }
        }
        self.solver.stack.num_entries() - count_before
    }

    #[inline]
    fn backtrack_step(&mut self) {
        self.stats.on_backtrack();
        self.monitor.on_backtrack(&self.state, &self.stats);

        self.solver.trail.backtrack(&mut self.state);
        self.solver.stack.pop_frame();
    }

    /// Processes the next candidate from the stack.
    ///
    /// # Panics
    ///
    /// In debug builds, this function will panic if called when the current
    /// stack level is empty.
    ///
    /// # Safety
    ///
    /// The caller must ensure that the current stack level is not empty.
    #[inline(always)]
    unsafe fn process_next_decision(&mut self) {
        debug_assert!(
            !self.solver.stack.is_current_level_empty(),
            "called `BnbSearchSession::process_next_decision` with empty candidate stack"
        );

        let city = unsafe { self.solver.stack.pop().unwrap_unchecked() };
        self.stats.on_decision_generated();

        // The cost of the edge into the candidate. The first city of a
        // free-origin tour pays nothing yet.
        let new_cost = match self.state.last_city() {
            Some(last) => {
                let edge = unsafe { self.matrix.cost_unchecked(last, city) };
                self.state.current_cost().saturating_add_val(edge)
            }
            None => self.state.current_cost(),
        };

        if new_cost >= self.best_cost {
            self.stats.on_pruning_edge();
            self.monitor
                .on_prune(&self.state, PruneReason::EdgeDominated, &self.stats);
            return;
        }

        self.descend(city, new_cost);
    }

    /// Descends into the given child, applying its visit to the current
    /// state.
    #[inline(always)]
    fn descend(&mut self, city: CityIndex, new_cost: T) {
        self.solver.trail.push_frame();
        self.solver.trail.apply_visit(&mut self.state, city, new_cost);
        self.solver.stack.push_frame();

        self.stats.on_node_explored();
        self.stats.on_depth_update(self.solver.stack.depth() as u64);
        self.monitor.on_descend(&self.state, city, &self.stats);

        if self.state.is_complete() {
            if let Some(start) = self.state.start_city() {
                let closing = unsafe { self.matrix.cost_unchecked(city, start) };
                let total = new_cost.saturating_add_val(closing);
                self.handle_complete_solution(total);
            }
            return;
        }

        // Node-level bound check
        if self.should_backtrack_after_expand() {
            self.stats.on_pruning_bound();
            self.backtrack_step();
        }
    }

    /// Handles a complete tour found at the current state.
    #[inline(always)]
    fn handle_complete_solution(&mut self, total: T) {
        if total < self.best_cost {
            let tour = Tour::new(total, self.state.path().to_vec());
            self.best_cost = total;
            self.stats.on_solution_found();
            self.monitor.on_solution_found(&tour, &self.stats);
            self.best_tour = Some(tour);
        } else {
            self.stats.on_pruning_bound();
            self.monitor
                .on_prune(&self.state, PruneReason::BoundDominated, &self.stats);
        }
    }

    /// Determines whether to backtrack after expanding the current node.
    #[inline(always)]
    fn should_backtrack_after_expand(&mut self) -> bool {
        let remaining = self.bound.estimate_remaining_cost(self.matrix, &self.state);
        let node_lower_bound = self.state.current_cost().saturating_add_val(remaining);

        self.monitor
            .on_lower_bound_computed(&self.state, node_lower_bound, remaining, &self.stats);

        if node_lower_bound >= self.best_cost {
            self.monitor
                .on_prune(&self.state, PruneReason::BoundDominated, &self.stats);
            return true;
        }

        let count = self.push_candidates();
        self.monitor
            .on_decisions_enqueued(&self.state, count, &self.stats);

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bound::MinEdgeBound;
    use crate::monitor::no_op::NoOperationMonitor;
    use crate::monitor::time_limit::TimeLimitMonitor;
    use std::time::Duration;
    use waypoint_search::result::{SolverResult, TerminationReason};

    type IntegerType = i64;

    fn ci(i: usize) -> CityIndex {
        CityIndex::new(i)
    }

    fn classic_matrix() -> CostMatrix<IntegerType> {
        CostMatrix::from_rows(vec![
            vec![0, 10, 15, 20],
            vec![10, 0, 35, 25],
            vec![15, 35, 0, 30],
            vec![20, 25, 30, 0],
        ])
        .unwrap()
    }

    fn solve_fixed(matrix: &CostMatrix<IntegerType>) -> BnbOutcome<IntegerType> {
        let mut solver = BnbSolver::new();
        let mut bound = MinEdgeBound::new();
        solver.solve(matrix, &mut bound, NoOperationMonitor::new())
    }

    #[test]
    fn test_classic_instance_optimum() {
        let matrix = classic_matrix();
        let outcome = solve_fixed(&matrix);

        let tour = match outcome.result() {
            SolverResult::Optimal(tour) => tour,
            other => panic!("expected an optimal tour, got {}", other),
        };

        assert_eq!(tour.total_cost(), 80);
        // Ascending expansion finds 0 -> 1 -> 3 -> 2 first among the two
        // optimal orientations; the later mirror tour does not strictly
        // improve and is discarded.
        assert_eq!(tour.cities(), &[ci(0), ci(1), ci(3), ci(2)]);
        assert_eq!(
            outcome.termination_reason(),
            &TerminationReason::OptimalityProven
        );
    }

    #[test]
    fn test_single_city_instance() {
        let matrix = CostMatrix::from_rows(vec![vec![0]]).unwrap();
        let outcome = solve_fixed(&matrix);

        let tour = outcome.result().tour().expect("expected a tour");
        assert_eq!(tour.total_cost(), 0);
        assert_eq!(tour.cities(), &[ci(0)]);
    }

    #[test]
    fn test_two_city_instance() {
        let matrix = CostMatrix::from_rows(vec![vec![0, 7], vec![7, 0]]).unwrap();
        let outcome = solve_fixed(&matrix);

        let tour = outcome.result().tour().expect("expected a tour");
        assert_eq!(tour.total_cost(), 14);
    }

    #[test]
    fn test_free_origin_matches_fixed_origin() {
        let matrix = classic_matrix();
        let fixed = solve_fixed(&matrix);

        let mut solver = BnbSolver::with_config(BnbConfig::with_free_origin());
        let mut bound = MinEdgeBound::new();
        let free = solver.solve(&matrix, &mut bound, NoOperationMonitor::new());

        assert_eq!(
            fixed.result().tour().unwrap().total_cost(),
            free.result().tour().unwrap().total_cost()
        );
    }

    #[test]
    fn test_statistics_are_plausible() {
        let matrix = classic_matrix();
        let outcome = solve_fixed(&matrix);
        let stats = outcome.statistics();

        assert!(stats.nodes_explored >= 1);
        // Root + three descents for a four-city anchored tour.
        assert_eq!(stats.max_depth, 4);
        // The tree of the anchored four-city instance has 16 nodes.
        assert!(stats.nodes_explored <= 16);
        // The second optimal orientation and the costlier subtrees must
        // have been cut.
        assert!(stats.total_prunings() >= 1);
        assert!(stats.root_lower_bound <= 80);
    }

    #[test]
    fn test_expired_time_limit_aborts() {
        let matrix = classic_matrix();
        let mut solver = BnbSolver::new();
        let mut bound = MinEdgeBound::new();
        let monitor = TimeLimitMonitor::new(Duration::ZERO, 1);

        let outcome = solver.solve(&matrix, &mut bound, monitor);
        assert!(matches!(
            outcome.termination_reason(),
            TerminationReason::Aborted(_)
        ));
        // The very first command fires before any tour is closed.
        assert!(matches!(outcome.result(), SolverResult::Unknown));
    }

    #[test]
    fn test_solver_is_reusable_across_solves() {
        let matrix = classic_matrix();
        let mut solver = BnbSolver::preallocated(BnbConfig::default(), matrix.num_cities());
        let mut bound = MinEdgeBound::new();

        let first = solver.solve(&matrix, &mut bound, NoOperationMonitor::new());
        let second = solver.solve(&matrix, &mut bound, NoOperationMonitor::new());

        assert_eq!(
            first.result().tour().unwrap().total_cost(),
            second.result().tour().unwrap().total_cost()
        );
        assert_eq!(
            first.statistics().nodes_explored,
            second.statistics().nodes_explored
        );
    }

    #[test]
    fn test_uniform_instance_has_no_bound_prunes_below_optimum() {
        // On a uniform matrix every tour costs the same, so the first tour
        // is optimal and every later leaf is cut at the incumbent.
        let matrix = CostMatrix::from_rows(vec![
            vec![0, 1, 1, 1],
            vec![1, 0, 1, 1],
            vec![1, 1, 0, 1],
            vec![1, 1, 1, 0],
        ])
        .unwrap();

        let outcome = solve_fixed(&matrix);
        let tour = outcome.result().tour().unwrap();
        assert_eq!(tour.total_cost(), 4);
        assert_eq!(outcome.statistics().solutions_found, 1);
    }
}
