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

//! # Strategy-Dispatching Solver
//!
//! A facade over the three Waypoint engines. Callers can invoke a specific
//! strategy directly, or let `solve` pick one: instances up to the exact
//! city ceiling run through branch-and-bound, larger ones fall back to the
//! polynomial spanning-tree approximation.
//!
//! Every strategy funnels into a `RunReport` carrying the stable algorithm
//! tag, the best tour, and the tree counters where a tree was searched.

use std::time::Duration;
use waypoint_bnb::{
    bnb::{BnbConfig, BnbSolver},
    bound::MinEdgeBound,
    monitor::{no_op::NoOperationMonitor, time_limit::TimeLimitMonitor},
    result::BnbOutcome,
};
use waypoint_brute::enumerate::BruteForceSolver;
use waypoint_model::matrix::CostMatrix;
use waypoint_mst::approx::MstApproximator;
use waypoint_search::{
    num::SolverNumeric,
    report::{Algorithm, RunReport},
    result::{SolverResult, TerminationReason},
};

/// Default largest instance the dispatcher still hands to the exact
/// branch-and-bound engine.
pub const DEFAULT_EXACT_CITY_CEILING: usize = 12;

/// A run that stopped before any tour was closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveError {
    /// The engine hit a limit with no incumbent to report.
    Aborted(String),
}

impl std::fmt::Display for SolveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolveError::Aborted(reason) => {
                write!(f, "solver aborted without a tour: {}", reason)
            }
        }
    }
}

impl std::error::Error for SolveError {}

/// The strategy-dispatching solver facade.
///
/// Holds the run configuration shared by all strategies. The solver itself
/// is cheap; the branch-and-bound engine it spins up per call preallocates
/// for the instance at hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solver {
    time_limit: Option<Duration>,
    exact_city_ceiling: usize,
    fix_origin: bool,
}

impl Default for Solver {
    #[inline]
    fn default() -> Self {
        SolverBuilder::new().build()
    }
}

impl Solver {
    /// Returns the time limit applied to branch-and-bound runs, if any.
    #[inline]
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit
    }

    /// Returns the largest instance still dispatched to an exact engine.
    #[inline]
    pub fn exact_city_ceiling(&self) -> usize {
        self.exact_city_ceiling
    }

    /// Returns whether tours are anchored at city 0.
    #[inline]
    pub fn fix_origin(&self) -> bool {
        self.fix_origin
    }

    /// Solves the instance with an automatically selected strategy.
    ///
    /// Instances with at most `exact_city_ceiling` cities run through the
    /// exact branch-and-bound engine; larger ones get the spanning-tree
    /// approximation, whose tour carries no optimality proof.
    pub fn solve<T>(&self, matrix: &CostMatrix<T>) -> Result<RunReport<T>, SolveError>
    where
        T: SolverNumeric,
    {
        if matrix.num_cities() <= self.exact_city_ceiling {
            self.solve_branch_bound(matrix)
        } else {
            Ok(self.solve_approximate(matrix))
        }
    }

    /// Solves the instance exactly with branch-and-bound.
    pub fn solve_branch_bound<T>(&self, matrix: &CostMatrix<T>) -> Result<RunReport<T>, SolveError>
    where
        T: SolverNumeric,
    {
        let config = if self.fix_origin {
            BnbConfig::new()
        } else {
            BnbConfig::with_free_origin()
        };

        let mut solver = BnbSolver::preallocated(config, matrix.num_cities());
        let mut bound = MinEdgeBound::new();

        let outcome = match self.time_limit {
            Some(limit) => solver.solve(
                matrix,
                &mut bound,
                TimeLimitMonitor::with_default_check_interval(limit),
            ),
            None => solver.solve(matrix, &mut bound, NoOperationMonitor::new()),
        };

        Self::report_from_bnb(outcome)
    }

    /// Solves the instance exactly by pricing every tour.
    ///
    /// The enumeration has no early exit, so the configured time limit does
    /// not apply here; this strategy exists as an oracle for small
    /// instances.
    pub fn solve_brute_force<T>(&self, matrix: &CostMatrix<T>) -> RunReport<T>
    where
        T: SolverNumeric,
    {
        let solver = if self.fix_origin {
            BruteForceSolver::new()
        } else {
            BruteForceSolver::with_free_origin()
        };

        let outcome = solver.solve(matrix);
        let tour = match outcome.result() {
            SolverResult::Optimal(tour) => tour,
            // Enumeration always closes at least one tour.
            _ => unreachable!("brute-force enumeration finished without a tour"),
        };

        RunReport::from_tour(
            Algorithm::ExactBruteForce,
            tour,
            outcome.statistics().time_total,
            None,
            None,
        )
    }

    /// Derives an approximate tour from a minimum spanning tree.
    pub fn solve_approximate<T>(&self, matrix: &CostMatrix<T>) -> RunReport<T>
    where
        T: SolverNumeric,
    {
        let outcome = MstApproximator::new().approximate(matrix);
        let tour = match outcome.result() {
            SolverResult::Feasible(tour) => tour,
            _ => unreachable!("spanning-tree approximation finished without a tour"),
        };

        RunReport::from_tour(
            Algorithm::ApproxMst,
            tour,
            outcome.statistics().time_total,
            None,
            None,
        )
    }

    fn report_from_bnb<T>(outcome: BnbOutcome<T>) -> Result<RunReport<T>, SolveError>
    where
        T: SolverNumeric,
    {
        let stats = outcome.statistics();
        match outcome.result() {
            SolverResult::Optimal(tour) | SolverResult::Feasible(tour) => Ok(RunReport::from_tour(
                Algorithm::ExactBranchBound,
                tour,
                stats.time_total,
                Some(stats.nodes_explored),
                Some(stats.total_prunings()),
            )),
            SolverResult::Unknown => {
                let reason = match outcome.termination_reason() {
                    TerminationReason::Aborted(reason) => reason.clone(),
                    other => other.to_string(),
                };
                Err(SolveError::Aborted(reason))
            }
        }
    }
}

/// Builder for the `Solver` facade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverBuilder {
    time_limit: Option<Duration>,
    exact_city_ceiling: usize,
    fix_origin: bool,
}

impl Default for SolverBuilder {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl SolverBuilder {
    /// Creates a builder with the default configuration: no time limit,
    /// the default exact ceiling, and tours anchored at city 0.
    #[inline]
    pub fn new() -> Self {
        Self {
            time_limit: None,
            exact_city_ceiling: DEFAULT_EXACT_CITY_CEILING,
            fix_origin: true,
        }
    }

    /// Applies a wall-clock limit to branch-and-bound runs.
    #[inline]
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Sets the largest instance still dispatched to an exact engine.
    #[inline]
    pub fn with_exact_city_ceiling(mut self, ceiling: usize) -> Self {
        self.exact_city_ceiling = ceiling;
        self
    }

    /// Lets the starting city vary instead of anchoring tours at city 0.
    #[inline]
    pub fn with_free_origin(mut self) -> Self {
        self.fix_origin = false;
        self
    }

    /// Builds the configured solver.
    #[inline]
    pub fn build(self) -> Solver {
        Solver {
            time_limit: self.time_limit,
            exact_city_ceiling: self.exact_city_ceiling,
            fix_origin: self.fix_origin,
        }
    }
}
