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

use num_traits::{PrimInt, Signed};
use waypoint_model::tour::Tour;

/// The qualitative outcome of a solving run.
///
/// A validated cost matrix always admits a tour, so there is no infeasible
/// variant; `Unknown` covers runs aborted before any tour was closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolverResult<T> {
    /// We have found a tour and proven its optimality.
    Optimal(Tour<T>),
    /// We have found a tour, but not proven its optimality.
    Feasible(Tour<T>),
    /// The run terminated without producing a tour.
    Unknown,
}

impl<T> SolverResult<T> {
    /// Returns the tour carried by this result, if any.
    #[inline]
    pub fn tour(&self) -> Option<&Tour<T>> {
        match self {
            SolverResult::Optimal(tour) | SolverResult::Feasible(tour) => Some(tour),
            SolverResult::Unknown => None,
        }
    }
}

impl<T> std::fmt::Display for SolverResult<T>
where
    T: PrimInt + Signed + Copy + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverResult::Optimal(tour) => {
                write!(f, "Optimal(cost={})", tour.total_cost())
            }
            SolverResult::Feasible(tour) => {
                write!(f, "Feasible(cost={})", tour.total_cost())
            }
            SolverResult::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Why a solving run stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminationReason {
    /// The search exhausted the tree and proved the best tour optimal.
    OptimalityProven,
    /// A heuristic pipeline ran to completion. The tour it produced carries
    /// no optimality proof.
    HeuristicCompleted,
    /// The run aborted due to a search limit (time, interrupt, etc.).
    /// The string contains information about the reason for abortion.
    Aborted(String),
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminationReason::OptimalityProven => write!(f, "Optimality Proven"),
            TerminationReason::HeuristicCompleted => write!(f, "Heuristic Completed"),
            TerminationReason::Aborted(reason) => write!(f, "Aborted: {}", *reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waypoint_model::index::CityIndex;

    fn tour() -> Tour<i64> {
        Tour::new(42, vec![CityIndex::new(0), CityIndex::new(1)])
    }

    #[test]
    fn test_tour_accessor() {
        assert_eq!(
            SolverResult::Optimal(tour()).tour().map(Tour::total_cost),
            Some(42)
        );
        assert_eq!(
            SolverResult::Feasible(tour()).tour().map(Tour::total_cost),
            Some(42)
        );
        assert!(SolverResult::<i64>::Unknown.tour().is_none());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", SolverResult::Optimal(tour())), "Optimal(cost=42)");
        assert_eq!(format!("{}", SolverResult::<i64>::Unknown), "Unknown");
        assert_eq!(
            format!("{}", TerminationReason::Aborted("time limit".into())),
            "Aborted: time limit"
        );
        assert_eq!(
            format!("{}", TerminationReason::HeuristicCompleted),
            "Heuristic Completed"
        );
    }
}
