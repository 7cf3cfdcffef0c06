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
use std::time::Duration;
use waypoint_model::{index::CityIndex, tour::Tour};

/// Identifies the strategy that produced a run's result. The `Display` tags
/// are stable identifiers meant for result files and cross-run comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// Branch-and-bound exact search.
    ExactBranchBound,
    /// Exhaustive permutation enumeration.
    ExactBruteForce,
    /// Spanning-tree 2-approximation.
    ApproxMst,
}

impl Algorithm {
    /// Returns the stable tag for this strategy.
    #[inline]
    pub fn tag(&self) -> &'static str {
        match self {
            Algorithm::ExactBranchBound => "EXACT_BB",
            Algorithm::ExactBruteForce => "EXACT_BRUTE_FORCE",
            Algorithm::ApproxMst => "APPROX_MST",
        }
    }

    /// Returns `true` if this strategy proves optimality when it completes.
    #[inline]
    pub fn is_exact(&self) -> bool {
        matches!(self, Algorithm::ExactBranchBound | Algorithm::ExactBruteForce)
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// A uniform summary of one solving run, regardless of strategy.
///
/// This is the hand-off point to reporting and persistence layers; the node
/// counters are `None` for strategies that do not search a tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport<T> {
    algorithm: Algorithm,
    best_cost: T,
    best_path: Vec<CityIndex>,
    elapsed: Duration,
    nodes_explored: Option<u64>,
    nodes_pruned: Option<u64>,
}

impl<T> RunReport<T>
where
    T: PrimInt + Signed + Copy,
{
    /// Builds a report from a finished tour.
    pub fn from_tour(
        algorithm: Algorithm,
        tour: &Tour<T>,
        elapsed: Duration,
        nodes_explored: Option<u64>,
        nodes_pruned: Option<u64>,
    ) -> Self {
        Self {
            algorithm,
            best_cost: tour.total_cost(),
            best_path: tour.cities().to_vec(),
            elapsed,
            nodes_explored,
            nodes_pruned,
        }
    }

    /// Returns the strategy that produced this report.
    #[inline]
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Returns the best tour cost found.
    #[inline]
    pub fn best_cost(&self) -> T {
        self.best_cost
    }

    /// Returns the best visit order found.
    #[inline]
    pub fn best_path(&self) -> &[CityIndex] {
        &self.best_path
    }

    /// Returns the wall-clock duration of the run.
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Returns the number of tree nodes the run expanded, if it searched a
    /// tree.
    #[inline]
    pub fn nodes_explored(&self) -> Option<u64> {
        self.nodes_explored
    }

    /// Returns the number of subtrees the run pruned, if it searched a tree.
    #[inline]
    pub fn nodes_pruned(&self) -> Option<u64> {
        self.nodes_pruned
    }
}

impl<T> std::fmt::Display for RunReport<T>
where
    T: PrimInt + Signed + Copy + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Run Report ({})", self.algorithm)?;
        writeln!(f, "   Best Cost:      {}", self.best_cost)?;
        writeln!(f, "   Elapsed:        {:?}", self.elapsed)?;
        if let Some(explored) = self.nodes_explored {
            writeln!(f, "   Nodes Explored: {}", explored)?;
        }
        if let Some(pruned) = self.nodes_pruned {
            writeln!(f, "   Nodes Pruned:   {}", pruned)?;
        }
        write!(f, "   Path:           ")?;
        for (i, city) in self.best_path.iter().enumerate() {
            if i > 0 {
                write!(f, " -> ")?;
            }
            write!(f, "{}", city.get())?;
        }
        if let Some(first) = self.best_path.first() {
            write!(f, " -> {}", first.get())?;
        }
        writeln!(f)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ci(i: usize) -> CityIndex {
        CityIndex::new(i)
    }

    #[test]
    fn test_algorithm_tags() {
        assert_eq!(Algorithm::ExactBranchBound.tag(), "EXACT_BB");
        assert_eq!(Algorithm::ExactBruteForce.tag(), "EXACT_BRUTE_FORCE");
        assert_eq!(Algorithm::ApproxMst.tag(), "APPROX_MST");
        assert_eq!(format!("{}", Algorithm::ApproxMst), "APPROX_MST");
    }

    #[test]
    fn test_exactness() {
        assert!(Algorithm::ExactBranchBound.is_exact());
        assert!(Algorithm::ExactBruteForce.is_exact());
        assert!(!Algorithm::ApproxMst.is_exact());
    }

    #[test]
    fn test_from_tour() {
        let tour = Tour::new(80i64, vec![ci(0), ci(1), ci(3), ci(2)]);
        let report = RunReport::from_tour(
            Algorithm::ExactBranchBound,
            &tour,
            Duration::from_millis(5),
            Some(11),
            Some(4),
        );

        assert_eq!(report.algorithm(), Algorithm::ExactBranchBound);
        assert_eq!(report.best_cost(), 80);
        assert_eq!(report.best_path(), &[ci(0), ci(1), ci(3), ci(2)]);
        assert_eq!(report.nodes_explored(), Some(11));
        assert_eq!(report.nodes_pruned(), Some(4));
    }

    #[test]
    fn test_display_closes_the_cycle() {
        let tour = Tour::new(12i64, vec![ci(0), ci(2), ci(1)]);
        let report = RunReport::from_tour(
            Algorithm::ApproxMst,
            &tour,
            Duration::from_millis(1),
            None,
            None,
        );

        let displayed = format!("{}", report);
        assert!(displayed.contains("APPROX_MST"));
        assert!(displayed.contains("0 -> 2 -> 1 -> 0"));
        // Strategies without tree counters omit those rows.
        assert!(!displayed.contains("Nodes Explored"));
    }
}
