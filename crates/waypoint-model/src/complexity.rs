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

use waypoint_core::num::ops::checked_arithmetic::CheckedMulVal;

/// Represents the theoretical size of the TSP permutation search space.
///
/// An origin-fixed search enumerates $(N-1)!$ complete tours; a free-origin
/// search enumerates $N!$. Since these numbers exceed standard integer limits
/// long before an instance stops fitting in memory, this struct stores the
/// node count of the whole permutation tree in **logarithmic space**
/// ($\log_{10}$), and offers an exact `u64` tour count only when it is
/// representable.
#[derive(Clone, Copy, PartialEq, PartialOrd)]
pub struct SearchSpace {
    /// The base-10 logarithm of the total number of tree nodes.
    log_nodes: f64,
    num_cities: usize,
    fix_origin: bool,
}

impl SearchSpace {
    /// Calculates the search space for an instance of `num_cities` cities.
    ///
    /// With `fix_origin`, the tree roots at the origin and level $k$ holds
    /// the partial paths over $k$ of the remaining $N-1$ cities. Without it,
    /// the root is the empty path and every city may start a tour.
    pub fn new(num_cities: usize, fix_origin: bool) -> Self {
        let free_slots = if fix_origin {
            num_cities.saturating_sub(1)
        } else {
            num_cities
        };

        // Level node counts: L_0 = 1, L_k = L_{k-1} * (free_slots - (k - 1)).
        // Both the level size and the running total are tracked in log10.
        let log10_add = |a: f64, b: f64| -> f64 {
            let max = a.max(b);
            let min = a.min(b);
            max + (1.0 + 10.0_f64.powf(min - max)).log10()
        };

        let mut current_level_log = 0.0;
        let mut total_log = 0.0;
        for k in 1..=free_slots {
            let branching = (free_slots - (k - 1)) as f64;
            current_level_log += branching.log10();
            total_log = log10_add(total_log, current_level_log);
        }

        SearchSpace {
            log_nodes: total_log,
            num_cities,
            fix_origin,
        }
    }

    /// Returns the number of complete tours the tree contains, when it fits
    /// a `u64`. For an origin-fixed search this is $(N-1)!$, otherwise $N!$.
    ///
    /// Returns `None` once the factorial overflows, which happens at
    /// $21! > 2^{64}$.
    pub fn tours_exact(&self) -> Option<u64> {
        let free_slots = if self.fix_origin {
            self.num_cities.saturating_sub(1)
        } else {
            self.num_cities
        };

        let mut total: u64 = 1;
        for k in 2..=free_slots as u64 {
            total = total.checked_mul_val(k)?;
        }
        Some(total)
    }

    /// Returns the percentage of the search space that was actually explored.
    /// Returns None if the space is too massive to represent as f64.
    pub fn coverage(&self, nodes_explored: u64) -> Option<f64> {
        if self.log_nodes > 15.0 {
            return Some(0.0);
        }

        let total_size = 10.0_f64.powf(self.log_nodes);
        if total_size == 0.0 {
            return None;
        }

        Some((nodes_explored as f64 / total_size) * 100.0)
    }

    /// Returns the exponent (order of magnitude) of the node count.
    #[inline]
    pub fn exponent(&self) -> u64 {
        self.log_nodes.floor() as u64
    }

    /// Returns the mantissa (coefficient) of the node count.
    #[inline]
    pub fn mantissa(&self) -> f64 {
        let fractional_part = self.log_nodes - self.log_nodes.floor();
        10.0_f64.powf(fractional_part)
    }

    /// Returns the raw log10 node count. Useful for progress bars and scale
    /// guards.
    #[inline]
    pub fn raw(&self) -> f64 {
        self.log_nodes
    }

    /// Returns `true` if the search tree roots at the fixed origin.
    #[inline]
    pub fn fix_origin(&self) -> bool {
        self.fix_origin
    }
}

impl std::fmt::Display for SearchSpace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2} × 10^{}", self.mantissa(), self.exponent())
    }
}

impl std::fmt::Debug for SearchSpace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SearchSpace(log10={:.4}, num_cities={}, fix_origin={})",
            self.log_nodes, self.num_cities, self.fix_origin
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trivial_instances() {
        // A single city has exactly one tour and a one-node tree.
        let space = SearchSpace::new(1, true);
        assert_eq!(space.tours_exact(), Some(1));
        assert_eq!(space.raw(), 0.0);

        let space = SearchSpace::new(0, false);
        assert_eq!(space.tours_exact(), Some(1));
    }

    #[test]
    fn test_tours_exact_fixed_vs_free() {
        // 5 cities: 4! = 24 origin-fixed tours, 5! = 120 free tours.
        assert_eq!(SearchSpace::new(5, true).tours_exact(), Some(24));
        assert_eq!(SearchSpace::new(5, false).tours_exact(), Some(120));
    }

    #[test]
    fn test_tours_exact_overflow() {
        // 20! fits u64, 21! does not.
        assert!(SearchSpace::new(21, true).tours_exact().is_some());
        assert_eq!(SearchSpace::new(22, true).tours_exact(), None);
    }

    #[test]
    fn test_log_nodes_counts_all_levels() {
        // 4 cities, origin fixed: L_0 = 1, L_1 = 3, L_2 = 6, L_3 = 6,
        // 16 nodes in total.
        let space = SearchSpace::new(4, true);
        let total = 10.0_f64.powf(space.raw());
        assert!((total - 16.0).abs() < 1e-9);
    }

    #[test]
    fn test_coverage() {
        let space = SearchSpace::new(4, true);
        let full = space.coverage(16).unwrap();
        assert!((full - 100.0).abs() < 1e-6);

        // Gigantic spaces report zero coverage instead of noise.
        let huge = SearchSpace::new(30, true);
        assert_eq!(huge.coverage(1_000_000), Some(0.0));
    }

    #[test]
    fn test_display_format() {
        let space = SearchSpace::new(4, true);
        // 16 nodes -> "1.60 × 10^1".
        assert_eq!(format!("{}", space), "1.60 × 10^1");
    }
}
