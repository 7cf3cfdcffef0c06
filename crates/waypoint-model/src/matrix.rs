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

use crate::{complexity::SearchSpace, index::CityIndex};
use num_traits::{FromPrimitive, PrimInt, Signed};
use waypoint_core::num::ops::checked_arithmetic::{CheckedAddVal, CheckedMulVal};

#[inline(always)]
fn flatten_index(num_cities: usize, from: CityIndex, to: CityIndex) -> usize {
    from.get() * num_cities + to.get()
}

/// The error type for cost matrix construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CostMatrixError {
    /// The matrix has no cities. A tour needs at least one.
    NoCities,
    /// A row has the wrong number of entries for a square matrix.
    NotSquare {
        /// The index of the offending row.
        row: usize,
        /// The number of entries found in that row.
        found: usize,
        /// The expected number of entries per row.
        expected: usize,
    },
    /// An off-diagonal edge carries a negative cost.
    NegativeCost {
        /// The source city of the offending edge.
        from: CityIndex,
        /// The destination city of the offending edge.
        to: CityIndex,
    },
    /// The worst-case tour cost (`n * max_cost`) does not fit the cost type,
    /// so exact accumulation could wrap during search.
    AccumulatorOverflow,
}

impl std::fmt::Display for CostMatrixError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoCities => write!(f, "cost matrix must contain at least one city"),
            Self::NotSquare {
                row,
                found,
                expected,
            } => write!(
                f,
                "cost matrix row {} has {} entries but {} were expected",
                row, found, expected
            ),
            Self::NegativeCost { from, to } => write!(
                f,
                "cost from city {} to city {} is negative",
                from.get(),
                to.get()
            ),
            Self::AccumulatorOverflow => write!(
                f,
                "worst-case tour cost overflows the accumulator type"
            ),
        }
    }
}

impl std::error::Error for CostMatrixError {}

/// The immutable cost matrix of a TSP instance.
///
/// Holds the pairwise travel costs of a directed, fully-connected instance
/// over `n` cities in a flat row-major vector:
/// `costs[from * n + to]` is the cost of the edge `from -> to`.
///
/// Invariants, enforced by `CostMatrixBuilder::build`:
/// - `n >= 1`.
/// - Every off-diagonal cost is non-negative. The matrix may be asymmetric.
/// - Every diagonal entry is zero.
/// - `n * max_cost` fits `T`, so any sum of at most `n` edge costs is exact.
#[derive(Clone)]
pub struct CostMatrix<T>
where
    T: PrimInt + Signed,
{
    num_cities: usize,
    costs: Vec<T>, // len = num_cities * num_cities
    max_cost: T,
}

impl<T> CostMatrix<T>
where
    T: PrimInt + Signed,
{
    /// Returns the number of cities in the instance.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use waypoint_model::matrix::CostMatrix;
    ///
    /// let matrix = CostMatrix::<i64>::from_rows(vec![
    ///     vec![0, 3],
    ///     vec![2, 0],
    /// ]).unwrap();
    /// assert_eq!(matrix.num_cities(), 2);
    /// ```
    #[inline]
    pub fn num_cities(&self) -> usize {
        self.num_cities
    }

    /// Returns the cost of the edge `from -> to`.
    ///
    /// # Panics
    ///
    /// Panics if `from` or `to` is not in `0..num_cities()`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use waypoint_model::matrix::CostMatrix;
    /// # use waypoint_model::index::CityIndex;
    ///
    /// let matrix = CostMatrix::<i64>::from_rows(vec![
    ///     vec![0, 3],
    ///     vec![2, 0],
    /// ]).unwrap();
    /// assert_eq!(matrix.cost(CityIndex::new(0), CityIndex::new(1)), 3);
    /// assert_eq!(matrix.cost(CityIndex::new(1), CityIndex::new(0)), 2);
    /// ```
    #[inline]
    pub fn cost(&self, from: CityIndex, to: CityIndex) -> T {
        debug_assert!(
            from.get() < self.num_cities,
            "called `CostMatrix::cost` with from index out of bounds: the len is {} but the index is {}",
            self.num_cities,
            from.get()
        );
        debug_assert!(
            to.get() < self.num_cities,
            "called `CostMatrix::cost` with to index out of bounds: the len is {} but the index is {}",
            self.num_cities,
            to.get()
        );

        self.costs[flatten_index(self.num_cities, from, to)]
    }

    /// Returns the cost of the edge `from -> to` without bounds checking.
    ///
    /// # Safety
    ///
    /// This function is unsafe because it does not perform bounds checking on
    /// `from` and `to`. The caller must ensure both are in `0..num_cities()`.
    /// Undefined behavior may occur if this precondition is violated.
    #[inline]
    pub unsafe fn cost_unchecked(&self, from: CityIndex, to: CityIndex) -> T {
        debug_assert!(
            from.get() < self.num_cities,
            "called `CostMatrix::cost_unchecked` with from index out of bounds: the len is {} but the index is {}",
            self.num_cities,
            from.get()
        );
        debug_assert!(
            to.get() < self.num_cities,
            "called `CostMatrix::cost_unchecked` with to index out of bounds: the len is {} but the index is {}",
            self.num_cities,
            to.get()
        );

        unsafe {
            *self
                .costs
                .get_unchecked(flatten_index(self.num_cities, from, to))
        }
    }

    /// Returns the largest edge cost in the matrix.
    #[inline]
    pub fn max_cost(&self) -> T {
        self.max_cost
    }

    /// Returns `true` if `cost(i, j) == cost(j, i)` for every city pair.
    ///
    /// Symmetry is not required for solving, but the 2x quality guarantee of
    /// the spanning-tree approximation only holds for symmetric metric
    /// instances.
    pub fn is_symmetric(&self) -> bool {
        for i in 0..self.num_cities {
            for j in (i + 1)..self.num_cities {
                if self.costs[i * self.num_cities + j] != self.costs[j * self.num_cities + i] {
                    return false;
                }
            }
        }
        true
    }

    /// Returns the cheapest outgoing edge of `from` over the destinations
    /// accepted by `allow`, or `None` if `allow` rejects every other city.
    ///
    /// The diagonal is never considered a destination.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use waypoint_model::matrix::CostMatrix;
    /// # use waypoint_model::index::CityIndex;
    ///
    /// let matrix = CostMatrix::<i64>::from_rows(vec![
    ///     vec![0, 10, 4],
    ///     vec![7, 0, 2],
    ///     vec![5, 9, 0],
    /// ]).unwrap();
    ///
    /// let min = matrix.min_outgoing_cost(CityIndex::new(0), |_| true);
    /// assert_eq!(min, Some(4));
    ///
    /// // Restrict the destination set.
    /// let min = matrix.min_outgoing_cost(CityIndex::new(0), |c| c.get() == 1);
    /// assert_eq!(min, Some(10));
    /// ```
    pub fn min_outgoing_cost<F>(&self, from: CityIndex, mut allow: F) -> Option<T>
    where
        F: FnMut(CityIndex) -> bool,
    {
        debug_assert!(
            from.get() < self.num_cities,
            "called `CostMatrix::min_outgoing_cost` with from index out of bounds: the len is {} but the index is {}",
            self.num_cities,
            from.get()
        );

        let row = &self.costs[from.get() * self.num_cities..(from.get() + 1) * self.num_cities];
        let mut best: Option<T> = None;
        for (j, &cost) in row.iter().enumerate() {
            if j == from.get() {
                continue;
            }
            if !allow(CityIndex::new(j)) {
                continue;
            }
            best = Some(match best {
                Some(b) if b <= cost => b,
                _ => cost,
            });
        }
        best
    }

    /// Returns the total cost of the closed tour visiting `order` and
    /// returning to its first city, or `None` if the sum overflows `T`.
    ///
    /// For a validated matrix the sum of `order.len()` edges cannot overflow,
    /// so `None` only occurs for matrices built by other means or orders
    /// longer than `n`.
    ///
    /// # Panics
    ///
    /// Panics if `order` is empty or contains an out-of-bounds city.
    pub fn cycle_cost(&self, order: &[CityIndex]) -> Option<T>
    where
        T: CheckedAddVal,
    {
        assert!(
            !order.is_empty(),
            "called `CostMatrix::cycle_cost` with an empty order"
        );

        let mut total = T::zero();
        for pair in order.windows(2) {
            total = total.checked_add_val(self.cost(pair[0], pair[1]))?;
        }
        total.checked_add_val(self.cost(order[order.len() - 1], order[0]))
    }

    /// Returns the search space estimate for this instance.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use waypoint_model::matrix::CostMatrix;
    ///
    /// let matrix = CostMatrix::<i64>::from_rows(vec![
    ///     vec![0, 1, 1, 1],
    ///     vec![1, 0, 1, 1],
    ///     vec![1, 1, 0, 1],
    ///     vec![1, 1, 1, 0],
    /// ]).unwrap();
    ///
    /// // Origin-fixed: (4 - 1)! = 6 complete tours.
    /// let space = matrix.search_space(true);
    /// assert_eq!(space.tours_exact(), Some(6));
    /// ```
    #[inline]
    pub fn search_space(&self, fix_origin: bool) -> SearchSpace {
        SearchSpace::new(self.num_cities, fix_origin)
    }

    /// Builds a matrix directly from row vectors.
    ///
    /// Convenience for tests and embedded instances; equivalent to feeding
    /// every entry through a `CostMatrixBuilder`.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self, CostMatrixError>
    where
        T: FromPrimitive + CheckedMulVal,
    {
        let n = rows.len();
        if n == 0 {
            return Err(CostMatrixError::NoCities);
        }

        let mut builder = CostMatrixBuilder::new(n);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n {
                return Err(CostMatrixError::NotSquare {
                    row: i,
                    found: row.len(),
                    expected: n,
                });
            }
            for (j, &cost) in row.iter().enumerate() {
                if i != j {
                    builder.set_cost(CityIndex::new(i), CityIndex::new(j), cost);
                }
            }
        }
        builder.build()
    }
}

impl<T> std::fmt::Debug for CostMatrix<T>
where
    T: PrimInt + Signed + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CostMatrix")
            .field("num_cities", &self.num_cities)
            .field("costs", &self.costs)
            .field("max_cost", &self.max_cost)
            .finish()
    }
}

impl<T> std::fmt::Display for CostMatrix<T>
where
    T: PrimInt + Signed + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CostMatrix(num_cities: {})", self.num_cities)
    }
}

/// A mutable builder for `CostMatrix`.
///
/// Starts from an all-zero matrix of the requested size; costs are added by
/// *raising* individual edges. Validation happens once, in `build`.
///
/// # Examples
///
/// ```rust
/// # use waypoint_model::matrix::CostMatrixBuilder;
/// # use waypoint_model::index::CityIndex;
///
/// let mut builder = CostMatrixBuilder::<i64>::new(2);
/// builder
///     .set_cost(CityIndex::new(0), CityIndex::new(1), 7)
///     .set_cost(CityIndex::new(1), CityIndex::new(0), 9);
/// let matrix = builder.build().unwrap();
/// assert_eq!(matrix.cost(CityIndex::new(0), CityIndex::new(1)), 7);
/// ```
#[derive(Clone)]
pub struct CostMatrixBuilder<T>
where
    T: PrimInt + Signed,
{
    num_cities: usize,
    costs: Vec<T>,
}

impl<T> CostMatrixBuilder<T>
where
    T: PrimInt + Signed,
{
    /// Creates a builder for an instance with `num_cities` cities, with all
    /// edge costs initialized to zero.
    pub fn new(num_cities: usize) -> Self {
        Self {
            num_cities,
            costs: vec![T::zero(); num_cities * num_cities],
        }
    }

    /// Returns the number of cities the builder was created with.
    #[inline]
    pub fn num_cities(&self) -> usize {
        self.num_cities
    }

    /// Sets the cost of the edge `from -> to`.
    ///
    /// Setting a diagonal entry is allowed but has no effect; the diagonal is
    /// forced to zero at `build`.
    ///
    /// # Panics
    ///
    /// Panics if `from` or `to` is not in `0..num_cities()`.
    #[inline]
    pub fn set_cost(&mut self, from: CityIndex, to: CityIndex, cost: T) -> &mut Self {
        debug_assert!(
            from.get() < self.num_cities,
            "called `CostMatrixBuilder::set_cost` with from index out of bounds: the len is {} but the index is {}",
            self.num_cities,
            from.get()
        );
        debug_assert!(
            to.get() < self.num_cities,
            "called `CostMatrixBuilder::set_cost` with to index out of bounds: the len is {} but the index is {}",
            self.num_cities,
            to.get()
        );

        self.costs[flatten_index(self.num_cities, from, to)] = cost;
        self
    }

    /// Validates the accumulated costs and produces an immutable matrix.
    ///
    /// # Errors
    ///
    /// - `NoCities` if the builder was created with zero cities.
    /// - `NegativeCost` for the first off-diagonal negative entry found.
    /// - `AccumulatorOverflow` if `n * max_cost` does not fit `T`. Rejecting
    ///   such instances up front keeps every in-search sum of at most `n`
    ///   edges exact.
    pub fn build(mut self) -> Result<CostMatrix<T>, CostMatrixError>
    where
        T: FromPrimitive + CheckedMulVal,
    {
        let n = self.num_cities;
        if n == 0 {
            return Err(CostMatrixError::NoCities);
        }

        let mut max_cost = T::zero();
        for i in 0..n {
            self.costs[i * n + i] = T::zero();
            for j in 0..n {
                let cost = self.costs[i * n + j];
                if cost < T::zero() {
                    return Err(CostMatrixError::NegativeCost {
                        from: CityIndex::new(i),
                        to: CityIndex::new(j),
                    });
                }
                if cost > max_cost {
                    max_cost = cost;
                }
            }
        }

        let n_as_t = T::from_usize(n).ok_or(CostMatrixError::AccumulatorOverflow)?;
        if n_as_t.checked_mul_val(max_cost).is_none() {
            return Err(CostMatrixError::AccumulatorOverflow);
        }

        Ok(CostMatrix {
            num_cities: n,
            costs: self.costs,
            max_cost,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ci(i: usize) -> CityIndex {
        CityIndex::new(i)
    }

    fn small_matrix() -> CostMatrix<i64> {
        CostMatrix::from_rows(vec![
            vec![0, 10, 15, 20],
            vec![10, 0, 35, 25],
            vec![15, 35, 0, 30],
            vec![20, 25, 30, 0],
        ])
        .expect("matrix must build")
    }

    #[test]
    fn test_build_and_query() {
        let m = small_matrix();
        assert_eq!(m.num_cities(), 4);
        assert_eq!(m.cost(ci(0), ci(1)), 10);
        assert_eq!(m.cost(ci(2), ci(3)), 30);
        assert_eq!(m.cost(ci(1), ci(1)), 0);
        assert_eq!(m.max_cost(), 35);
    }

    #[test]
    fn test_unchecked_matches_checked() {
        let m = small_matrix();
        for i in 0..4 {
            for j in 0..4 {
                assert_eq!(m.cost(ci(i), ci(j)), unsafe {
                    m.cost_unchecked(ci(i), ci(j))
                });
            }
        }
    }

    #[test]
    fn test_no_cities_rejected() {
        let res = CostMatrix::<i64>::from_rows(Vec::new());
        assert_eq!(res.unwrap_err(), CostMatrixError::NoCities);

        let res = CostMatrixBuilder::<i64>::new(0).build();
        assert_eq!(res.unwrap_err(), CostMatrixError::NoCities);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let res = CostMatrix::<i64>::from_rows(vec![vec![0, 1], vec![1]]);
        assert_eq!(
            res.unwrap_err(),
            CostMatrixError::NotSquare {
                row: 1,
                found: 1,
                expected: 2
            }
        );
    }

    #[test]
    fn test_negative_cost_rejected() {
        let res = CostMatrix::<i64>::from_rows(vec![vec![0, -3], vec![4, 0]]);
        assert_eq!(
            res.unwrap_err(),
            CostMatrixError::NegativeCost {
                from: ci(0),
                to: ci(1)
            }
        );
    }

    #[test]
    fn test_diagonal_forced_to_zero() {
        let mut builder = CostMatrixBuilder::<i64>::new(2);
        builder.set_cost(ci(0), ci(0), 99);
        builder.set_cost(ci(0), ci(1), 1);
        builder.set_cost(ci(1), ci(0), 1);
        let m = builder.build().unwrap();
        assert_eq!(m.cost(ci(0), ci(0)), 0);
    }

    #[test]
    fn test_accumulator_overflow_rejected() {
        // 3 cities at i8::MAX per edge: 3 * 127 > 127.
        let res = CostMatrix::<i8>::from_rows(vec![
            vec![0, 127, 127],
            vec![127, 0, 127],
            vec![127, 127, 0],
        ]);
        assert_eq!(res.unwrap_err(), CostMatrixError::AccumulatorOverflow);
    }

    #[test]
    fn test_is_symmetric() {
        assert!(small_matrix().is_symmetric());

        let asym = CostMatrix::<i64>::from_rows(vec![vec![0, 1], vec![2, 0]]).unwrap();
        assert!(!asym.is_symmetric());
    }

    #[test]
    fn test_min_outgoing_cost() {
        let m = small_matrix();
        assert_eq!(m.min_outgoing_cost(ci(0), |_| true), Some(10));
        assert_eq!(m.min_outgoing_cost(ci(2), |_| true), Some(15));
        // Exclude everything: no destination remains.
        assert_eq!(m.min_outgoing_cost(ci(0), |_| false), None);
        // The diagonal must never win even though it is the cheapest entry.
        assert_eq!(m.min_outgoing_cost(ci(0), |c| c.get() == 0), None);
    }

    #[test]
    fn test_cycle_cost() {
        let m = small_matrix();
        let order = [ci(0), ci(1), ci(3), ci(2)];
        // 10 + 25 + 30 + 15
        assert_eq!(m.cycle_cost(&order), Some(80));

        // A single city closes on the zero diagonal.
        assert_eq!(m.cycle_cost(&[ci(2)]), Some(0));
    }

    #[test]
    #[should_panic(expected = "called `CostMatrix::cycle_cost` with an empty order")]
    fn test_cycle_cost_empty_panics() {
        let m = small_matrix();
        let _ = m.cycle_cost(&[]);
    }

    #[test]
    fn test_single_city_instance() {
        let m = CostMatrix::<i64>::from_rows(vec![vec![0]]).unwrap();
        assert_eq!(m.num_cities(), 1);
        assert_eq!(m.cycle_cost(&[ci(0)]), Some(0));
        assert_eq!(m.min_outgoing_cost(ci(0), |_| true), None);
    }
}
