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

//! Mutable search state for the branch‑and‑bound engine.
//!
//! `SearchState` holds the partial tour under construction: the visit order,
//! a bitset of visited cities, and the accumulated edge cost of the partial
//! path (excluding the closing edge). The engine mutates it in place on
//! descent and restores it through the trail on backtrack.

use fixedbitset::FixedBitSet;
use waypoint_core::num::constants::Zero;
use waypoint_model::index::CityIndex;

/// The partial tour a search session is currently exploring.
///
/// The accumulated cost covers the edges between consecutive cities of
/// `path`; the closing edge back to the start is added only when the tour
/// completes.
#[derive(Debug, Clone)]
pub struct SearchState<T> {
    path: Vec<CityIndex>,
    visited: FixedBitSet,
    current_cost: T,
    num_cities: usize,
}

impl<T> SearchState<T>
where
    T: Zero + Copy,
{
    /// Creates a fresh state for an instance with `num_cities` cities.
    ///
    /// The path is empty, no city is visited, and the accumulated cost
    /// is zero.
    #[inline]
    pub fn new(num_cities: usize) -> Self {
        Self {
            path: Vec::with_capacity(num_cities),
            visited: FixedBitSet::with_capacity(num_cities),
            current_cost: T::ZERO,
            num_cities,
        }
    }

    /// Returns the number of cities in the instance this state belongs to.
    #[inline]
    pub fn num_cities(&self) -> usize {
        self.num_cities
    }

    /// Returns the accumulated cost of the partial path.
    #[inline]
    pub fn current_cost(&self) -> T {
        self.current_cost
    }

    /// Overwrites the accumulated cost of the partial path.
    #[inline]
    pub fn set_current_cost(&mut self, cost: T) {
        self.current_cost = cost;
    }

    /// Returns the visit order of the partial path.
    #[inline]
    pub fn path(&self) -> &[CityIndex] {
        &self.path
    }

    /// Returns the number of cities on the partial path.
    #[inline]
    pub fn num_visited(&self) -> usize {
        self.path.len()
    }

    /// Returns the most recently visited city, if any.
    #[inline]
    pub fn last_city(&self) -> Option<CityIndex> {
        self.path.last().copied()
    }

    /// Returns the first city of the partial path, if any. A completed tour
    /// closes back to this city.
    #[inline]
    pub fn start_city(&self) -> Option<CityIndex> {
        self.path.first().copied()
    }

    /// Returns `true` if the given city is on the partial path.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `city` is out of bounds.
    #[inline]
    pub fn is_visited(&self, city: CityIndex) -> bool {
        debug_assert!(
            city.get() < self.num_cities,
            "called `SearchState::is_visited` with city index out of bounds: the len is {} but the index is {}",
            self.num_cities,
            city.get()
        );
        self.visited.contains(city.get())
    }

    /// Returns `true` if every city is on the partial path.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.path.len() == self.num_cities
    }

    /// Appends a city to the partial path and marks it visited.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `city` is out of bounds or already
    /// visited.
    #[inline]
    pub fn visit(&mut self, city: CityIndex) {
        debug_assert!(
            city.get() < self.num_cities,
            "called `SearchState::visit` with city index out of bounds: the len is {} but the index is {}",
            self.num_cities,
            city.get()
        );
        debug_assert!(
            !self.visited.contains(city.get()),
            "called `SearchState::visit` with city {} which is already visited",
            city.get()
        );

        self.visited.insert(city.get());
        self.path.push(city);
    }

    /// Removes the most recent city from the partial path and clears its
    /// visited mark.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if the path is empty or if `city` is not the
    /// most recent entry.
    #[inline]
    pub fn unvisit(&mut self, city: CityIndex) {
        debug_assert!(
            self.path.last() == Some(&city),
            "called `SearchState::unvisit` with city {} which is not the most recent visit",
            city.get()
        );

        self.path.pop();
        self.visited.set(city.get(), false);
    }

    /// Resets the state to its post-construction condition, keeping the
    /// allocated capacity.
    #[inline]
    pub fn reset(&mut self) {
        self.path.clear();
        self.visited.clear();
        self.current_cost = T::ZERO;
    }
}

impl<T> std::fmt::Display for SearchState<T>
where
    T: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SearchState(visited: {}/{}, cost: {})",
            self.path.len(),
            self.num_cities,
            self.current_cost
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ci(i: usize) -> CityIndex {
        CityIndex::new(i)
    }

    #[test]
    fn test_new_state_is_empty() {
        let state = SearchState::<i64>::new(4);
        assert_eq!(state.num_cities(), 4);
        assert_eq!(state.num_visited(), 0);
        assert_eq!(state.current_cost(), 0);
        assert!(state.last_city().is_none());
        assert!(state.start_city().is_none());
        assert!(!state.is_complete());
    }

    #[test]
    fn test_visit_and_unvisit() {
        let mut state = SearchState::<i64>::new(3);
        state.visit(ci(0));
        state.visit(ci(2));

        assert_eq!(state.path(), &[ci(0), ci(2)]);
        assert!(state.is_visited(ci(2)));
        assert!(!state.is_visited(ci(1)));
        assert_eq!(state.last_city(), Some(ci(2)));
        assert_eq!(state.start_city(), Some(ci(0)));

        state.unvisit(ci(2));
        assert!(!state.is_visited(ci(2)));
        assert_eq!(state.last_city(), Some(ci(0)));
    }

    #[test]
    fn test_complete_detection() {
        let mut state = SearchState::<i64>::new(2);
        state.visit(ci(0));
        assert!(!state.is_complete());
        state.visit(ci(1));
        assert!(state.is_complete());
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut state = SearchState::<i64>::new(3);
        state.visit(ci(1));
        state.set_current_cost(42);
        state.reset();

        assert_eq!(state.num_visited(), 0);
        assert_eq!(state.current_cost(), 0);
        assert!(!state.is_visited(ci(1)));
    }

    #[test]
    #[should_panic(expected = "already visited")]
    fn test_double_visit_panics() {
        let mut state = SearchState::<i64>::new(2);
        state.visit(ci(1));
        state.visit(ci(1));
    }

    #[test]
    #[should_panic(expected = "not the most recent visit")]
    fn test_out_of_order_unvisit_panics() {
        let mut state = SearchState::<i64>::new(3);
        state.visit(ci(0));
        state.visit(ci(1));
        state.unvisit(ci(0));
    }

    #[test]
    fn test_display() {
        let mut state = SearchState::<i64>::new(5);
        state.visit(ci(0));
        state.set_current_cost(7);
        assert_eq!(format!("{}", state), "SearchState(visited: 1/5, cost: 7)");
    }
}
