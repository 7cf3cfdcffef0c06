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

use crate::index::CityIndex;
use num_traits::{PrimInt, Signed};

/// A closed tour: a permutation of all cities together with its total cost,
/// including the edge closing the cycle back to the first city.
///
/// The city list stores each city exactly once; the closing edge is implied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tour<T> {
    /// The total cycle cost of this tour.
    total_cost: T,

    /// The visit order. `cities[0]` is the tour's start city; origin-fixed
    /// searches always place the origin there.
    cities: Vec<CityIndex>,
}

impl<T> Tour<T>
where
    T: PrimInt + Signed + Copy,
{
    /// Constructs a new `Tour`.
    ///
    /// # Panics
    ///
    /// Panics if `cities` is empty or is not a permutation of
    /// `0..cities.len()`.
    pub fn new(total_cost: T, cities: Vec<CityIndex>) -> Self {
        assert!(
            !cities.is_empty(),
            "called Tour::new with an empty city list"
        );

        let n = cities.len();
        let mut seen = vec![false; n];
        for &city in &cities {
            assert!(
                city.get() < n,
                "called Tour::new with city index out of bounds: the len is {} but the index is {}",
                n,
                city.get()
            );
            assert!(
                !seen[city.get()],
                "called Tour::new with duplicate city index {}",
                city.get()
            );
            seen[city.get()] = true;
        }

        Self { total_cost, cities }
    }

    /// Returns the total cycle cost of this tour.
    #[inline]
    pub fn total_cost(&self) -> T {
        self.total_cost
    }

    /// Returns the visit order.
    #[inline]
    pub fn cities(&self) -> &[CityIndex] {
        &self.cities
    }

    /// Returns the number of cities in this tour.
    #[inline]
    pub fn num_cities(&self) -> usize {
        self.cities.len()
    }

    /// Returns the city the tour starts (and implicitly ends) at.
    #[inline]
    pub fn start(&self) -> CityIndex {
        self.cities[0]
    }
}

impl<T> std::fmt::Display for Tour<T>
where
    T: PrimInt + Signed + Copy + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Tour Summary")?;
        writeln!(f, "   Total Cost: {}", self.total_cost)?;
        writeln!(f)?;

        writeln!(f, "   {:<10} | {:<10}", "Step", "City")?;
        writeln!(f, "   {:-<10}-+-{:-<10}", "", "")?;
        for (step, city) in self.cities.iter().enumerate() {
            writeln!(f, "   {:<10} | {:<10}", step, city.get())?;
        }
        writeln!(
            f,
            "   {:<10} | {:<10}",
            self.cities.len(),
            self.cities[0].get()
        )?;

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
    fn test_new_and_accessors() {
        let tour = Tour::new(80i64, vec![ci(0), ci(1), ci(3), ci(2)]);
        assert_eq!(tour.total_cost(), 80);
        assert_eq!(tour.num_cities(), 4);
        assert_eq!(tour.start(), ci(0));
        assert_eq!(tour.cities(), &[ci(0), ci(1), ci(3), ci(2)]);
    }

    #[test]
    fn test_single_city_tour() {
        let tour = Tour::new(0i64, vec![ci(0)]);
        assert_eq!(tour.total_cost(), 0);
        assert_eq!(tour.cities(), &[ci(0)]);
    }

    #[test]
    #[should_panic(expected = "called Tour::new with an empty city list")]
    fn test_empty_tour_panics() {
        let _ = Tour::new(0i64, Vec::new());
    }

    #[test]
    #[should_panic(expected = "called Tour::new with duplicate city index 1")]
    fn test_duplicate_city_panics() {
        let _ = Tour::new(0i64, vec![ci(0), ci(1), ci(1)]);
    }

    #[test]
    #[should_panic(expected = "called Tour::new with city index out of bounds")]
    fn test_out_of_bounds_city_panics() {
        let _ = Tour::new(0i64, vec![ci(0), ci(5)]);
    }

    #[test]
    fn test_display_closes_the_cycle() {
        let tour = Tour::new(12i64, vec![ci(0), ci(2), ci(1)]);
        let displayed = format!("{}", tour);
        // The last printed step returns to the start city.
        assert!(displayed.contains("Total Cost: 12"));
        let last_line = displayed.lines().last().unwrap();
        assert!(last_line.contains('3'));
        assert!(last_line.contains('0'));
    }
}
