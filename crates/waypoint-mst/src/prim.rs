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
use waypoint_core::num::{constants::Zero, ops::saturating_arithmetic::SaturatingAddVal};
use waypoint_model::{
    index::{CityIndex, ORIGIN},
    matrix::CostMatrix,
};

/// A minimum spanning tree over the cities, rooted at the origin.
///
/// Built with the dense-matrix variant of Prim's algorithm: a `key` array
/// holds the cheapest known connection of every outside city to the tree,
/// and each round moves the city with the strictly smallest key inside.
/// Ties keep the lowest index, so construction is deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanningTree<T> {
    parent: Vec<Option<CityIndex>>,
    children: Vec<Vec<CityIndex>>,
    total_weight: T,
}

impl<T> SpanningTree<T>
where
    T: PrimInt + Signed + Zero + SaturatingAddVal,
{
    /// Builds the minimum spanning tree of the given instance.
    ///
    /// Edge weights are read in tree-to-outside direction; the tree is
    /// meaningful for symmetric matrices, which is also what the
    /// approximation guarantee assumes.
    pub fn build(matrix: &CostMatrix<T>) -> Self {
        let n = matrix.num_cities();

        let mut key: Vec<T> = vec![T::max_value(); n];
        let mut in_tree: Vec<bool> = vec![false; n];
        let mut parent: Vec<Option<CityIndex>> = vec![None; n];
        let mut total_weight = T::ZERO;

        key[ORIGIN.get()] = T::ZERO;

        for _ in 0..n {
            // Select the cheapest outside city; strict comparison keeps
            // the lowest index on ties.
            let mut best: Option<usize> = None;
            for (v, &k) in key.iter().enumerate() {
                if in_tree[v] {
                    continue;
                }
                match best {
                    Some(b) if key[b] <= k => {}
                    _ => best = Some(v),
                }
            }

            let u = match best {
                Some(u) => u,
                None => break,
            };

            in_tree[u] = true;
            total_weight = total_weight.saturating_add_val(key[u]);

            for v in 0..n {
                if in_tree[v] || v == u {
                    continue;
                }
                let weight = matrix.cost(CityIndex::new(u), CityIndex::new(v));
                if weight < key[v] {
                    key[v] = weight;
                    parent[v] = Some(CityIndex::new(u));
                }
            }
        }

        // Children lists in increasing index order, since `v` ascends.
        let mut children: Vec<Vec<CityIndex>> = vec![Vec::new(); n];
        for (v, p) in parent.iter().enumerate() {
            if let Some(p) = p {
                children[p.get()].push(CityIndex::new(v));
            }
        }

        Self {
            parent,
            children,
            total_weight,
        }
    }

    /// Returns the number of cities spanned by the tree.
    #[inline]
    pub fn num_cities(&self) -> usize {
        self.parent.len()
    }

    /// Returns the parent of the given city, or `None` for the root.
    #[inline]
    pub fn parent(&self, city: CityIndex) -> Option<CityIndex> {
        self.parent[city.get()]
    }

    /// Returns the children of the given city in increasing index order.
    #[inline]
    pub fn children(&self, city: CityIndex) -> &[CityIndex] {
        &self.children[city.get()]
    }

    /// Returns the sum of all tree edge weights.
    #[inline]
    pub fn total_weight(&self) -> T {
        self.total_weight
    }

    /// Returns the preorder visitation of the tree starting at the origin,
    /// descending into children in increasing index order.
    pub fn preorder(&self) -> Vec<CityIndex> {
        let n = self.parent.len();
        let mut order = Vec::with_capacity(n);
        let mut stack = Vec::with_capacity(n);
        stack.push(ORIGIN);

        while let Some(u) = stack.pop() {
            order.push(u);
            // Reversed so the smallest child is popped first.
            for &child in self.children(u).iter().rev() {
                stack.push(child);
            }
        }

        order
    }
}

impl<T> std::fmt::Display for SpanningTree<T>
where
    T: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SpanningTree(cities: {}, weight: {})",
            self.parent.len(),
            self.total_weight
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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
    fn test_classic_instance_tree() {
        let matrix = classic_matrix();
        let tree = SpanningTree::build(&matrix);

        // Every non-root city hangs directly off the origin here.
        assert_eq!(tree.parent(ci(0)), None);
        assert_eq!(tree.parent(ci(1)), Some(ci(0)));
        assert_eq!(tree.parent(ci(2)), Some(ci(0)));
        assert_eq!(tree.parent(ci(3)), Some(ci(0)));
        assert_eq!(tree.total_weight(), 45);
        assert_eq!(tree.children(ci(0)), &[ci(1), ci(2), ci(3)]);
    }

    #[test]
    fn test_preorder_descends_in_index_order() {
        let matrix = classic_matrix();
        let tree = SpanningTree::build(&matrix);
        assert_eq!(tree.preorder(), vec![ci(0), ci(1), ci(2), ci(3)]);
    }

    #[test]
    fn test_path_instance_forms_a_chain() {
        // Cities on a line at positions 0, 1, 2, 3.
        let matrix = CostMatrix::from_rows(vec![
            vec![0, 1, 2, 3],
            vec![1, 0, 1, 2],
            vec![2, 1, 0, 1],
            vec![3, 2, 1, 0],
        ])
        .unwrap();

        let tree = SpanningTree::build(&matrix);
        assert_eq!(tree.parent(ci(1)), Some(ci(0)));
        assert_eq!(tree.parent(ci(2)), Some(ci(1)));
        assert_eq!(tree.parent(ci(3)), Some(ci(2)));
        assert_eq!(tree.total_weight(), 3);
        assert_eq!(tree.preorder(), vec![ci(0), ci(1), ci(2), ci(3)]);
    }

    #[test]
    fn test_single_city_tree() {
        let matrix = CostMatrix::from_rows(vec![vec![0]]).unwrap();
        let tree = SpanningTree::build(&matrix);

        assert_eq!(tree.num_cities(), 1);
        assert_eq!(tree.parent(ORIGIN), None);
        assert_eq!(tree.total_weight(), 0);
        assert_eq!(tree.preorder(), vec![ORIGIN]);
    }

    #[test]
    fn test_tie_break_keeps_lowest_index() {
        // Cities 1 and 2 both connect to the origin at cost 5; city 1 must
        // enter the tree first and city 2 still hangs off the origin.
        let matrix = CostMatrix::from_rows(vec![
            vec![0, 5, 5],
            vec![5, 0, 9],
            vec![5, 9, 0],
        ])
        .unwrap();

        let tree = SpanningTree::build(&matrix);
        assert_eq!(tree.parent(ci(1)), Some(ci(0)));
        assert_eq!(tree.parent(ci(2)), Some(ci(0)));
        assert_eq!(tree.total_weight(), 10);
    }
}
