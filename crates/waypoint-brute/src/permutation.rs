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

//! In-place permutation enumeration.
//!
//! The enumerator reuses one backing slice for every ordering: it swaps an
//! element into the current position, recurses on the remainder, and swaps
//! back before returning. Auxiliary state is the recursion stack only, so
//! visiting all orderings of `n` elements needs `O(n)` extra space.

/// Invokes `visit` once for every ordering of `elements[start..]`, keeping
/// `elements[..start]` fixed in place.
///
/// Each invocation sees the full slice; the prefix is untouched. After the
/// call returns, the slice is restored to its original order.
pub fn for_each_permutation_from<T, F>(elements: &mut [T], start: usize, visit: &mut F)
where
    F: FnMut(&[T]),
{
    if start >= elements.len() {
        visit(elements);
        return;
    }

    for i in start..elements.len() {
        elements.swap(start, i);
        for_each_permutation_from(elements, start + 1, visit);
        elements.swap(start, i);
    }
}

/// Invokes `visit` once for every ordering of the whole slice.
#[inline]
pub fn for_each_permutation<T, F>(elements: &mut [T], visit: &mut F)
where
    F: FnMut(&[T]),
{
    for_each_permutation_from(elements, 0, visit);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn factorial(n: u64) -> u64 {
        (1..=n).product()
    }

    #[test]
    fn test_counts_all_orderings() {
        for n in 0..6usize {
            let mut elements: Vec<usize> = (0..n).collect();
            let mut count = 0u64;
            for_each_permutation(&mut elements, &mut |_| count += 1);
            assert_eq!(count, factorial(n as u64).max(1), "n = {}", n);
        }
    }

    #[test]
    fn test_orderings_are_distinct() {
        let mut elements = vec![0usize, 1, 2, 3];
        let mut seen = HashSet::new();
        for_each_permutation(&mut elements, &mut |perm| {
            assert!(seen.insert(perm.to_vec()), "duplicate ordering {:?}", perm);
        });
        assert_eq!(seen.len(), 24);
    }

    #[test]
    fn test_fixed_prefix_is_kept() {
        let mut elements = vec![9usize, 1, 2, 3];
        let mut count = 0u64;
        for_each_permutation_from(&mut elements, 1, &mut |perm| {
            assert_eq!(perm[0], 9);
            count += 1;
        });
        assert_eq!(count, 6);
    }

    #[test]
    fn test_slice_is_restored() {
        let mut elements = vec![3usize, 1, 4, 1, 5];
        let original = elements.clone();
        for_each_permutation(&mut elements, &mut |_| {});
        assert_eq!(elements, original);
    }

    #[test]
    fn test_first_visit_is_identity_order() {
        let mut elements = vec![0usize, 1, 2];
        let mut first = None;
        for_each_permutation(&mut elements, &mut |perm| {
            if first.is_none() {
                first = Some(perm.to_vec());
            }
        });
        assert_eq!(first.unwrap(), vec![0, 1, 2]);
    }
}
