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

use waypoint_model::index::CityIndex;

/// A frame-structured LIFO stack of candidate cities.
///
/// Each frame holds the unexplored candidate extensions of one tree level.
/// `push_frame` opens a level, `pop` consumes candidates of the current
/// level, and `pop_frame` discards whatever the level has left when the
/// engine backtracks.
///
/// Candidates are pushed in decreasing index order so that popping yields
/// them in ascending order, which keeps the expansion deterministic.
#[derive(Debug, Clone, Default)]
pub struct CandidateStack {
    /// All candidate entries across all open frames.
    entries: Vec<CityIndex>,
    /// `frames[i]` stores the index in `entries` where level `i` began.
    frames: Vec<usize>,
}

impl CandidateStack {
    /// Creates a new, empty `CandidateStack`.
    #[inline]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            frames: Vec::new(),
        }
    }

    /// Creates a new `CandidateStack` preallocating space for an instance
    /// with `num_cities` cities.
    ///
    /// At depth `d` a level holds at most `num_cities - d` candidates, so a
    /// full descent needs at most `num_cities * (num_cities + 1) / 2`
    /// entries and `num_cities + 1` frames.
    #[inline]
    pub fn preallocated(num_cities: usize) -> Self {
        let entry_capacity = num_cities * (num_cities + 1) / 2;
        let frame_capacity = num_cities + 1;

        Self {
            entries: Vec::with_capacity(entry_capacity),
            frames: Vec::with_capacity(frame_capacity),
        }
    }

    /// Ensures the stack has capacity for the given instance size.
    pub fn ensure_capacity(&mut self, num_cities: usize) {
        let entry_capacity = num_cities * (num_cities + 1) / 2;
        let frame_capacity = num_cities + 1;

        if self.entries.capacity() < entry_capacity {
            self.entries
                .reserve(entry_capacity - self.entries.capacity());
        }
        if self.frames.capacity() < frame_capacity {
            self.frames.reserve(frame_capacity - self.frames.capacity());
        }
    }

    /// Returns the total number of candidate entries across all frames.
    #[inline]
    pub fn num_entries(&self) -> usize {
        self.entries.len()
    }

    /// Returns the number of open frames (the depth of the search).
    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Returns `true` if no frame is open.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Opens a new frame. Candidates pushed afterwards belong to this frame
    /// until it is popped.
    #[inline]
    pub fn push_frame(&mut self) {
        self.frames.push(self.entries.len());
    }

    /// Closes the current frame, discarding its remaining candidates.
    #[inline]
    pub fn pop_frame(&mut self) {
        if let Some(start) = self.frames.pop() {
            self.entries.truncate(start);
        }
    }

    /// Pushes a candidate onto the current frame.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if no frame is open.
    #[inline]
    pub fn push(&mut self, city: CityIndex) {
        debug_assert!(
            !self.frames.is_empty(),
            "called `CandidateStack::push` with no open frame"
        );
        self.entries.push(city);
    }

    /// Pops the next candidate of the current frame, or `None` if the
    /// current frame is exhausted.
    #[inline]
    pub fn pop(&mut self) -> Option<CityIndex> {
        if self.is_current_level_empty() {
            return None;
        }
        self.entries.pop()
    }

    /// Returns the start index of the current frame in the entry log.
    #[inline]
    fn current_level_start(&self) -> usize {
        self.frames.last().copied().unwrap_or(0)
    }

    /// Returns the candidates of the current frame, oldest first.
    #[inline]
    pub fn current_frame_entries(&self) -> &[CityIndex] {
        &self.entries[self.current_level_start()..]
    }

    /// Returns `true` if the current frame has no candidates left.
    #[inline]
    pub fn is_current_level_empty(&self) -> bool {
        self.entries.len() == self.current_level_start()
    }

    /// Clears all frames and entries, keeping the allocated capacity.
    #[inline]
    pub fn reset(&mut self) {
        self.entries.clear();
        self.frames.clear();
    }

    /// Returns the total allocated memory in bytes.
    #[inline]
    pub fn allocated_memory_bytes(&self) -> usize {
        let entries_size = self.entries.capacity() * std::mem::size_of::<CityIndex>();
        let frames_size = self.frames.capacity() * std::mem::size_of::<usize>();
        entries_size + frames_size
    }
}

impl std::fmt::Display for CandidateStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "CandidateStack(entries: {}, frames: {})",
            self.entries.len(),
            self.frames.len()
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
    fn test_new_stack_is_empty() {
        let stack = CandidateStack::new();
        assert!(stack.is_empty());
        assert_eq!(stack.num_entries(), 0);
        assert_eq!(stack.depth(), 0);
        assert!(stack.is_current_level_empty());
    }

    #[test]
    fn test_push_pop_within_frame() {
        let mut stack = CandidateStack::new();
        stack.push_frame();
        stack.push(ci(3));
        stack.push(ci(2));
        stack.push(ci(1));

        // LIFO: pushing in decreasing order pops in ascending order.
        assert_eq!(stack.pop(), Some(ci(1)));
        assert_eq!(stack.pop(), Some(ci(2)));
        assert_eq!(stack.pop(), Some(ci(3)));
        assert_eq!(stack.pop(), None);
    }

    #[test]
    fn test_pop_does_not_cross_frame_boundary() {
        let mut stack = CandidateStack::new();
        stack.push_frame();
        stack.push(ci(5));
        stack.push_frame();
        stack.push(ci(7));

        assert_eq!(stack.pop(), Some(ci(7)));
        // The outer frame's entry is not visible from the inner frame.
        assert_eq!(stack.pop(), None);
        assert!(stack.is_current_level_empty());

        stack.pop_frame();
        assert_eq!(stack.pop(), Some(ci(5)));
    }

    #[test]
    fn test_pop_frame_discards_leftovers() {
        let mut stack = CandidateStack::new();
        stack.push_frame();
        stack.push(ci(0));
        stack.push_frame();
        stack.push(ci(1));
        stack.push(ci(2));

        stack.pop_frame();
        assert_eq!(stack.num_entries(), 1);
        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.current_frame_entries(), &[ci(0)]);
    }

    #[test]
    fn test_current_frame_entries() {
        let mut stack = CandidateStack::new();
        stack.push_frame();
        stack.push(ci(9));
        stack.push_frame();
        stack.push(ci(4));
        stack.push(ci(3));

        assert_eq!(stack.current_frame_entries(), &[ci(4), ci(3)]);
    }

    #[test]
    fn test_reset_keeps_capacity() {
        let mut stack = CandidateStack::preallocated(8);
        let bytes_before = stack.allocated_memory_bytes();
        stack.push_frame();
        stack.push(ci(1));
        stack.reset();

        assert!(stack.is_empty());
        assert_eq!(stack.num_entries(), 0);
        assert_eq!(stack.allocated_memory_bytes(), bytes_before);
    }

    #[test]
    fn test_preallocated_capacity_is_sufficient() {
        let stack = CandidateStack::preallocated(4);
        // 4 + 3 + 2 + 1 entries for a full descent.
        assert!(stack.allocated_memory_bytes() >= 10 * std::mem::size_of::<CityIndex>());
    }

    #[test]
    fn test_display() {
        let mut stack = CandidateStack::new();
        stack.push_frame();
        stack.push(ci(0));
        assert_eq!(format!("{}", stack), "CandidateStack(entries: 1, frames: 1)");
    }
}
