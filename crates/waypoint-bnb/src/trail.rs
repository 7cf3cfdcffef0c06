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

use crate::state::SearchState;
use num_traits::PrimInt;
use waypoint_core::num::constants::Zero;
use waypoint_model::index::CityIndex;

/// A compact record of a single visit applied to the search state.
///
/// `TrailEntry` captures what is needed to undo one descent: the city that
/// was appended to the path and the accumulated cost before the move. It is
/// stored in a linear log and consumed in reverse on backtrack.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TrailEntry<T> {
    previous_cost: T,
    city: CityIndex,
}

impl<T> TrailEntry<T>
where
    T: Copy,
{
    /// Returns the accumulated path cost before the visit.
    #[inline]
    pub fn previous_cost(&self) -> T {
        self.previous_cost
    }

    /// Returns the city that was visited.
    #[inline]
    pub fn city(&self) -> CityIndex {
        self.city
    }
}

impl<T> std::fmt::Display for TrailEntry<T>
where
    T: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "TrailEntry(city: {}, previous_cost: {})",
            self.city.get(),
            self.previous_cost
        )
    }
}

/// A linear undo log with frame markers for efficient backtracking.
///
/// `SearchTrail` records every visit applied to a `SearchState` together
/// with frame boundaries, so popping a frame restores the state to exactly
/// where the frame was opened. Typical usage:
/// 1. Call `push_frame()` before descending into a node,
/// 2. Apply the descent with `apply_visit(...)`,
/// 3. On prune or exhaustion, call `backtrack(state)`.
#[derive(Debug, Clone, Default)]
pub struct SearchTrail<T> {
    /// The linear history of all visits applied to the state.
    entries: Vec<TrailEntry<T>>,
    /// `frames[i]` stores the index in `entries` where depth `i` began.
    frames: Vec<usize>,
}

impl<T> SearchTrail<T> {
    /// Creates a new, empty `SearchTrail`.
    #[inline]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            frames: Vec::new(),
        }
    }

    /// Creates a new `SearchTrail` preallocating space for an instance with
    /// `num_cities` cities. A descent applies one visit per level, so
    /// `num_cities` entries and `num_cities + 1` frames suffice.
    #[inline]
    pub fn preallocated(num_cities: usize) -> Self {
        Self {
            entries: Vec::with_capacity(num_cities),
            frames: Vec::with_capacity(num_cities + 1),
        }
    }

    /// Ensures the trail has capacity for the given instance size.
    pub fn ensure_capacity(&mut self, num_cities: usize) {
        if self.entries.capacity() < num_cities {
            self.entries.reserve(num_cities - self.entries.capacity());
        }
        if self.frames.capacity() < num_cities + 1 {
            self.frames
                .reserve((num_cities + 1) - self.frames.capacity());
        }
    }

    /// Returns the number of entries in the trail.
    #[inline]
    pub fn num_entries(&self) -> usize {
        self.entries.len()
    }

    /// Returns the number of frames (depth) in the trail.
    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Returns `true` if there are no frames tracked.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Pushes a new frame onto the trail, marking the start of a new
    /// decision level.
    #[inline]
    pub fn push_frame(&mut self) {
        self.frames.push(self.entries.len());
    }

    /// Applies a visit to the search state and records the undo entry.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `city` is out of bounds or already
    /// visited.
    pub fn apply_visit(&mut self, state: &mut SearchState<T>, city: CityIndex, new_cost: T)
    where
        T: PrimInt + Zero,
    {
        debug_assert!(
            city.get() < state.num_cities(),
            "called `SearchTrail::apply_visit` with city index out of bounds: the len is {} but the index is {}",
            state.num_cities(),
            city.get()
        );
        debug_assert!(
            !state.is_visited(city),
            "called `SearchTrail::apply_visit` with city {} which is already visited",
            city.get()
        );

        self.entries.push(TrailEntry {
            previous_cost: state.current_cost(),
            city,
        });

        state.visit(city);
        state.set_current_cost(new_cost);
    }

    /// Backtracks to the previous frame, undoing all visits made since then.
    pub fn backtrack(&mut self, state: &mut SearchState<T>)
    where
        T: PrimInt + Zero,
    {
        let start = match self.frames.pop() {
            Some(s) => s,
            None => return,
        };

        while self.entries.len() > start {
            debug_assert!(
                !self.entries.is_empty(),
                "called `SearchTrail::backtrack` on an empty trail"
            );

            let entry = unsafe { self.entries.pop().unwrap_unchecked() };
            state.unvisit(entry.city);
            state.set_current_cost(entry.previous_cost);
        }
    }

    /// Resets the trail markers without undoing any state changes.
    #[inline]
    pub fn reset(&mut self) {
        self.entries.clear();
        self.frames.clear();
    }

    /// Returns the total allocated memory in bytes.
    #[inline]
    pub fn allocated_memory_bytes(&self) -> usize {
        let entries_size = self.entries.capacity() * std::mem::size_of::<TrailEntry<T>>();
        let frames_size = self.frames.capacity() * std::mem::size_of::<usize>();
        entries_size + frames_size
    }

    /// Returns an iterator over all trail entries.
    #[inline]
    pub fn iter_entries(&self) -> std::slice::Iter<'_, TrailEntry<T>> {
        self.entries.iter()
    }
}

impl<T> std::fmt::Display for SearchTrail<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SearchTrail(entries: {}, frames: {})",
            self.entries.len(),
            self.frames.len()
        )
    }
}
