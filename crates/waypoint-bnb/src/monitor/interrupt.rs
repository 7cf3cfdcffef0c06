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

use crate::{
    monitor::tree_search_monitor::{PruneReason, TreeSearchMonitor},
    state::SearchState,
    stats::BnbStatistics,
};
use num_traits::{PrimInt, Signed};
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};
use waypoint_model::{index::CityIndex, matrix::CostMatrix, tour::Tour};
use waypoint_search::monitor::search_monitor::SearchCommand;

/// A monitor that terminates the search when an external flag is raised.
///
/// The flag is typically shared with a signal handler or a controlling
/// thread; the monitor only ever reads it with relaxed ordering.
pub struct InterruptMonitor<'a, T>
where
    T: PrimInt + Signed,
{
    flag: &'a AtomicBool,
    _marker: PhantomData<T>,
}

impl<'a, T> InterruptMonitor<'a, T>
where
    T: PrimInt + Signed,
{
    /// Creates a new `InterruptMonitor` observing the given flag.
    #[inline]
    pub fn new(flag: &'a AtomicBool) -> Self {
        Self {
            flag,
            _marker: PhantomData,
        }
    }
}

impl<'a, T> TreeSearchMonitor<T> for InterruptMonitor<'a, T>
where
    T: PrimInt + Signed,
{
    fn name(&self) -> &str {
        "InterruptMonitor"
    }

    fn on_enter_search(&mut self, _matrix: &CostMatrix<T>, _statistics: &BnbStatistics<T>) {}

    fn on_exit_search(&mut self, _statistics: &BnbStatistics<T>) {}

    fn search_command(
        &mut self,
        _state: &SearchState<T>,
        _statistics: &BnbStatistics<T>,
    ) -> SearchCommand {
        if self.flag.load(Ordering::Relaxed) {
            SearchCommand::Terminate("Interrupted".to_string())
        } else {
            SearchCommand::Continue
        }
    }

    fn on_step(&mut self, _state: &SearchState<T>, _statistics: &BnbStatistics<T>) {}

    fn on_lower_bound_computed(
        &mut self,
        _state: &SearchState<T>,
        _lower_bound: T,
        _estimated_remaining: T,
        _statistics: &BnbStatistics<T>,
    ) {
    }

    fn on_prune(
        &mut self,
        _state: &SearchState<T>,
        _reason: PruneReason,
        _statistics: &BnbStatistics<T>,
    ) {
    }

    fn on_decisions_enqueued(
        &mut self,
        _state: &SearchState<T>,
        _count: usize,
        _statistics: &BnbStatistics<T>,
    ) {
    }

    fn on_descend(
        &mut self,
        _state: &SearchState<T>,
        _city: CityIndex,
        _statistics: &BnbStatistics<T>,
    ) {
    }

    fn on_backtrack(&mut self, _state: &SearchState<T>, _statistics: &BnbStatistics<T>) {}

    fn on_solution_found(&mut self, _tour: &Tour<T>, _statistics: &BnbStatistics<T>) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_controls_command() {
        let flag = AtomicBool::new(false);
        let mut monitor = InterruptMonitor::<i64>::new(&flag);
        let state = SearchState::<i64>::new(2);
        let stats = BnbStatistics::default();

        assert_eq!(
            monitor.search_command(&state, &stats),
            SearchCommand::Continue
        );

        flag.store(true, Ordering::Relaxed);
        assert_eq!(
            monitor.search_command(&state, &stats),
            SearchCommand::Terminate("Interrupted".to_string())
        );
    }
}
