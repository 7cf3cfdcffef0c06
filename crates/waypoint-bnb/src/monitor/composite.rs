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

//! Monitoring combinators for tree search
//!
//! Provides `CompositeTreeSearchMonitor`, a fan‑out monitor that forwards
//! every event to its children. This lets you mix logging, time limits, and
//! early stopping without coupling them to the solver.
//!
//! Behavior
//! - Events are dispatched to child monitors in insertion order.
//! - `search_command` short‑circuits on the first non‑`Continue` response;
//!   put stricter stop conditions first.
//! - Other callbacks always fan out to all children.

use crate::{
    monitor::tree_search_monitor::{PruneReason, TreeSearchMonitor},
    state::SearchState,
    stats::BnbStatistics,
};
use num_traits::{PrimInt, Signed};
use waypoint_model::{index::CityIndex, matrix::CostMatrix, tour::Tour};
use waypoint_search::monitor::search_monitor::SearchCommand;

/// A tree search monitor that aggregates multiple monitors and forwards
/// events to all of them.
pub struct CompositeTreeSearchMonitor<'a, T>
where
    T: PrimInt + Signed,
{
    monitors: Vec<Box<dyn TreeSearchMonitor<T> + 'a>>,
}

impl<'a, T> Default for CompositeTreeSearchMonitor<'a, T>
where
    T: PrimInt + Signed,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> CompositeTreeSearchMonitor<'a, T>
where
    T: PrimInt + Signed,
{
    /// Creates a new empty `CompositeTreeSearchMonitor`.
    #[inline(always)]
    pub fn new() -> Self {
        Self {
            monitors: Vec::new(),
        }
    }

    /// Creates a new `CompositeTreeSearchMonitor` with the specified
    /// capacity.
    #[inline(always)]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            monitors: Vec::with_capacity(capacity),
        }
    }

    /// Adds a new monitor to the composite monitor.
    #[inline(always)]
    pub fn add_monitor<M>(&mut self, monitor: M)
    where
        M: TreeSearchMonitor<T> + 'a,
    {
        self.monitors.push(Box::new(monitor));
    }

    /// Adds a boxed monitor to the composite monitor.
    #[inline(always)]
    pub fn add_monitor_boxed(&mut self, monitor: Box<dyn TreeSearchMonitor<T> + 'a>) {
        self.monitors.push(monitor);
    }

    /// Returns the number of monitors contained in the composite monitor.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    /// Returns `true` if the composite monitor contains no monitors.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }

    /// Clears all monitors from the composite monitor.
    #[inline(always)]
    pub fn clear(&mut self) {
        self.monitors.clear();
    }
}

impl<'a, T> TreeSearchMonitor<T> for CompositeTreeSearchMonitor<'a, T>
where
    T: PrimInt + Signed,
{
    fn name(&self) -> &str {
        "CompositeTreeSearchMonitor"
    }

    fn on_enter_search(&mut self, matrix: &CostMatrix<T>, statistics: &BnbStatistics<T>) {
        for monitor in self.monitors.iter_mut() {
            monitor.on_enter_search(matrix, statistics);
        }
    }

    fn on_exit_search(&mut self, statistics: &BnbStatistics<T>) {
        for monitor in self.monitors.iter_mut() {
            monitor.on_exit_search(statistics);
        }
    }

    fn search_command(
        &mut self,
        state: &SearchState<T>,
        statistics: &BnbStatistics<T>,
    ) -> SearchCommand {
        for monitor in self.monitors.iter_mut() {
            let command = monitor.search_command(state, statistics);
            if command != SearchCommand::Continue {
                return command;
            }
        }
        SearchCommand::Continue
    }

    fn on_step(&mut self, state: &SearchState<T>, statistics: &BnbStatistics<T>) {
        for monitor in self.monitors.iter_mut() {
            monitor.on_step(state, statistics);
        }
    }

    fn on_lower_bound_computed(
        &mut self,
        state: &SearchState<T>,
        lower_bound: T,
        estimated_remaining: T,
        statistics: &BnbStatistics<T>,
    ) {
        for monitor in self.monitors.iter_mut() {
            monitor.on_lower_bound_computed(state, lower_bound, estimated_remaining, statistics);
        }
    }

    fn on_prune(
        &mut self,
        state: &SearchState<T>,
        reason: PruneReason,
        statistics: &BnbStatistics<T>,
    ) {
        for monitor in self.monitors.iter_mut() {
            monitor.on_prune(state, reason, statistics);
        }
    }

    fn on_decisions_enqueued(
        &mut self,
        state: &SearchState<T>,
        count: usize,
        statistics: &BnbStatistics<T>,
    ) {
        for monitor in self.monitors.iter_mut() {
            monitor.on_decisions_enqueued(state, count, statistics);
        }
    }

    fn on_descend(&mut self, state: &SearchState<T>, city: CityIndex, statistics: &BnbStatistics<T>) {
        for monitor in self.monitors.iter_mut() {
            monitor.on_descend(state, city, statistics);
        }
    }

    fn on_backtrack(&mut self, state: &SearchState<T>, statistics: &BnbStatistics<T>) {
        for monitor in self.monitors.iter_mut() {
            monitor.on_backtrack(state, statistics);
        }
    }

    fn on_solution_found(&mut self, tour: &Tour<T>, statistics: &BnbStatistics<T>) {
        for monitor in self.monitors.iter_mut() {
            monitor.on_solution_found(tour, statistics);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::no_op::NoOperationMonitor;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct FlagMonitor<'a> {
        stop: &'a AtomicBool,
        steps: u64,
    }

    impl<'a> TreeSearchMonitor<i64> for FlagMonitor<'a> {
        fn name(&self) -> &str {
            "FlagMonitor"
        }
        fn on_enter_search(&mut self, _: &CostMatrix<i64>, _: &BnbStatistics<i64>) {}
        fn on_exit_search(&mut self, _: &BnbStatistics<i64>) {}
        fn search_command(
            &mut self,
            _: &SearchState<i64>,
            _: &BnbStatistics<i64>,
        ) -> SearchCommand {
            if self.stop.load(Ordering::Relaxed) {
                SearchCommand::Terminate("flagged".to_string())
            } else {
                SearchCommand::Continue
            }
        }
        fn on_step(&mut self, _: &SearchState<i64>, _: &BnbStatistics<i64>) {
            self.steps += 1;
        }
        fn on_lower_bound_computed(
            &mut self,
            _: &SearchState<i64>,
            _: i64,
            _: i64,
            _: &BnbStatistics<i64>,
        ) {
        }
        fn on_prune(&mut self, _: &SearchState<i64>, _: PruneReason, _: &BnbStatistics<i64>) {}
        fn on_decisions_enqueued(&mut self, _: &SearchState<i64>, _: usize, _: &BnbStatistics<i64>) {
        }
        fn on_descend(&mut self, _: &SearchState<i64>, _: CityIndex, _: &BnbStatistics<i64>) {}
        fn on_backtrack(&mut self, _: &SearchState<i64>, _: &BnbStatistics<i64>) {}
        fn on_solution_found(&mut self, _: &Tour<i64>, _: &BnbStatistics<i64>) {}
    }

    #[test]
    fn test_empty_composite_continues() {
        let mut composite = CompositeTreeSearchMonitor::<i64>::new();
        assert!(composite.is_empty());
        let state = SearchState::<i64>::new(2);
        let stats = BnbStatistics::default();
        assert_eq!(
            composite.search_command(&state, &stats),
            SearchCommand::Continue
        );
    }

    #[test]
    fn test_short_circuit_on_terminate() {
        let stop = AtomicBool::new(true);
        let mut composite = CompositeTreeSearchMonitor::<i64>::new();
        composite.add_monitor(NoOperationMonitor::new());
        composite.add_monitor(FlagMonitor {
            stop: &stop,
            steps: 0,
        });
        assert_eq!(composite.len(), 2);

        let state = SearchState::<i64>::new(2);
        let stats = BnbStatistics::default();
        assert_eq!(
            composite.search_command(&state, &stats),
            SearchCommand::Terminate("flagged".to_string())
        );
    }
}
