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
use std::time::{Duration, Instant};
use waypoint_core::num::ops::saturating_arithmetic::SaturatingAddVal;
use waypoint_model::{index::CityIndex, matrix::CostMatrix, tour::Tour};
use waypoint_search::monitor::search_monitor::SearchCommand;

/// A monitor that terminates the search after a specified duration.
///
/// Checks the clock only every `check_interval` steps to minimize overhead.
pub struct TimeLimitMonitor<T>
where
    T: PrimInt + Signed,
{
    time_limit: Duration,
    start_time: Option<Instant>,
    check_interval: u64,
    ops_since_last_check: u64,
    _marker: PhantomData<T>,
}

impl<T> TimeLimitMonitor<T>
where
    T: PrimInt + Signed,
{
    /// Creates a new `TimeLimitMonitor` with the specified duration and
    /// check interval. `check_interval` specifies how many steps to take
    /// between time checks. A higher value reduces overhead but may lead to
    /// slightly exceeding the time limit.
    pub fn new(duration: Duration, check_interval: u64) -> Self {
        Self {
            time_limit: duration,
            start_time: None,
            check_interval,
            ops_since_last_check: 0,
            _marker: PhantomData,
        }
    }

    /// Creates a new `TimeLimitMonitor` with the specified duration and a
    /// default check interval of 10,000.
    pub fn with_default_check_interval(duration: Duration) -> Self {
        Self::new(duration, 10_000)
    }
}

impl<T> TreeSearchMonitor<T> for TimeLimitMonitor<T>
where
    T: PrimInt + Signed,
{
    fn name(&self) -> &str {
        "TimeLimitMonitor"
    }

    fn on_enter_search(&mut self, _matrix: &CostMatrix<T>, _statistics: &BnbStatistics<T>) {
        self.start_time = Some(Instant::now());
        self.ops_since_last_check = 0;
    }

    fn on_exit_search(&mut self, _statistics: &BnbStatistics<T>) {
        self.start_time = None;
    }

    fn search_command(
        &mut self,
        _state: &SearchState<T>,
        _statistics: &BnbStatistics<T>,
    ) -> SearchCommand {
        self.ops_since_last_check = self.ops_since_last_check.saturating_add_val(1);

        if self.ops_since_last_check >= self.check_interval {
            self.ops_since_last_check = 0;

            if let Some(start) = self.start_time {
                if start.elapsed() > self.time_limit {
                    return SearchCommand::Terminate(format!(
                        "Time limit of {:?} exceeded",
                        self.time_limit
                    ));
                }
            }
        }

        SearchCommand::Continue
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
    fn test_zero_limit_terminates_after_interval() {
        let mut monitor = TimeLimitMonitor::<i64>::new(Duration::ZERO, 2);
        let matrix = CostMatrix::from_rows(vec![vec![0, 1], vec![1, 0]]).unwrap();
        let state = SearchState::<i64>::new(2);
        let stats = BnbStatistics::default();

        monitor.on_enter_search(&matrix, &stats);
        // First call is below the check interval.
        assert_eq!(
            monitor.search_command(&state, &stats),
            SearchCommand::Continue
        );
        // Second call crosses it and observes the expired limit.
        assert!(matches!(
            monitor.search_command(&state, &stats),
            SearchCommand::Terminate(_)
        ));
    }

    #[test]
    fn test_generous_limit_continues() {
        let mut monitor = TimeLimitMonitor::<i64>::new(Duration::from_secs(3600), 1);
        let matrix = CostMatrix::from_rows(vec![vec![0, 1], vec![1, 0]]).unwrap();
        let state = SearchState::<i64>::new(2);
        let stats = BnbStatistics::default();

        monitor.on_enter_search(&matrix, &stats);
        assert_eq!(
            monitor.search_command(&state, &stats),
            SearchCommand::Continue
        );
    }
}
