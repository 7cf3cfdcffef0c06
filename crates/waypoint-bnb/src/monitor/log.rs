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
use std::time::{Duration, Instant};
use waypoint_core::num::constants::Zero;
use waypoint_model::{index::CityIndex, matrix::CostMatrix, tour::Tour};

/// A monitor that prints a progress table while the search runs.
///
/// The clock is checked only when the node counter matches
/// `clock_check_mask`, so the hot loop stays cheap; a line is printed at
/// most once per `log_interval`.
#[derive(Debug, Clone)]
pub struct LogMonitor<T>
where
    T: std::fmt::Display + std::fmt::Debug + PrimInt + Signed,
{
    start_time: Instant,
    last_log_time: Instant,
    log_interval: Duration,
    clock_check_mask: u64,
    best_cost: Option<T>,
}

impl<T> LogMonitor<T>
where
    T: std::fmt::Display + std::fmt::Debug + PrimInt + Signed + Zero,
{
    pub fn new(log_interval: Duration, clock_check_mask: u64) -> Self {
        Self {
            start_time: Instant::now(),
            last_log_time: Instant::now(),
            log_interval,
            clock_check_mask,
            best_cost: None,
        }
    }

    #[inline(always)]
    fn print_header(&self) {
        println!(
            "{:<9} | {:<14} | {:<7} | {:<14} | {:<14} | {:<10} | {:<13}",
            "Elapsed", "Nodes", "Depth", "Best Cost", "Current Cost", "Backtracks", "Pruned"
        );
        println!("{}", "-".repeat(98));
    }

    #[inline(always)]
    fn log_line(&mut self, state: &SearchState<T>, stats: &BnbStatistics<T>) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.start_time).as_secs_f32();

        let best_cost_str = match &self.best_cost {
            Some(cost) => format!("{}", cost),
            None => "Inf".to_string(),
        };

        let elapsed_field = format!("{:.1}s", elapsed);

        println!(
            "{:<9} | {:<14} | {:<7} | {:<14} | {:<14} | {:<10} | {:<13}",
            elapsed_field,
            stats.nodes_explored,
            state.num_visited(),
            best_cost_str,
            state.current_cost(),
            stats.backtracks,
            stats.total_prunings()
        );

        self.last_log_time = now;
    }
}

impl<T> Default for LogMonitor<T>
where
    T: std::fmt::Display + std::fmt::Debug + PrimInt + Signed + Zero,
{
    fn default() -> Self {
        Self::new(Duration::from_secs(1), (1 << 20) - 1)
    }
}

impl<T> std::fmt::Display for LogMonitor<T>
where
    T: std::fmt::Display + std::fmt::Debug + PrimInt + Signed,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "LogMonitor(log_interval: {}s, clock_check_mask: {})",
            self.log_interval.as_secs(),
            self.clock_check_mask
        )
    }
}

impl<T> TreeSearchMonitor<T> for LogMonitor<T>
where
    T: std::fmt::Display + std::fmt::Debug + PrimInt + Signed + Zero,
{
    fn name(&self) -> &str {
        "LogMonitor"
    }

    fn on_enter_search(&mut self, _matrix: &CostMatrix<T>, _statistics: &BnbStatistics<T>) {
        self.start_time = Instant::now();
        self.last_log_time = self.start_time;
        self.best_cost = None;
        self.print_header();
    }

    fn on_exit_search(&mut self, statistics: &BnbStatistics<T>) {
        println!("{}", "-".repeat(98));
        println!(
            "Search finished: {} nodes, {} pruned.",
            statistics.nodes_explored,
            statistics.total_prunings()
        );
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

    fn on_descend(&mut self, state: &SearchState<T>, _city: CityIndex, statistics: &BnbStatistics<T>) {
        if (statistics.nodes_explored & self.clock_check_mask) == 0
            && self.last_log_time.elapsed() >= self.log_interval
        {
            self.log_line(state, statistics);
        }
    }

    fn on_backtrack(&mut self, _state: &SearchState<T>, _statistics: &BnbStatistics<T>) {}

    fn on_solution_found(&mut self, tour: &Tour<T>, _statistics: &BnbStatistics<T>) {
        self.best_cost = Some(tour.total_cost());
    }
}
