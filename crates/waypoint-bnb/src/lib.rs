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

//! Waypoint‑BnB: branch‑and‑bound for the traveling salesman problem
//!
//! Implements a deterministic depth‑first branch‑and‑bound solver over a
//! `waypoint_model::matrix::CostMatrix<T>`. The solver separates bounding,
//! monitoring, and outcome reporting so strategies can be swapped without
//! touching the core search loop.
//!
//! Core flow
//! - Provide a validated `CostMatrix<T>`.
//! - Choose a `bound::BoundEstimator` (admissible lower bounds).
//! - Optionally attach monitors (time limits, logging, interrupts).
//! - Run `bnb::BnbSolver` and inspect the returned `result::BnbOutcome`.
//!
//! Design highlights
//! - Tight inner loop: the partial tour is mutated in place and restored via
//!   a trail; no per-node allocation once the engine is warmed up.
//! - Deterministic: candidate cities are expanded in ascending index order,
//!   so runs are reproducible node for node.
//! - Lower bounds must be admissible (no overestimation); pruning relies on
//!   this for correctness.
//!
//! Module map
//! - `bnb`: the solver engine and session orchestration.
//! - `bound`: the bounding interface and the minimum-edge estimator.
//! - `monitor`: tree‑search monitors (log, time limit, interrupt, composite).
//! - `result`: solver outcomes with termination reasons.
//! - `state`: the mutable partial-tour state.
//! - `stats`: lightweight counters/timing.

pub mod bnb;
pub mod bound;
pub mod monitor;
pub mod result;
mod stack;
pub mod state;
pub mod stats;
mod trail;
