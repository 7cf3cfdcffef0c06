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

//! # Waypoint Model
//!
//! **The Core Domain Model for the Waypoint Traveling Salesman Solvers.**
//!
//! This crate defines the data structures used to represent a TSP instance:
//! a directed, fully-connected cost matrix over `n` cities, the closed tours
//! produced by the solvers, and the size estimates used to decide whether an
//! exact search is even worth attempting. It is the data interchange layer
//! between problem input and the solving engines.
//!
//! ## Architecture
//!
//! * **`index`**: The strongly-typed `CityIndex` wrapper, preventing city
//!   indices from being mixed with raw offsets.
//! * **`matrix`**: The `CostMatrix` (immutable, flat row-major layout for
//!   cache-friendly edge lookups) and `CostMatrixBuilder` (mutable,
//!   validating).
//! * **`tour`**: The `Tour` output format, a closed city permutation with its
//!   total cost.
//! * **`complexity`**: `SearchSpace`, a log-space estimate of the permutation
//!   tree, used for scale guards and progress reporting.
//! * **`loading`**: A whitespace-delimited instance parser.
//!
//! ## Design Philosophy
//!
//! 1.  **Fail-Fast**: The builder validates non-negativity and accumulator
//!     capacity eagerly, so the solvers never see a matrix that could wrap
//!     an exact cost.
//! 2.  **Memory Layout**: The matrix is one flat vector, not a vector of
//!     rows, so the inner loops of bound evaluation stay on one cache line
//!     per row.

pub mod complexity;
pub mod index;
pub mod loading;
pub mod matrix;
pub mod tour;
