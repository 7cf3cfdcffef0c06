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

//! # Solver Numeric Trait
//!
//! Unified numeric bounds for the solving engines. `SolverNumeric` collects
//! the integer capabilities every cost type needs: intrinsic traits
//! (`PrimInt`, `Signed`), the constant traits from `waypoint_core`, and
//! by-value checked/saturating arithmetic.
//!
//! Exact search should stay generic over integer width while keeping one
//! overflow policy everywhere, so the bounds live in a single alias instead
//! of being repeated on every engine signature.
//!
//! Note: `i128` is intentionally excluded for performance reasons.

use num_traits::{FromPrimitive, PrimInt, Signed};
use waypoint_core::num::{
    constants::{PlusOne, Zero},
    ops::{checked_arithmetic, saturating_arithmetic},
};

/// A trait alias for numeric types that can be used as tour costs.
/// These are usually the signed integer types `i8`, `i16`, `i32`, `i64`
/// and `isize`.
///
/// # Note
///
/// `i128` is intentionally excluded due to performance reasons, as it is
/// significantly slower on many platforms.
pub trait SolverNumeric:
    PrimInt
    + Signed
    + FromPrimitive
    + std::fmt::Debug
    + std::fmt::Display
    + Zero
    + PlusOne
    + saturating_arithmetic::SaturatingAddVal
    + saturating_arithmetic::SaturatingMulVal
    + checked_arithmetic::CheckedAddVal
    + checked_arithmetic::CheckedMulVal
    + Send
    + Sync
{
}

impl<T> SolverNumeric for T where
    T: PrimInt
        + Signed
        + FromPrimitive
        + std::fmt::Debug
        + std::fmt::Display
        + Zero
        + PlusOne
        + saturating_arithmetic::SaturatingAddVal
        + saturating_arithmetic::SaturatingMulVal
        + checked_arithmetic::CheckedAddVal
        + checked_arithmetic::CheckedMulVal
        + Send
        + Sync
{
}
