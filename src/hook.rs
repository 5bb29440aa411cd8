// Copyright the decten authors. All rights reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository, or online at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt;
use std::process;

use crate::decimal::Decimal;
use crate::error::ConditionError;

/// A compile-time policy for decimal operations.
///
/// A hook serves two purposes:
///
///   * It configures the properties of decimal arithmetic: the working
///     precision, the rounding algorithm, and the exponent bounds.
///
///   * It reacts to exceptional conditions. Each of the eight condition
///     flags has a corresponding callback which an implementation may
///     override; the default for every callback is to do nothing, leaving
///     the flag on the result as the only record of the condition.
///
/// Every operation consults exactly one hook — the left operand's — and its
/// result carries that hook. Callbacks run synchronously on the calling
/// thread, after the result (including the flag for the offending
/// condition) is fully populated, so a callback may inspect the value it
/// receives.
///
/// The default constants give nine digits of precision, half-up rounding,
/// and exponent bounds of ±999.
///
/// # Examples
///
/// A policy for high-precision bookkeeping that rounds half-to-even:
///
/// ```
/// use decten::{Decimal, Hook, Rounding};
///
/// struct Ledger;
///
/// impl Hook for Ledger {
///     const PRECISION: u32 = 34;
///     const ROUNDING: Rounding = Rounding::HalfEven;
/// }
///
/// let gross = Decimal::<Ledger>::parse("1234.565");
/// let fee = Decimal::<Ledger>::parse("-0.005");
/// assert_eq!((gross + fee).to_string(), "1234.560");
/// ```
pub trait Hook: Sized + 'static {
    /// The maximum number of coefficient digits a result may hold.
    ///
    /// Must be at least two. Checked at runtime on every construction until
    /// constant generic bounds can express the restriction.
    const PRECISION: u32 = 9;

    /// The rounding algorithm applied when a result exceeds
    /// [`PRECISION`](Hook::PRECISION) digits.
    const ROUNDING: Rounding = Rounding::HalfUp;

    /// The largest exponent a finite result may carry.
    const MAX_EXPONENT: i64 = 999;

    /// The smallest exponent a finite result may carry.
    ///
    /// Must be less than [`MAX_EXPONENT`](Hook::MAX_EXPONENT).
    const MIN_EXPONENT: i64 = -999;

    /// Reacts to a result whose exponent was altered to fit the exponent
    /// bounds.
    fn on_clamped(result: &Decimal<Self>) {
        let _ = result;
    }

    /// Reacts to a division by zero.
    fn on_division_by_zero(result: &Decimal<Self>) {
        let _ = result;
    }

    /// Reacts to a result that lost nonzero digits to rounding.
    fn on_inexact(result: &Decimal<Self>) {
        let _ = result;
    }

    /// Reacts to an operation with no meaningful result.
    fn on_invalid_operation(result: &Decimal<Self>) {
        let _ = result;
    }

    /// Reacts to a result whose exponent exceeded the maximum.
    fn on_overflow(result: &Decimal<Self>) {
        let _ = result;
    }

    /// Reacts to a result that had digits discarded, zero or not.
    fn on_rounded(result: &Decimal<Self>) {
        let _ = result;
    }

    /// Reacts to a subnormal result.
    fn on_subnormal(result: &Decimal<Self>) {
        let _ = result;
    }

    /// Reacts to a subnormal result that was also inexact.
    fn on_underflow(result: &Decimal<Self>) {
        let _ = result;
    }
}

/// A hook that records conditions as flags and does nothing else.
///
/// This is the default hook of [`Decimal`].
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct NoOp;

impl Hook for NoOp {}

/// A hook that halts the process on the four error conditions.
///
/// Division by zero, invalid operations, overflow, and underflow print a
/// diagnostic to stderr and abort. The informational conditions (clamped,
/// inexact, rounded, subnormal) only set flags.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct Abort;

impl Hook for Abort {
    fn on_division_by_zero(_result: &Decimal<Self>) {
        halt(ConditionError::DivisionByZero)
    }

    fn on_invalid_operation(_result: &Decimal<Self>) {
        halt(ConditionError::InvalidOperation)
    }

    fn on_overflow(_result: &Decimal<Self>) {
        halt(ConditionError::Overflow)
    }

    fn on_underflow(_result: &Decimal<Self>) {
        halt(ConditionError::Underflow)
    }
}

/// A hook that panics on the four error conditions.
///
/// Division by zero, invalid operations, overflow, and underflow raise a
/// panic whose payload is the corresponding [`ConditionError`], so the
/// failure can be surfaced like an exception and recovered with
/// [`std::panic::catch_unwind`]. The informational conditions only set
/// flags.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct Throw;

impl Hook for Throw {
    fn on_division_by_zero(_result: &Decimal<Self>) {
        std::panic::panic_any(ConditionError::DivisionByZero)
    }

    fn on_invalid_operation(_result: &Decimal<Self>) {
        std::panic::panic_any(ConditionError::InvalidOperation)
    }

    fn on_overflow(_result: &Decimal<Self>) {
        std::panic::panic_any(ConditionError::Overflow)
    }

    fn on_underflow(_result: &Decimal<Self>) {
        std::panic::panic_any(ConditionError::Underflow)
    }
}

/// An [`Abort`]-style hook with 64 digits of precision.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct HighPrecision;

impl Hook for HighPrecision {
    const PRECISION: u32 = 64;

    fn on_division_by_zero(_result: &Decimal<Self>) {
        halt(ConditionError::DivisionByZero)
    }

    fn on_invalid_operation(_result: &Decimal<Self>) {
        halt(ConditionError::InvalidOperation)
    }

    fn on_overflow(_result: &Decimal<Self>) {
        halt(ConditionError::Overflow)
    }

    fn on_underflow(_result: &Decimal<Self>) {
        halt(ConditionError::Underflow)
    }
}

fn halt(condition: ConditionError) -> ! {
    eprintln!("fatal decimal condition: {}", condition);
    process::abort();
}

/// Invokes the hook callback for every flag set on `result`.
///
/// Inexact fires before rounded; the error conditions fire before either.
pub(crate) fn fire<H>(result: &Decimal<H>)
where
    H: Hook,
{
    let status = result.status();
    if status.division_by_zero() {
        H::on_division_by_zero(result);
    }
    if status.invalid_operation() {
        H::on_invalid_operation(result);
    }
    if status.overflow() {
        H::on_overflow(result);
    }
    if status.subnormal() {
        H::on_subnormal(result);
    }
    if status.underflow() {
        H::on_underflow(result);
    }
    if status.clamped() {
        H::on_clamped(result);
    }
    if status.inexact() {
        H::on_inexact(result);
    }
    if status.rounded() {
        H::on_rounded(result);
    }
}

/// Panics unless the hook's constants are coherent.
// TODO: express `PRECISION >= 2` as a compile-time bound once constant
// generic expressions allow it.
pub(crate) fn validate_hook<H>()
where
    H: Hook,
{
    if H::PRECISION < 2 {
        panic!("Hook::PRECISION must be at least 2");
    }
    if H::MIN_EXPONENT >= H::MAX_EXPONENT {
        panic!("Hook::MIN_EXPONENT must be less than Hook::MAX_EXPONENT");
    }
}

/// Algorithms for rounding decimal numbers.
///
/// The rounding modes are precisely defined in [The Arithmetic Model][model]
/// chapter of the General Decimal Arithmetic specification.
///
/// [model]: http://speleotrove.com/decimal/damodel.html
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Rounding {
    /// Round towards positive infinity.
    Ceiling,
    /// Round towards zero (truncation).
    Down,
    /// Round towards negative infinity.
    Floor,
    /// Round to nearest; if equidistant, round down.
    HalfDown,
    /// Round to nearest; if equidistant, round so that the final digit is even.
    HalfEven,
    /// Round to nearest; if equidistant, round up.
    HalfUp,
    /// Round away from zero.
    Up,
    /// The same as [`Rounding::Up`], except that rounding up only occurs
    /// if the digit to be rounded up is 0 or 5.
    ///
    /// After overflow the result is the same as for [`Rounding::Down`].
    ZeroFiveUp,
}

impl Default for Rounding {
    fn default() -> Rounding {
        Rounding::HalfUp
    }
}

/// Represents exceptional conditions resulting from operations on decimal
/// numbers.
///
/// Every operation stamps a fresh status onto its result; the flags record
/// the conditions of that computation only. For details about the
/// conditions themselves, consult the [Exceptional Conditions][conditions]
/// chapter of the General Decimal Arithmetic specification.
///
/// [conditions]: http://speleotrove.com/decimal/daexcep.html
#[derive(Clone, Copy, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Status {
    inner: u8,
}

const CLAMPED: u8 = 1 << 0;
const DIVISION_BY_ZERO: u8 = 1 << 1;
const INEXACT: u8 = 1 << 2;
const INVALID_OPERATION: u8 = 1 << 3;
const OVERFLOW: u8 = 1 << 4;
const ROUNDED: u8 = 1 << 5;
const SUBNORMAL: u8 = 1 << 6;
const UNDERFLOW: u8 = 1 << 7;

impl fmt::Debug for Status {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Status")
            .field("clamped", &self.clamped())
            .field("division_by_zero", &self.division_by_zero())
            .field("inexact", &self.inexact())
            .field("invalid_operation", &self.invalid_operation())
            .field("overflow", &self.overflow())
            .field("rounded", &self.rounded())
            .field("subnormal", &self.subnormal())
            .field("underflow", &self.underflow())
            .finish()
    }
}

impl Status {
    /// Reports whether any of the condition flags are set.
    pub fn any(&self) -> bool {
        self.inner != 0
    }

    /// Reports whether the clamped flag is set.
    ///
    /// Operations set this flag when the exponent of a result has been
    /// altered to fit the hook's exponent bounds.
    pub fn clamped(&self) -> bool {
        self.inner & CLAMPED != 0
    }

    /// Sets `self`'s clamped flag.
    pub fn set_clamped(&mut self) {
        self.inner |= CLAMPED;
    }

    /// Reports whether the division by zero flag is set.
    ///
    /// Operations set this flag when a dividend is divided by zero.
    pub fn division_by_zero(&self) -> bool {
        self.inner & DIVISION_BY_ZERO != 0
    }

    /// Sets `self`'s division by zero flag.
    pub fn set_division_by_zero(&mut self) {
        self.inner |= DIVISION_BY_ZERO;
    }

    /// Reports whether the inexact flag is set.
    ///
    /// Operations set this flag when one or more nonzero coefficient digits
    /// were discarded during rounding of a result.
    pub fn inexact(&self) -> bool {
        self.inner & INEXACT != 0
    }

    /// Sets `self`'s inexact flag.
    pub fn set_inexact(&mut self) {
        self.inner |= INEXACT;
    }

    /// Reports whether the invalid operation flag is set.
    ///
    /// Various operations set this flag in response to invalid arguments.
    pub fn invalid_operation(&self) -> bool {
        self.inner & INVALID_OPERATION != 0
    }

    /// Sets `self`'s invalid operation flag.
    pub fn set_invalid_operation(&mut self) {
        self.inner |= INVALID_OPERATION;
    }

    /// Reports whether the overflow flag is set.
    ///
    /// Operations set this flag when the exponent of a result is too large
    /// to be represented.
    pub fn overflow(&self) -> bool {
        self.inner & OVERFLOW != 0
    }

    /// Sets `self`'s overflow flag.
    pub fn set_overflow(&mut self) {
        self.inner |= OVERFLOW;
    }

    /// Reports whether the rounded flag is set.
    ///
    /// Operations set this flag when one or more zero or nonzero
    /// coefficient digits were discarded from a result.
    pub fn rounded(&self) -> bool {
        self.inner & ROUNDED != 0
    }

    /// Sets `self`'s rounded flag.
    pub fn set_rounded(&mut self) {
        self.inner |= ROUNDED;
    }

    /// Reports whether the subnormal flag is set.
    ///
    /// Operations set this flag when a result's exponent fell below the
    /// hook's minimum exponent before rounding.
    pub fn subnormal(&self) -> bool {
        self.inner & SUBNORMAL != 0
    }

    /// Sets `self`'s subnormal flag.
    pub fn set_subnormal(&mut self) {
        self.inner |= SUBNORMAL;
    }

    /// Reports whether the underflow flag is set.
    ///
    /// Operations set this flag when a result is both subnormal and
    /// inexact.
    pub fn underflow(&self) -> bool {
        self.inner & UNDERFLOW != 0
    }

    /// Sets `self`'s underflow flag.
    pub fn set_underflow(&mut self) {
        self.inner |= UNDERFLOW;
    }

    pub(crate) fn clear(&mut self) {
        self.inner = 0;
    }
}

impl Default for Status {
    fn default() -> Self {
        Status { inner: 0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_flags_are_independent() {
        let mut status = Status::default();
        assert!(!status.any());

        status.set_inexact();
        status.set_rounded();
        assert!(status.any());
        assert!(status.inexact());
        assert!(status.rounded());
        assert!(!status.invalid_operation());
        assert!(!status.overflow());

        status.clear();
        assert!(!status.any());
    }
}
