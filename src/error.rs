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

use std::error::Error;
use std::fmt;

/// An error indicating that a string is not a valid decimal number.
#[derive(Debug, Eq, PartialEq)]
pub struct ParseDecimalError;

impl fmt::Display for ParseDecimalError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("invalid decimal syntax")
    }
}

impl Error for ParseDecimalError {}

/// An error indicating that a decimal number cannot be represented in the
/// requested primitive type.
///
/// Conversions fail if the number is a NaN or infinity, does not fit in the
/// target type, or has a nonzero fractional part. Fractional values are never
/// silently truncated.
#[derive(Debug, Eq, PartialEq)]
pub struct TryFromDecimalError;

impl fmt::Display for TryFromDecimalError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("decimal cannot be represented in target type")
    }
}

impl Error for TryFromDecimalError {}

/// An exceptional condition surfaced by the [`Throw`](crate::Throw) hook.
///
/// The `Throw` hook reacts to the four error conditions by raising a panic
/// whose payload is the corresponding `ConditionError` variant; callers that
/// want to recover can downcast the payload of
/// [`std::panic::catch_unwind`].
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ConditionError {
    /// A division had a zero divisor.
    DivisionByZero,
    /// An operation had no meaningful result, e.g. `∞ − ∞` or a malformed
    /// string conversion.
    InvalidOperation,
    /// A result's exponent exceeded the hook's maximum exponent.
    Overflow,
    /// A result lost digits below the hook's minimum exponent.
    Underflow,
}

impl fmt::Display for ConditionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConditionError::DivisionByZero => f.write_str("division by zero"),
            ConditionError::InvalidOperation => f.write_str("invalid operation"),
            ConditionError::Overflow => f.write_str("overflow"),
            ConditionError::Underflow => f.write_str("underflow"),
        }
    }
}

impl Error for ConditionError {}
