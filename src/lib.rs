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

//! decten is an exact base-10 arithmetic library for Rust.
//!
//! # Introduction
//!
//! Binary floating-point numbers can only approximate most decimal
//! numbers: the value 0.1, for example, needs an infinitely recurring
//! binary fraction. Financial and accounting computations — and any other
//! computation whose results must match those calculated by hand — need a
//! number system that represents one tenth exactly, as 10<sup>-1</sup>.
//!
//! decten is a pure-Rust implementation of the arithmetic, rounding,
//! comparison, conversion, and formatting behavior described by the
//! General Decimal Arithmetic standard, whose latest draft is available
//! online at <http://speleotrove.com/decimal/decarith.html>.
//!
//! The main types exposed by this library are:
//!
//!  * [`Decimal`], a base-10 floating-point number of the form
//!    `(-1)^sign · coefficient · 10^exponent`, together with the special
//!    values signed zero, signed infinity, and NaN. Every value carries
//!    the eight condition flags of the operation that produced it.
//!
//!  * [`Hook`], the compile-time policy that parameterises a `Decimal`:
//!    the working precision, the [`Rounding`] algorithm, the exponent
//!    bounds, and an optional reaction to each exceptional condition.
//!    The prebuilt hooks are [`NoOp`] (flags only, the default),
//!    [`Abort`] (error conditions halt the process), [`Throw`] (error
//!    conditions panic with a typed [`ConditionError`]), and
//!    [`HighPrecision`] (abort semantics with 64 digits).
//!
//!  * [`Status`], the set of condition flags recorded on each value.
//!
//! # Examples
//!
//! The following example demonstrates the basic usage of the library:
//!
//! ```
//! # use std::error::Error;
//! use decten::Decimal;
//!
//! let x: Decimal = ".1".parse()?;
//! let y: Decimal = ".2".parse()?;
//! let z: Decimal = ".3".parse()?;
//!
//! assert_eq!(&x + &y, z);
//! assert_eq!((&z / &x).to_string(), "3");
//! # Ok::<_, Box<dyn Error>>(())
//! ```
//!
//! Exceptional conditions never abort an evaluation chain by default;
//! they are recorded as flags on the result, so arithmetic can continue
//! through NaNs and infinities:
//!
//! ```
//! use decten::Decimal;
//!
//! let q: Decimal = Decimal::parse("1") / Decimal::parse("0");
//! assert_eq!(q.to_string(), "Infinity");
//! assert!(q.status().division_by_zero());
//!
//! let d = q - Decimal::infinity();
//! assert!(d.is_nan());
//! assert!(d.status().invalid_operation());
//! ```
//!
//! Arithmetic is governed by the left operand's hook:
//!
//! ```
//! use decten::{Decimal, Hook, Rounding};
//!
//! struct Coarse;
//!
//! impl Hook for Coarse {
//!     const PRECISION: u32 = 3;
//!     const ROUNDING: Rounding = Rounding::HalfUp;
//! }
//!
//! let lhs = Decimal::<Coarse>::parse("0.999E-2");
//! let rhs = Decimal::<Coarse>::parse("0.1E-2");
//! let sum = lhs + rhs;
//! assert_eq!(sum.to_string(), "0.0110");
//! assert!(sum.status().inexact());
//! assert!(sum.status().rounded());
//! ```

#![deny(missing_debug_implementations, missing_docs)]

mod arith;
mod coefficient;
mod decimal;
mod error;
mod hook;
mod parse;
mod round;

pub use decimal::Decimal;
pub use error::{ConditionError, ParseDecimalError, TryFromDecimalError};
pub use hook::{Abort, HighPrecision, Hook, NoOp, Rounding, Status, Throw};
