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

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::{Product, Sum};
use std::marker::PhantomData;
use std::ops::{
    Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign,
};
use std::str::FromStr;

use num_traits::{One, ToPrimitive, Zero};

use crate::arith;
use crate::coefficient::Coefficient;
use crate::error::{ParseDecimalError, TryFromDecimalError};
use crate::hook::{self, Hook, NoOp, Status};
use crate::parse::{self, Parsed};

/// The value held by a decimal.
///
/// The special values are modelled as their own variants so that a number
/// can never be simultaneously a NaN and an infinity; they carry no
/// coefficient or exponent. The sign lives outside this enum because every
/// kind of value is signed, NaN included.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub(crate) enum Kind {
    Finite {
        coefficient: Coefficient,
        exponent: i64,
    },
    Infinity,
    Nan,
}

/// An exact base-10 number.
///
/// A finite decimal represents `(-1)^sign · coefficient · 10^exponent`; the
/// special values — signed zero, signed infinity, and NaN — follow the
/// General Decimal Arithmetic specification. Every value additionally
/// carries the eight condition flags, which record the exceptional
/// conditions of the operation that produced it (see [`Status`]).
///
/// The `H` type parameter selects the [`Hook`]: the compile-time policy
/// bundle supplying the working precision, the rounding algorithm, the
/// exponent bounds, and the reactions to exceptional conditions. Binary
/// operations accept operands with different hooks; the *left* operand's
/// hook governs the computation and the result carries it.
///
/// `Decimal` overloads the standard arithmetic operators:
///
/// ```
/// use decten::Decimal;
///
/// let x: Decimal = ".1".parse()?;
/// let y: Decimal = ".2".parse()?;
/// let z: Decimal = ".3".parse()?;
///
/// assert_eq!(x + y, z);
/// # Ok::<_, decten::ParseDecimalError>(())
/// ```
///
/// Equality and ordering are *numeric*, not representational: `1` equals
/// `1.00`, and `+0` equals `-0` even though both sides keep their own
/// representation. The order is total — see [`Decimal::total_cmp`] — so
/// decimals can be sorted and used as map keys.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Decimal<H = NoOp>
where
    H: Hook,
{
    pub(crate) negative: bool,
    pub(crate) kind: Kind,
    pub(crate) status: Status,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub(crate) hook: PhantomData<H>,
}

impl<H> Decimal<H>
where
    H: Hook,
{
    fn with_kind(negative: bool, kind: Kind) -> Decimal<H> {
        hook::validate_hook::<H>();
        Decimal {
            negative,
            kind,
            status: Status::default(),
            hook: PhantomData,
        }
    }

    /// Constructs a decimal representing the number 0.
    pub fn zero() -> Decimal<H> {
        Decimal::with_kind(
            false,
            Kind::Finite {
                coefficient: Coefficient::ZERO,
                exponent: 0,
            },
        )
    }

    /// Constructs a decimal representing the number 1.
    pub fn one() -> Decimal<H> {
        Decimal::with_kind(
            false,
            Kind::Finite {
                coefficient: Coefficient::ONE,
                exponent: 0,
            },
        )
    }

    /// Constructs a decimal representing positive infinity.
    pub fn infinity() -> Decimal<H> {
        Decimal::with_kind(false, Kind::Infinity)
    }

    /// Constructs a decimal representing a quiet NaN.
    pub fn nan() -> Decimal<H> {
        Decimal::with_kind(false, Kind::Nan)
    }

    /// Constructs the largest finite decimal the hook can represent,
    /// `(10^P − 1) · 10^MAX_EXPONENT`.
    pub fn max() -> Decimal<H> {
        Decimal::with_kind(
            false,
            Kind::Finite {
                coefficient: Coefficient::pow10(H::PRECISION).sub(&Coefficient::ONE),
                exponent: H::MAX_EXPONENT,
            },
        )
    }

    /// Constructs the negative number of least magnitude the hook can
    /// represent, `−1 · 10^MIN_EXPONENT`.
    pub fn min() -> Decimal<H> {
        Decimal::with_kind(
            true,
            Kind::Finite {
                coefficient: Coefficient::ONE,
                exponent: H::MIN_EXPONENT,
            },
        )
    }

    /// Parses a number from its string representation.
    ///
    /// This is a total function: a string that does not match the numeric
    /// grammar produces a quiet NaN whose `invalid-operation` flag is set
    /// (and fires the hook's reaction to that condition). Use the
    /// [`FromStr`] implementation to surface malformed input as an error
    /// instead.
    ///
    /// # Examples
    ///
    /// ```
    /// use decten::Decimal;
    ///
    /// let d: Decimal = Decimal::parse("1.25");
    /// assert_eq!(d.to_string(), "1.25");
    ///
    /// let d: Decimal = Decimal::parse("bogus");
    /// assert!(d.is_nan());
    /// assert!(d.status().invalid_operation());
    /// ```
    pub fn parse<S>(s: S) -> Decimal<H>
    where
        S: AsRef<str>,
    {
        Decimal::from_chars(s.as_ref().chars())
    }

    /// Parses a number from a sequence of characters.
    ///
    /// Semantics are identical to [`Decimal::parse`]; this entry point
    /// serves streaming inputs that are not already a string.
    pub fn from_chars<I>(chars: I) -> Decimal<H>
    where
        I: IntoIterator<Item = char>,
    {
        hook::validate_hook::<H>();
        match parse::to_number(chars) {
            Ok(parsed) => Decimal::from_parsed(parsed),
            Err(()) => arith::invalid_nan(false),
        }
    }

    fn from_parsed(parsed: Parsed) -> Decimal<H> {
        match parsed {
            Parsed::Finite {
                negative,
                coefficient,
                exponent,
            } => arith::finish(negative, coefficient, exponent, false),
            Parsed::Infinity { negative } => Decimal::with_kind(negative, Kind::Infinity),
            Parsed::Nan { negative } => Decimal::with_kind(negative, Kind::Nan),
        }
    }

    /// Computes the number of significant digits in the number.
    ///
    /// If the number is zero, infinite, or a NaN, returns 1.
    pub fn digits(&self) -> u32 {
        match &self.kind {
            Kind::Finite { coefficient, .. } => coefficient.digits(),
            Kind::Infinity | Kind::Nan => 1,
        }
    }

    /// Computes the exponent of the number.
    ///
    /// Special values report an exponent of zero.
    pub fn exponent(&self) -> i64 {
        match &self.kind {
            Kind::Finite { exponent, .. } => *exponent,
            Kind::Infinity | Kind::Nan => 0,
        }
    }

    /// Reports whether the number is finite.
    ///
    /// A finite number is one that is neither infinite nor a NaN.
    pub fn is_finite(&self) -> bool {
        matches!(self.kind, Kind::Finite { .. })
    }

    /// Reports whether the number is positive or negative infinity.
    pub fn is_infinite(&self) -> bool {
        matches!(self.kind, Kind::Infinity)
    }

    /// Reports whether the number is a NaN.
    pub fn is_nan(&self) -> bool {
        matches!(self.kind, Kind::Nan)
    }

    /// Reports whether the number has a special value.
    ///
    /// A special value is either infinity or NaN. This is the inverse of
    /// [`Decimal::is_finite`].
    pub fn is_special(&self) -> bool {
        !self.is_finite()
    }

    /// Reports whether the number has a sign of one.
    ///
    /// Note that negative zero and NaN with a sign of one are negative by
    /// this definition.
    pub fn is_negative(&self) -> bool {
        self.negative
    }

    /// Reports whether the number is positive or negative zero.
    pub fn is_zero(&self) -> bool {
        match &self.kind {
            Kind::Finite { coefficient, .. } => coefficient.is_zero(),
            Kind::Infinity | Kind::Nan => false,
        }
    }

    /// Returns the condition flags recorded on this number.
    ///
    /// The flags describe the operation that produced the value; they are
    /// not inherited from operands.
    pub fn status(&self) -> Status {
        self.status
    }

    /// Clears the condition flags recorded on this number.
    pub fn clear_status(&mut self) {
        self.status.clear();
    }

    /// Computes the absolute value, clearing the sign of any value, NaN
    /// and zero included.
    ///
    /// The result carries a fresh (empty) set of condition flags.
    pub fn abs(&self) -> Decimal<H> {
        Decimal {
            negative: false,
            kind: self.kind.clone(),
            status: Status::default(),
            hook: PhantomData,
        }
    }

    /// Converts the number to a boolean: `true` iff its magnitude is at
    /// least one, or it is a NaN or infinity.
    ///
    /// # Examples
    ///
    /// ```
    /// use decten::{Decimal, NoOp};
    ///
    /// assert!(!Decimal::<NoOp>::parse("0.5").to_bool());
    /// assert!(!Decimal::<NoOp>::parse("-0").to_bool());
    /// assert!(Decimal::<NoOp>::parse("1.00").to_bool());
    /// assert!(Decimal::<NoOp>::parse("-17").to_bool());
    /// assert!(Decimal::<NoOp>::parse("NaN").to_bool());
    /// ```
    pub fn to_bool(&self) -> bool {
        match &self.kind {
            Kind::Infinity | Kind::Nan => true,
            Kind::Finite {
                coefficient,
                exponent,
            } => {
                !coefficient.is_zero()
                    && exponent.saturating_add(i64::from(coefficient.digits())) > 0
            }
        }
    }

    /// Determines the ordering of this number relative to `rhs` under the
    /// total order
    /// `−∞ < −NaN < NaN < every finite number < +∞`.
    ///
    /// Finite numbers are compared by numeric value, so distinct
    /// representations of one value are equal and `+0` equals `−0`. The
    /// operands may carry different hooks.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::cmp::Ordering;
    /// use decten::Decimal;
    ///
    /// let neg_inf: Decimal = Decimal::parse("-Infinity");
    /// let neg_nan: Decimal = Decimal::parse("-NaN");
    /// assert_eq!(neg_inf.total_cmp(&neg_nan), Ordering::Less);
    ///
    /// let a: Decimal = Decimal::parse("22.000");
    /// let b: Decimal = Decimal::parse("22");
    /// assert_eq!(a.total_cmp(&b), Ordering::Equal);
    /// ```
    pub fn total_cmp<R>(&self, rhs: &Decimal<R>) -> Ordering
    where
        R: Hook,
    {
        arith::total_cmp(self, rhs)
    }

    /// Adds `rhs` to this number.
    ///
    /// Unlike the `+` operator, the operands may carry different hooks:
    /// this number's hook governs the computation and the result carries
    /// it, whatever precision `rhs` was computed under.
    ///
    /// # Examples
    ///
    /// ```
    /// use decten::{Decimal, Hook};
    ///
    /// struct Coarse;
    ///
    /// impl Hook for Coarse {
    ///     const PRECISION: u32 = 2;
    /// }
    ///
    /// let fine: Decimal = "10.2345".parse()?;
    /// let coarse = Decimal::<Coarse>::parse("1");
    ///
    /// assert_eq!(fine.add(&coarse).to_string(), "11.2345");
    /// assert_eq!(coarse.add(&fine).to_string(), "11");
    /// # Ok::<_, decten::ParseDecimalError>(())
    /// ```
    pub fn add<R>(&self, rhs: &Decimal<R>) -> Decimal<H>
    where
        R: Hook,
    {
        arith::add_op(self, rhs)
    }

    /// Subtracts `rhs` from this number.
    ///
    /// Like [`Decimal::add`], the operands may carry different hooks.
    pub fn sub<R>(&self, rhs: &Decimal<R>) -> Decimal<H>
    where
        R: Hook,
    {
        arith::sub_op(self, rhs)
    }

    /// Multiplies this number by `rhs`.
    ///
    /// Like [`Decimal::add`], the operands may carry different hooks.
    pub fn mul<R>(&self, rhs: &Decimal<R>) -> Decimal<H>
    where
        R: Hook,
    {
        arith::mul(self, rhs)
    }

    /// Divides this number by `rhs`.
    ///
    /// Like [`Decimal::add`], the operands may carry different hooks.
    pub fn div<R>(&self, rhs: &Decimal<R>) -> Decimal<H>
    where
        R: Hook,
    {
        arith::div(self, rhs)
    }

    /// Returns a string of the number in standard notation, i.e.
    /// guaranteed to not be scientific notation.
    ///
    /// This is the canonical output format: [`Display`](fmt::Display) uses
    /// it too.
    pub fn to_standard_notation_string(&self) -> String {
        match &self.kind {
            Kind::Infinity => {
                if self.negative {
                    "-Infinity".into()
                } else {
                    "Infinity".into()
                }
            }
            Kind::Nan => {
                if self.negative {
                    "-NaN".into()
                } else {
                    "NaN".into()
                }
            }
            Kind::Finite {
                coefficient,
                exponent,
            } => {
                let digits = coefficient.to_decimal_string();
                let mut out = String::with_capacity(digits.len() + 3);
                if self.negative {
                    out.push('-');
                }
                if *exponent >= 0 {
                    // All digits before the decimal point.
                    out.push_str(&digits);
                    if !coefficient.is_zero() {
                        for _ in 0..*exponent {
                            out.push('0');
                        }
                    }
                } else {
                    let fraction = exponent.unsigned_abs() as usize;
                    if digits.len() > fraction {
                        // Digits span the decimal point.
                        let split = digits.len() - fraction;
                        out.push_str(&digits[..split]);
                        out.push('.');
                        out.push_str(&digits[split..]);
                    } else {
                        // All digits after the decimal point.
                        out.push_str("0.");
                        for _ in 0..(fraction - digits.len()) {
                            out.push('0');
                        }
                        out.push_str(&digits);
                    }
                }
                out
            }
        }
    }

    /// The coefficient with trailing zeros stripped onto the exponent, for
    /// hashing one value's many representations alike.
    fn reduced_parts(coefficient: &Coefficient, exponent: i64) -> (Coefficient, i64) {
        let mut coefficient = coefficient.clone();
        let mut exponent = exponent;
        while !coefficient.is_zero() && coefficient.last_digit() == 0 {
            let (stripped, _) = coefficient.div_rem_pow10(1);
            coefficient = stripped;
            exponent += 1;
        }
        (coefficient, exponent)
    }

    /// The signed integral magnitude of the number, if it has one: `None`
    /// for special values, values with a nonzero fractional part, and
    /// magnitudes beyond 2^128.
    fn integral_magnitude(&self) -> Option<u128> {
        match &self.kind {
            Kind::Finite {
                coefficient,
                exponent,
            } => {
                if coefficient.is_zero() {
                    return Some(0);
                }
                if *exponent >= 0 {
                    // u128::MAX has 39 digits; any value scaled by 10^39 or
                    // more is out of reach.
                    if *exponent > 38 {
                        return None;
                    }
                    coefficient.mul_pow10(*exponent as u32).to_u128()
                } else {
                    let fraction = exponent.unsigned_abs();
                    if fraction > u64::from(coefficient.digits()) {
                        return None;
                    }
                    let (integral, fractional) = coefficient.div_rem_pow10(fraction as u32);
                    if fractional.is_zero() {
                        integral.to_u128()
                    } else {
                        None
                    }
                }
            }
            Kind::Infinity | Kind::Nan => None,
        }
    }
}

impl<H> Clone for Decimal<H>
where
    H: Hook,
{
    fn clone(&self) -> Decimal<H> {
        Decimal {
            negative: self.negative,
            kind: self.kind.clone(),
            status: self.status,
            hook: PhantomData,
        }
    }
}

impl<H> Default for Decimal<H>
where
    H: Hook,
{
    fn default() -> Decimal<H> {
        Decimal::zero()
    }
}

impl<H> fmt::Debug for Decimal<H>
where
    H: Hook,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl<H> fmt::Display for Decimal<H>
where
    H: Hook,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.to_standard_notation_string())
    }
}

impl<H> FromStr for Decimal<H>
where
    H: Hook,
{
    type Err = ParseDecimalError;

    fn from_str(s: &str) -> Result<Decimal<H>, ParseDecimalError> {
        hook::validate_hook::<H>();
        match parse::to_number(s.chars()) {
            Ok(parsed) => Ok(Decimal::from_parsed(parsed)),
            Err(()) => Err(ParseDecimalError),
        }
    }
}

/// Converts from an unsigned integer, rounding to the hook's precision
/// like any other construction.
macro_rules! from_unsigned_int {
    ($($t:ty),*) => {$(
        impl<H> From<$t> for Decimal<H>
        where
            H: Hook,
        {
            fn from(n: $t) -> Decimal<H> {
                arith::finish(false, Coefficient::from_u128(n as u128), 0, false)
            }
        }
    )*};
}

/// Like `from_unsigned_int!` but for signed integers.
macro_rules! from_signed_int {
    ($($t:ty),*) => {$(
        impl<H> From<$t> for Decimal<H>
        where
            H: Hook,
        {
            fn from(n: $t) -> Decimal<H> {
                arith::finish(n < 0, Coefficient::from_u128(n.unsigned_abs() as u128), 0, false)
            }
        }
    )*};
}

from_unsigned_int!(u8, u16, u32, u64, u128, usize);
from_signed_int!(i8, i16, i32, i64, i128, isize);

/// Builds a decimal from a binary float by scaling it to an integer, ten
/// times a digit, with the fractional tail bounded at the float's decimal
/// precision. The construction is therefore lossy for values with no short
/// decimal expansion.
fn from_float<H>(n: f64, max_fraction_steps: u32) -> Decimal<H>
where
    H: Hook,
{
    hook::validate_hook::<H>();
    if n.is_nan() {
        return Decimal {
            negative: n.is_sign_negative(),
            kind: Kind::Nan,
            status: Status::default(),
            hook: PhantomData,
        };
    }
    if n.is_infinite() {
        return Decimal {
            negative: n.is_sign_negative(),
            kind: Kind::Infinity,
            status: Status::default(),
            hook: PhantomData,
        };
    }
    let negative = n.is_sign_negative();
    let mut magnitude = n.abs();
    let mut exponent: i64 = 0;
    // Bring small magnitudes up to at least one so the bounded loop below
    // spends its steps on significant digits.
    while magnitude != 0.0 && magnitude < 1.0 {
        magnitude *= 10.0;
        exponent -= 1;
    }
    let mut steps = 0;
    while magnitude.fract() != 0.0 && steps < max_fraction_steps {
        magnitude *= 10.0;
        exponent -= 1;
        steps += 1;
    }
    let coefficient = Coefficient::from_f64(magnitude.trunc())
        .expect("truncated absolute value is a finite non-negative integer");
    arith::finish(negative, coefficient, exponent, false)
}

impl<H> From<f64> for Decimal<H>
where
    H: Hook,
{
    /// Converts a binary float to a decimal.
    ///
    /// The conversion is lossy: most binary fractions have no finite
    /// decimal representation of useful length, so the expansion is cut
    /// off after seventeen fractional digits.
    fn from(n: f64) -> Decimal<H> {
        from_float(n, 17)
    }
}

impl<H> From<f32> for Decimal<H>
where
    H: Hook,
{
    /// Converts a binary float to a decimal.
    ///
    /// The conversion is lossy: most binary fractions have no finite
    /// decimal representation of useful length, so the expansion is cut
    /// off after nine fractional digits.
    fn from(n: f32) -> Decimal<H> {
        from_float(f64::from(n), 9)
    }
}

impl<H> ToPrimitive for Decimal<H>
where
    H: Hook,
{
    fn to_i64(&self) -> Option<i64> {
        self.to_i128().and_then(|n| i64::try_from(n).ok())
    }

    fn to_u64(&self) -> Option<u64> {
        self.to_u128().and_then(|n| u64::try_from(n).ok())
    }

    fn to_i128(&self) -> Option<i128> {
        let magnitude = self.integral_magnitude()?;
        if self.negative {
            match magnitude.cmp(&(1u128 << 127)) {
                Ordering::Less => Some(-(magnitude as i128)),
                Ordering::Equal => Some(i128::MIN),
                Ordering::Greater => None,
            }
        } else {
            i128::try_from(magnitude).ok()
        }
    }

    fn to_u128(&self) -> Option<u128> {
        let magnitude = self.integral_magnitude()?;
        if self.negative && magnitude != 0 {
            None
        } else {
            Some(magnitude)
        }
    }

    fn to_f64(&self) -> Option<f64> {
        match &self.kind {
            Kind::Nan => Some(f64::NAN),
            Kind::Infinity => Some(if self.negative {
                f64::NEG_INFINITY
            } else {
                f64::INFINITY
            }),
            // Routing through the canonical string gets the platform's
            // correctly rounded decimal-to-binary conversion, so values
            // that fit a float round-trip.
            Kind::Finite { .. } => self.to_standard_notation_string().parse().ok(),
        }
    }
}

/// Converts to a primitive integer.
///
/// The conversion is exact-or-error: NaN, infinity, out-of-range values,
/// and values with a nonzero fractional part all fail. Fractional values
/// are never silently truncated.
macro_rules! try_from_decimal {
    ($($t:ty => $via:ident),*) => {$(
        impl<H> TryFrom<&Decimal<H>> for $t
        where
            H: Hook,
        {
            type Error = TryFromDecimalError;

            fn try_from(n: &Decimal<H>) -> Result<$t, TryFromDecimalError> {
                let wide = n.$via().ok_or(TryFromDecimalError)?;
                <$t>::try_from(wide).map_err(|_| TryFromDecimalError)
            }
        }

        impl<H> TryFrom<Decimal<H>> for $t
        where
            H: Hook,
        {
            type Error = TryFromDecimalError;

            fn try_from(n: Decimal<H>) -> Result<$t, TryFromDecimalError> {
                <$t>::try_from(&n)
            }
        }
    )*};
}

try_from_decimal!(
    i8 => to_i128,
    i16 => to_i128,
    i32 => to_i128,
    i64 => to_i128,
    i128 => to_i128,
    isize => to_i128,
    u8 => to_u128,
    u16 => to_u128,
    u32 => to_u128,
    u64 => to_u128,
    u128 => to_u128,
    usize => to_u128
);

impl<L, R> PartialEq<Decimal<R>> for Decimal<L>
where
    L: Hook,
    R: Hook,
{
    fn eq(&self, other: &Decimal<R>) -> bool {
        self.total_cmp(other) == Ordering::Equal
    }
}

impl<H> Eq for Decimal<H> where H: Hook {}

impl<L, R> PartialOrd<Decimal<R>> for Decimal<L>
where
    L: Hook,
    R: Hook,
{
    fn partial_cmp(&self, other: &Decimal<R>) -> Option<Ordering> {
        Some(self.total_cmp(other))
    }
}

impl<H> Ord for Decimal<H>
where
    H: Hook,
{
    fn cmp(&self, other: &Decimal<H>) -> Ordering {
        self.total_cmp(other)
    }
}

impl<H> Hash for Decimal<H>
where
    H: Hook,
{
    fn hash<S>(&self, state: &mut S)
    where
        S: Hasher,
    {
        match &self.kind {
            Kind::Nan => {
                state.write_u8(if self.negative { 1 } else { 2 });
            }
            Kind::Infinity => {
                state.write_u8(if self.negative { 0 } else { 4 });
            }
            Kind::Finite {
                coefficient,
                exponent,
            } => {
                if coefficient.is_zero() {
                    // All zeros are numerically equal, sign and exponent
                    // included.
                    state.write_u8(3);
                } else {
                    state.write_u8(5);
                    self.negative.hash(state);
                    let (coefficient, exponent) =
                        Decimal::<H>::reduced_parts(coefficient, *exponent);
                    exponent.hash(state);
                    coefficient.hash(state);
                }
            }
        }
    }
}

impl<H> Neg for Decimal<H>
where
    H: Hook,
{
    type Output = Decimal<H>;

    /// Flips the sign of a finite nonzero number or an infinity; negating
    /// a NaN or a zero preserves its sign.
    fn neg(mut self) -> Decimal<H> {
        let flip = match &self.kind {
            Kind::Infinity => true,
            Kind::Finite { coefficient, .. } => !coefficient.is_zero(),
            Kind::Nan => false,
        };
        if flip {
            self.negative = !self.negative;
        }
        self.status = Status::default();
        self
    }
}

impl<'a, H> Neg for &'a Decimal<H>
where
    H: Hook,
{
    type Output = Decimal<H>;

    fn neg(self) -> Decimal<H> {
        -self.clone()
    }
}

/// The overloaded operators require both operands to carry the same hook,
/// which lets the right-hand hook be inferred from the left. Operands with
/// different hooks go through the named methods ([`Decimal::add`] and
/// friends), which accept any hook on the right.
macro_rules! binop {
    ($imp:ident, $method:ident, $func:path) => {
        impl<H> $imp<Decimal<H>> for Decimal<H>
        where
            H: Hook,
        {
            type Output = Decimal<H>;

            fn $method(self, rhs: Decimal<H>) -> Decimal<H> {
                $func(&self, &rhs)
            }
        }

        impl<'a, H> $imp<&'a Decimal<H>> for Decimal<H>
        where
            H: Hook,
        {
            type Output = Decimal<H>;

            fn $method(self, rhs: &'a Decimal<H>) -> Decimal<H> {
                $func(&self, rhs)
            }
        }

        impl<'a, H> $imp<Decimal<H>> for &'a Decimal<H>
        where
            H: Hook,
        {
            type Output = Decimal<H>;

            fn $method(self, rhs: Decimal<H>) -> Decimal<H> {
                $func(self, &rhs)
            }
        }

        impl<'a, 'b, H> $imp<&'b Decimal<H>> for &'a Decimal<H>
        where
            H: Hook,
        {
            type Output = Decimal<H>;

            fn $method(self, rhs: &'b Decimal<H>) -> Decimal<H> {
                $func(self, rhs)
            }
        }
    };
}

macro_rules! binop_assign {
    ($imp:ident, $method:ident, $func:path) => {
        impl<H> $imp<Decimal<H>> for Decimal<H>
        where
            H: Hook,
        {
            fn $method(&mut self, rhs: Decimal<H>) {
                *self = $func(self, &rhs);
            }
        }

        impl<'a, H> $imp<&'a Decimal<H>> for Decimal<H>
        where
            H: Hook,
        {
            fn $method(&mut self, rhs: &'a Decimal<H>) {
                *self = $func(self, rhs);
            }
        }
    };
}

binop!(Add, add, arith::add_op);
binop!(Sub, sub, arith::sub_op);
binop!(Mul, mul, arith::mul);
binop!(Div, div, arith::div);
binop_assign!(AddAssign, add_assign, arith::add_op);
binop_assign!(SubAssign, sub_assign, arith::sub_op);
binop_assign!(MulAssign, mul_assign, arith::mul);
binop_assign!(DivAssign, div_assign, arith::div);

impl<H> Sum for Decimal<H>
where
    H: Hook,
{
    fn sum<I>(iter: I) -> Self
    where
        I: Iterator<Item = Decimal<H>>,
    {
        let mut sum = Decimal::zero();
        for d in iter {
            sum = arith::add_op(&sum, &d);
        }
        sum
    }
}

impl<'a, H> Sum<&'a Decimal<H>> for Decimal<H>
where
    H: Hook,
{
    fn sum<I>(iter: I) -> Self
    where
        I: Iterator<Item = &'a Decimal<H>>,
    {
        let mut sum = Decimal::zero();
        for d in iter {
            sum = arith::add_op(&sum, d);
        }
        sum
    }
}

impl<H> Product for Decimal<H>
where
    H: Hook,
{
    fn product<I>(iter: I) -> Self
    where
        I: Iterator<Item = Decimal<H>>,
    {
        let mut product = Decimal::one();
        for d in iter {
            product = arith::mul(&product, &d);
        }
        product
    }
}

impl<'a, H> Product<&'a Decimal<H>> for Decimal<H>
where
    H: Hook,
{
    fn product<I>(iter: I) -> Self
    where
        I: Iterator<Item = &'a Decimal<H>>,
    {
        let mut product = Decimal::one();
        for d in iter {
            product = arith::mul(&product, d);
        }
        product
    }
}

impl<H> Zero for Decimal<H>
where
    H: Hook,
{
    fn zero() -> Self {
        Decimal::zero()
    }

    fn is_zero(&self) -> bool {
        Decimal::is_zero(self)
    }
}

impl<H> One for Decimal<H>
where
    H: Hook,
{
    fn one() -> Self {
        Decimal::one()
    }
}
