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

//! The arithmetic engine: addition, subtraction, multiplication, long
//! division, and the total-order comparison.
//!
//! Every operation is a pure function of its operands and the left
//! operand's hook. Finite results flow through [`finish`], which rounds to
//! the working precision, enforces the exponent bounds, stamps the
//! condition flags, and fires the hook callbacks.

use std::cmp::Ordering;
use std::marker::PhantomData;

use crate::coefficient::Coefficient;
use crate::decimal::{Decimal, Kind};
use crate::hook::{self, Hook, Rounding, Status};
use crate::round::{self, Bounded};

/// Rounds a raw `(sign, coefficient, exponent)` triple into a finished
/// decimal carrying the hook `H`.
///
/// `sticky` marks nonzero value below the coefficient's last digit (set by
/// division when it stops with a nonzero remainder).
pub(crate) fn finish<H>(negative: bool, coefficient: Coefficient, exponent: i64, sticky: bool) -> Decimal<H>
where
    H: Hook,
{
    hook::validate_hook::<H>();
    let mut status = Status::default();
    let reduced = round::reduce(
        negative,
        coefficient,
        exponent,
        H::PRECISION,
        H::ROUNDING,
        sticky,
    );
    if reduced.rounded {
        status.set_rounded();
    }
    if reduced.inexact {
        status.set_inexact();
    }
    let clamped = round::clamp(
        negative,
        reduced.coefficient,
        reduced.exponent,
        H::PRECISION,
        H::ROUNDING,
        H::MIN_EXPONENT,
        H::MAX_EXPONENT,
    );
    if clamped.clamped {
        status.set_clamped();
    }
    if clamped.rounded {
        status.set_rounded();
    }
    if clamped.inexact {
        status.set_inexact();
    }
    if clamped.overflow {
        status.set_overflow();
    }
    if clamped.subnormal {
        status.set_subnormal();
    }
    if clamped.underflow {
        status.set_underflow();
    }
    let kind = match clamped.value {
        Bounded::Finite {
            coefficient,
            exponent,
        } => Kind::Finite {
            coefficient,
            exponent,
        },
        Bounded::Infinity => Kind::Infinity,
        Bounded::MaxFinite => Kind::Finite {
            coefficient: Coefficient::pow10(H::PRECISION).sub(&Coefficient::ONE),
            exponent: H::MAX_EXPONENT,
        },
    };
    let result = Decimal {
        negative,
        kind,
        status,
        hook: PhantomData,
    };
    hook::fire(&result);
    result
}

/// A quiet NaN propagated from an operand: no flag is raised.
fn propagated_nan<H>(negative: bool) -> Decimal<H>
where
    H: Hook,
{
    Decimal {
        negative,
        kind: Kind::Nan,
        status: Status::default(),
        hook: PhantomData,
    }
}

/// A NaN born from an invalid operation: raises `invalid-operation`.
pub(crate) fn invalid_nan<H>(negative: bool) -> Decimal<H>
where
    H: Hook,
{
    let mut status = Status::default();
    status.set_invalid_operation();
    let result = Decimal {
        negative,
        kind: Kind::Nan,
        status,
        hook: PhantomData,
    };
    hook::fire(&result);
    result
}

fn infinity<H>(negative: bool) -> Decimal<H>
where
    H: Hook,
{
    Decimal {
        negative,
        kind: Kind::Infinity,
        status: Status::default(),
        hook: PhantomData,
    }
}

/// The number of zeros to pad onto the larger-exponent operand when
/// aligning.
///
/// Once the separation exceeds the other operand's digit count plus the
/// working precision, the smaller operand can only reach the rounder's
/// discarded digits, where any amount of further separation classifies
/// identically. The shift is therefore capped there instead of
/// materializing the literal exponent difference, which may not fit in
/// memory (or in `u32`) for hooks with wide exponent bounds.
fn alignment_shift(delta: i128, other_digits: u32, precision: u32) -> u32 {
    let needed = i128::from(other_digits) + i128::from(precision) + 2;
    u32::try_from(delta.min(needed)).unwrap_or(u32::MAX)
}

pub(crate) fn add_op<L, R>(lhs: &Decimal<L>, rhs: &Decimal<R>) -> Decimal<L>
where
    L: Hook,
    R: Hook,
{
    add(lhs, rhs, false)
}

/// Subtraction is addition with the right operand's sign flipped.
pub(crate) fn sub_op<L, R>(lhs: &Decimal<L>, rhs: &Decimal<R>) -> Decimal<L>
where
    L: Hook,
    R: Hook,
{
    add(lhs, rhs, true)
}

fn add<L, R>(lhs: &Decimal<L>, rhs: &Decimal<R>, negate_rhs: bool) -> Decimal<L>
where
    L: Hook,
    R: Hook,
{
    hook::validate_hook::<L>();
    match (&lhs.kind, &rhs.kind) {
        (Kind::Nan, _) => propagated_nan(lhs.negative),
        (_, Kind::Nan) => propagated_nan(rhs.negative),
        (Kind::Infinity, Kind::Infinity) => {
            let rhs_negative = rhs.negative ^ negate_rhs;
            if lhs.negative == rhs_negative {
                infinity(lhs.negative)
            } else {
                invalid_nan(false)
            }
        }
        (Kind::Infinity, _) => infinity(lhs.negative),
        (_, Kind::Infinity) => infinity(rhs.negative ^ negate_rhs),
        (
            Kind::Finite {
                coefficient: lhs_coefficient,
                exponent: lhs_exponent,
            },
            Kind::Finite {
                coefficient: rhs_coefficient,
                exponent: rhs_exponent,
            },
        ) => {
            let lhs_negative = lhs.negative;
            let rhs_negative = rhs.negative ^ negate_rhs;
            // Align both coefficients to the smaller exponent, with the
            // shift capped once the operands are too far apart to
            // interact above the rounder's discarded digits.
            let delta = i128::from(*lhs_exponent) - i128::from(*rhs_exponent);
            let mut aligned_lhs = lhs_coefficient.clone();
            let mut aligned_rhs = rhs_coefficient.clone();
            let mut exponent = (*lhs_exponent).min(*rhs_exponent);
            if delta > 0 {
                let applied = alignment_shift(delta, rhs_coefficient.digits(), L::PRECISION);
                aligned_lhs = aligned_lhs.mul_pow10(applied);
                exponent = lhs_exponent - i64::from(applied);
            } else if delta < 0 {
                let applied = alignment_shift(-delta, lhs_coefficient.digits(), L::PRECISION);
                aligned_rhs = aligned_rhs.mul_pow10(applied);
                exponent = rhs_exponent - i64::from(applied);
            }
            if lhs_negative == rhs_negative {
                finish(lhs_negative, aligned_lhs.add(&aligned_rhs), exponent, false)
            } else {
                match aligned_lhs.cmp(&aligned_rhs) {
                    Ordering::Greater => {
                        finish(lhs_negative, aligned_lhs.sub(&aligned_rhs), exponent, false)
                    }
                    Ordering::Less => {
                        finish(rhs_negative, aligned_rhs.sub(&aligned_lhs), exponent, false)
                    }
                    // An exact zero from operands of opposite sign is
                    // positive except under floor rounding.
                    Ordering::Equal => finish(
                        L::ROUNDING == Rounding::Floor,
                        Coefficient::ZERO,
                        exponent,
                        false,
                    ),
                }
            }
        }
    }
}

pub(crate) fn mul<L, R>(lhs: &Decimal<L>, rhs: &Decimal<R>) -> Decimal<L>
where
    L: Hook,
    R: Hook,
{
    hook::validate_hook::<L>();
    let negative = lhs.negative ^ rhs.negative;
    match (&lhs.kind, &rhs.kind) {
        (Kind::Nan, _) => propagated_nan(lhs.negative),
        (_, Kind::Nan) => propagated_nan(rhs.negative),
        (Kind::Infinity, Kind::Finite { coefficient, .. })
        | (Kind::Finite { coefficient, .. }, Kind::Infinity)
            if coefficient.is_zero() =>
        {
            invalid_nan(false)
        }
        (Kind::Infinity, _) | (_, Kind::Infinity) => infinity(negative),
        (
            Kind::Finite {
                coefficient: lhs_coefficient,
                exponent: lhs_exponent,
            },
            Kind::Finite {
                coefficient: rhs_coefficient,
                exponent: rhs_exponent,
            },
        ) => finish(
            negative,
            lhs_coefficient.mul(rhs_coefficient),
            lhs_exponent.saturating_add(*rhs_exponent),
            false,
        ),
    }
}

pub(crate) fn div<L, R>(lhs: &Decimal<L>, rhs: &Decimal<R>) -> Decimal<L>
where
    L: Hook,
    R: Hook,
{
    hook::validate_hook::<L>();
    let negative = lhs.negative ^ rhs.negative;
    match (&lhs.kind, &rhs.kind) {
        (Kind::Nan, _) => propagated_nan(lhs.negative),
        (_, Kind::Nan) => propagated_nan(rhs.negative),
        (Kind::Infinity, Kind::Infinity) => invalid_nan(false),
        (Kind::Infinity, _) => infinity(negative),
        // A finite dividend vanishes against an infinite divisor; the
        // zero takes the smallest exponent the hook can represent.
        (_, Kind::Infinity) => finish(negative, Coefficient::ZERO, L::MIN_EXPONENT, false),
        (
            Kind::Finite {
                coefficient: lhs_coefficient,
                exponent: lhs_exponent,
            },
            Kind::Finite {
                coefficient: rhs_coefficient,
                exponent: rhs_exponent,
            },
        ) => {
            if rhs_coefficient.is_zero() {
                return if lhs_coefficient.is_zero() {
                    // 0 / 0 is undefined rather than infinite.
                    let mut status = Status::default();
                    status.set_division_by_zero();
                    let result = Decimal {
                        negative: false,
                        kind: Kind::Nan,
                        status,
                        hook: PhantomData,
                    };
                    hook::fire(&result);
                    result
                } else {
                    let mut status = Status::default();
                    status.set_division_by_zero();
                    status.set_invalid_operation();
                    let result = Decimal {
                        negative,
                        kind: Kind::Infinity,
                        status,
                        hook: PhantomData,
                    };
                    hook::fire(&result);
                    result
                };
            }
            if lhs_coefficient.is_zero() {
                return finish(
                    negative,
                    Coefficient::ZERO,
                    lhs_exponent.saturating_sub(*rhs_exponent),
                    false,
                );
            }
            long_division(
                negative,
                lhs_coefficient,
                *lhs_exponent,
                rhs_coefficient,
                *rhs_exponent,
            )
        }
    }
}

/// Schoolbook long division on coefficients.
///
/// The dividend and divisor are first scaled so a single quotient digit is
/// produced per step; the loop then emits digits until the remainder is
/// exhausted or the quotient holds one digit more than the precision,
/// which is enough for the rounder to make its decision.
fn long_division<L>(
    negative: bool,
    lhs_coefficient: &Coefficient,
    lhs_exponent: i64,
    rhs_coefficient: &Coefficient,
    rhs_exponent: i64,
) -> Decimal<L>
where
    L: Hook,
{
    let mut dividend = lhs_coefficient.clone();
    let mut divisor = rhs_coefficient.clone();
    let mut adjust: i64 = 0;
    while dividend < divisor {
        dividend = dividend.mul_pow10(1);
        adjust += 1;
    }
    while dividend >= divisor.mul_pow10(1) {
        divisor = divisor.mul_pow10(1);
        adjust -= 1;
    }
    let mut quotient = Coefficient::ZERO;
    let target_digits = L::PRECISION + 1;
    loop {
        while divisor <= dividend {
            dividend = dividend.sub(&divisor);
            quotient = quotient.incr();
        }
        if dividend.is_zero() && adjust >= 0 {
            break;
        }
        if quotient.digits() == target_digits {
            break;
        }
        quotient = quotient.mul_pow10(1);
        dividend = dividend.mul_pow10(1);
        adjust += 1;
    }
    let sticky = !dividend.is_zero();
    let exponent = lhs_exponent.saturating_sub(rhs_exponent.saturating_add(adjust));
    finish(negative, quotient, exponent, sticky)
}

/// The total order over all decimals:
/// `−∞ < −NaN < NaN < every finite number < +∞`,
/// with finite numbers compared by value (so `1 == 1.00` and `+0 == −0`).
pub(crate) fn total_cmp<L, R>(lhs: &Decimal<L>, rhs: &Decimal<R>) -> Ordering
where
    L: Hook,
    R: Hook,
{
    fn rank<H: Hook>(d: &Decimal<H>) -> u8 {
        match d.kind {
            Kind::Infinity if d.negative => 0,
            Kind::Nan if d.negative => 1,
            Kind::Nan => 2,
            Kind::Finite { .. } => 3,
            Kind::Infinity => 4,
        }
    }
    match (rank(lhs).cmp(&rank(rhs)), &lhs.kind, &rhs.kind) {
        (
            Ordering::Equal,
            Kind::Finite {
                coefficient: lhs_coefficient,
                exponent: lhs_exponent,
            },
            Kind::Finite {
                coefficient: rhs_coefficient,
                exponent: rhs_exponent,
            },
        ) => cmp_finite(
            lhs.negative,
            lhs_coefficient,
            *lhs_exponent,
            rhs.negative,
            rhs_coefficient,
            *rhs_exponent,
        ),
        (ordering, _, _) => ordering,
    }
}

/// Compares two finite numbers by inspecting the sign of their unrounded
/// difference. Operands whose orders of magnitude already differ are
/// decided without aligning the coefficients.
fn cmp_finite(
    lhs_negative: bool,
    lhs_coefficient: &Coefficient,
    lhs_exponent: i64,
    rhs_negative: bool,
    rhs_coefficient: &Coefficient,
    rhs_exponent: i64,
) -> Ordering {
    let lhs_zero = lhs_coefficient.is_zero();
    let rhs_zero = rhs_coefficient.is_zero();
    if lhs_zero && rhs_zero {
        return Ordering::Equal;
    }
    if lhs_zero {
        return if rhs_negative {
            Ordering::Greater
        } else {
            Ordering::Less
        };
    }
    if rhs_zero {
        return if lhs_negative {
            Ordering::Less
        } else {
            Ordering::Greater
        };
    }
    if lhs_negative != rhs_negative {
        return if lhs_negative {
            Ordering::Less
        } else {
            Ordering::Greater
        };
    }
    let lhs_magnitude = i128::from(lhs_exponent) + i128::from(lhs_coefficient.digits());
    let rhs_magnitude = i128::from(rhs_exponent) + i128::from(rhs_coefficient.digits());
    let magnitude = if lhs_magnitude != rhs_magnitude {
        lhs_magnitude.cmp(&rhs_magnitude)
    } else {
        // Equal adjusted exponents bound the exponent difference by the
        // digit counts, so the shift always fits.
        let delta = i128::from(lhs_exponent) - i128::from(rhs_exponent);
        if delta >= 0 {
            lhs_coefficient
                .mul_pow10(delta as u32)
                .cmp(rhs_coefficient)
        } else {
            lhs_coefficient.cmp(&rhs_coefficient.mul_pow10((-delta) as u32))
        }
    };
    if lhs_negative {
        magnitude.reverse()
    } else {
        magnitude
    }
}
