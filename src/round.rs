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

//! Coefficient rounding and exponent bound enforcement.
//!
//! [`reduce`] brings a coefficient down to the working precision under one
//! of the eight rounding algorithms, reporting whether digits were
//! discarded and whether any of them were nonzero. [`clamp`] then forces
//! the exponent into the hook's bounds, detecting overflow, subnormal
//! results, and underflow.

use crate::coefficient::Coefficient;
use crate::hook::Rounding;

/// The outcome of reducing a coefficient to the working precision.
pub(crate) struct Reduced {
    pub(crate) coefficient: Coefficient,
    pub(crate) exponent: i64,
    pub(crate) rounded: bool,
    pub(crate) inexact: bool,
}

/// Reduces `coefficient` to at most `precision` digits, raising the
/// exponent by one for every digit discarded.
///
/// `sticky` marks digits known to be nonzero beyond the coefficient itself
/// (division sets it when the quotient loop stops with a nonzero
/// remainder); it participates in every "any discarded digit is nonzero"
/// decision.
pub(crate) fn reduce(
    negative: bool,
    coefficient: Coefficient,
    exponent: i64,
    precision: u32,
    mode: Rounding,
    sticky: bool,
) -> Reduced {
    let digits = coefficient.digits();
    if digits <= precision {
        return Reduced {
            coefficient,
            exponent,
            rounded: false,
            inexact: false,
        };
    }
    let discard = digits - precision;
    match mode {
        Rounding::HalfUp => half_up(coefficient, exponent, discard, precision, sticky),
        _ => one_pass(
            negative,
            coefficient,
            exponent,
            discard,
            precision,
            mode,
            sticky,
        ),
    }
}

/// Half-up reduction goes through an intermediate width of one digit
/// beyond the target: the digits below that width are discarded first
/// (folded into the inexact outcome), and the single remaining extra digit
/// decides the increment.
fn half_up(
    coefficient: Coefficient,
    exponent: i64,
    discard: u32,
    precision: u32,
    sticky: bool,
) -> Reduced {
    let mut coefficient = coefficient;
    let mut exponent = exponent;
    let mut inexact = sticky;
    if discard > 1 {
        let (keep, dropped) = coefficient.div_rem_pow10(discard - 1);
        inexact |= !dropped.is_zero();
        coefficient = keep;
        exponent += i64::from(discard - 1);
    }
    let (mut keep, extra) = coefficient.div_rem_pow10(1);
    let extra = extra
        .to_u128()
        .expect("remainder of a one-digit split fits in u128") as u8;
    inexact |= extra != 0;
    exponent += 1;
    if extra >= 5 {
        keep = keep.incr();
        if keep.digits() > precision {
            let (renormalized, _) = keep.div_rem_pow10(1);
            keep = renormalized;
            exponent += 1;
        }
    }
    Reduced {
        coefficient: keep,
        exponent,
        rounded: true,
        inexact,
    }
}

fn one_pass(
    negative: bool,
    coefficient: Coefficient,
    exponent: i64,
    discard: u32,
    precision: u32,
    mode: Rounding,
    sticky: bool,
) -> Reduced {
    let (keep, dropped) = coefficient.div_rem_pow10(discard);
    let (lead, rest) = dropped.div_rem_pow10(discard - 1);
    let lead = lead
        .to_u128()
        .expect("leading discarded digit fits in u128") as u8;
    let any = !dropped.is_zero() || sticky;
    let rest_nonzero = !rest.is_zero() || sticky;
    let increment = wants_increment(mode, negative, any, lead, rest_nonzero, keep.last_digit());
    let mut keep = keep;
    let mut exponent = exponent + i64::from(discard);
    if increment {
        keep = keep.incr();
        if keep.digits() > precision {
            let (renormalized, _) = keep.div_rem_pow10(1);
            keep = renormalized;
            exponent += 1;
        }
    }
    Reduced {
        coefficient: keep,
        exponent,
        rounded: true,
        inexact: any,
    }
}

/// Decides whether the kept coefficient is incremented, given the leading
/// discarded digit and what lies below it.
fn wants_increment(
    mode: Rounding,
    negative: bool,
    any: bool,
    lead: u8,
    rest_nonzero: bool,
    keep_last: u8,
) -> bool {
    match mode {
        Rounding::Down => false,
        Rounding::Up => any,
        Rounding::Ceiling => any && !negative,
        Rounding::Floor => any && negative,
        Rounding::HalfUp => lead >= 5,
        Rounding::HalfDown => lead > 5 || (lead == 5 && rest_nonzero),
        Rounding::HalfEven => {
            lead > 5 || (lead == 5 && (rest_nonzero || keep_last % 2 == 1))
        }
        Rounding::ZeroFiveUp => any && matches!(keep_last, 0 | 5),
    }
}

/// What a coefficient/exponent pair became after bound enforcement.
pub(crate) enum Bounded {
    Finite {
        coefficient: Coefficient,
        exponent: i64,
    },
    /// The value overflowed towards infinity.
    Infinity,
    /// The value overflowed but the rounding algorithm caps it at the
    /// largest finite value instead.
    MaxFinite,
}

/// The outcome of forcing an exponent into the hook's bounds.
pub(crate) struct Clamped {
    pub(crate) value: Bounded,
    pub(crate) clamped: bool,
    pub(crate) rounded: bool,
    pub(crate) inexact: bool,
    pub(crate) overflow: bool,
    pub(crate) subnormal: bool,
    pub(crate) underflow: bool,
}

impl Clamped {
    fn unchanged(coefficient: Coefficient, exponent: i64) -> Clamped {
        Clamped {
            value: Bounded::Finite {
                coefficient,
                exponent,
            },
            clamped: false,
            rounded: false,
            inexact: false,
            overflow: false,
            subnormal: false,
            underflow: false,
        }
    }
}

/// Forces `exponent` into `[emin, emax]`.
///
/// An exponent above the bound is lowered by padding the coefficient with
/// zeros when the padded coefficient still fits the precision (the
/// exponent was merely clamped); otherwise the value overflows. An
/// exponent below the bound marks the result subnormal and discards low
/// digits to raise it, underflowing if any of those digits were nonzero.
pub(crate) fn clamp(
    negative: bool,
    coefficient: Coefficient,
    exponent: i64,
    precision: u32,
    mode: Rounding,
    emin: i64,
    emax: i64,
) -> Clamped {
    if coefficient.is_zero() {
        let clamped_exponent = exponent.clamp(emin, emax);
        let mut out = Clamped::unchanged(coefficient, clamped_exponent);
        out.clamped = clamped_exponent != exponent;
        return out;
    }
    if exponent > emax {
        let headroom = i64::from(precision - coefficient.digits());
        if exponent - emax <= headroom {
            let shift = (exponent - emax) as u32;
            let mut out = Clamped::unchanged(coefficient.mul_pow10(shift), emax);
            out.clamped = true;
            return out;
        }
        let to_infinity = match mode {
            Rounding::Down | Rounding::ZeroFiveUp => false,
            Rounding::Ceiling => !negative,
            Rounding::Floor => negative,
            _ => true,
        };
        return Clamped {
            value: if to_infinity {
                Bounded::Infinity
            } else {
                Bounded::MaxFinite
            },
            clamped: false,
            rounded: true,
            inexact: true,
            overflow: true,
            subnormal: false,
            underflow: false,
        };
    }
    if exponent < emin {
        let shift = emin - exponent;
        let digits = i64::from(coefficient.digits());
        let (keep, lead, rest_nonzero, any) = if shift > digits {
            // Every digit of the coefficient lies below the discarded
            // leading position, which is itself a zero.
            (Coefficient::ZERO, 0u8, true, true)
        } else {
            let shift = shift as u32;
            let (keep, dropped) = coefficient.div_rem_pow10(shift);
            let (lead, rest) = dropped.div_rem_pow10(shift - 1);
            let lead = lead
                .to_u128()
                .expect("leading discarded digit fits in u128") as u8;
            (keep, lead, !rest.is_zero(), !dropped.is_zero())
        };
        let mut keep = if wants_increment(mode, negative, any, lead, rest_nonzero, keep.last_digit())
        {
            keep.incr()
        } else {
            keep
        };
        if keep.digits() > precision {
            let (renormalized, _) = keep.div_rem_pow10(1);
            keep = renormalized;
        }
        let collapsed = keep.is_zero();
        return Clamped {
            value: Bounded::Finite {
                coefficient: keep,
                exponent: emin,
            },
            clamped: collapsed,
            rounded: true,
            inexact: any,
            overflow: false,
            subnormal: true,
            underflow: any,
        };
    }
    Clamped::unchanged(coefficient, exponent)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small(n: u128) -> Coefficient {
        Coefficient::from_u128(n)
    }

    fn keep(negative: bool, value: u128, mode: Rounding) -> u128 {
        let out = reduce(negative, small(value), 0, 3, mode, false);
        out.coefficient
            .to_u128()
            .expect("three digits fit in u128")
    }

    #[test]
    fn no_op_below_precision() {
        let out = reduce(false, small(999), 5, 3, Rounding::HalfUp, false);
        assert_eq!(out.coefficient, small(999));
        assert_eq!(out.exponent, 5);
        assert!(!out.rounded);
        assert!(!out.inexact);
    }

    #[test]
    fn down_truncates() {
        assert_eq!(keep(false, 12_399, Rounding::Down), 123);
        assert_eq!(keep(true, 12_399, Rounding::Down), 123);
    }

    #[test]
    fn up_rounds_away_from_zero() {
        assert_eq!(keep(false, 12_301, Rounding::Up), 124);
        assert_eq!(keep(true, 12_301, Rounding::Up), 124);
        assert_eq!(keep(false, 12_300, Rounding::Up), 123);
    }

    #[test]
    fn ceiling_and_floor_depend_on_sign() {
        assert_eq!(keep(false, 12_301, Rounding::Ceiling), 124);
        assert_eq!(keep(true, 12_301, Rounding::Ceiling), 123);
        assert_eq!(keep(false, 12_301, Rounding::Floor), 123);
        assert_eq!(keep(true, 12_301, Rounding::Floor), 124);
    }

    #[test]
    fn half_up_inspects_the_extra_digit() {
        assert_eq!(keep(false, 12_350, Rounding::HalfUp), 124);
        assert_eq!(keep(false, 12_349, Rounding::HalfUp), 123);
        // The half decision survives nonzero digits below the extra one.
        assert_eq!(keep(false, 12_500, Rounding::HalfUp), 125);
        assert_eq!(keep(false, 12_351, Rounding::HalfUp), 124);
    }

    #[test]
    fn half_down_requires_more_than_half() {
        assert_eq!(keep(false, 12_350, Rounding::HalfDown), 123);
        assert_eq!(keep(false, 12_351, Rounding::HalfDown), 124);
        assert_eq!(keep(false, 12_360, Rounding::HalfDown), 124);
    }

    #[test]
    fn half_even_breaks_ties_towards_even() {
        assert_eq!(keep(false, 12_350, Rounding::HalfEven), 124);
        assert_eq!(keep(false, 12_450, Rounding::HalfEven), 124);
        assert_eq!(keep(false, 12_451, Rounding::HalfEven), 125);
        assert_eq!(keep(false, 12_449, Rounding::HalfEven), 124);
    }

    #[test]
    fn zero_five_up_increments_only_zero_and_five() {
        assert_eq!(keep(false, 12_099, Rounding::ZeroFiveUp), 121);
        assert_eq!(keep(false, 12_599, Rounding::ZeroFiveUp), 126);
        assert_eq!(keep(false, 12_399, Rounding::ZeroFiveUp), 123);
        assert_eq!(keep(false, 12_000, Rounding::ZeroFiveUp), 120);
    }

    #[test]
    fn carry_renormalizes_to_precision() {
        let out = reduce(false, small(99_950), 0, 3, Rounding::HalfUp, false);
        assert_eq!(out.coefficient, small(100));
        assert_eq!(out.exponent, 3);
        assert!(out.rounded);
        assert!(out.inexact);
    }

    #[test]
    fn exact_discard_is_rounded_but_not_inexact() {
        let out = reduce(false, small(123_000), 0, 3, Rounding::HalfUp, false);
        assert_eq!(out.coefficient, small(123));
        assert_eq!(out.exponent, 3);
        assert!(out.rounded);
        assert!(!out.inexact);
    }

    #[test]
    fn sticky_digits_force_inexact() {
        let out = reduce(false, small(123_000), 0, 3, Rounding::HalfUp, true);
        assert!(out.inexact);
        // A sticky remainder also breaks an exact half for half-even.
        let out = reduce(false, small(12_350), 0, 3, Rounding::HalfEven, true);
        assert_eq!(out.coefficient, small(124));
    }

    #[test]
    fn clamp_pads_high_exponents() {
        let out = clamp(false, small(1), 7, 3, Rounding::HalfUp, -5, 5);
        match out.value {
            Bounded::Finite {
                coefficient,
                exponent,
            } => {
                assert_eq!(coefficient, small(100));
                assert_eq!(exponent, 5);
            }
            _ => panic!("expected a finite value"),
        }
        assert!(out.clamped);
        assert!(!out.overflow);
    }

    #[test]
    fn clamp_overflows_past_the_headroom() {
        let out = clamp(false, small(1), 8, 3, Rounding::HalfUp, -5, 5);
        assert!(out.overflow);
        assert!(out.rounded);
        assert!(out.inexact);
        assert!(matches!(out.value, Bounded::Infinity));

        let out = clamp(true, small(1), 8, 3, Rounding::Ceiling, -5, 5);
        assert!(matches!(out.value, Bounded::MaxFinite));
        let out = clamp(true, small(1), 8, 3, Rounding::Floor, -5, 5);
        assert!(matches!(out.value, Bounded::Infinity));
        let out = clamp(false, small(1), 8, 3, Rounding::ZeroFiveUp, -5, 5);
        assert!(matches!(out.value, Bounded::MaxFinite));
    }

    #[test]
    fn clamp_denormalizes_low_exponents() {
        let out = clamp(false, small(99), -6, 3, Rounding::HalfUp, -5, 5);
        match out.value {
            Bounded::Finite {
                coefficient,
                exponent,
            } => {
                assert_eq!(coefficient, small(10));
                assert_eq!(exponent, -5);
            }
            _ => panic!("expected a finite value"),
        }
        assert!(out.subnormal);
        assert!(out.underflow);
        assert!(out.inexact);
        assert!(!out.clamped);
    }

    #[test]
    fn clamp_collapses_tiny_values_to_zero() {
        let out = clamp(false, small(1), -8, 3, Rounding::HalfUp, -5, 5);
        match out.value {
            Bounded::Finite {
                coefficient,
                exponent,
            } => {
                assert!(coefficient.is_zero());
                assert_eq!(exponent, -5);
            }
            _ => panic!("expected a finite value"),
        }
        assert!(out.clamped);
        assert!(out.subnormal);
        assert!(out.underflow);
    }

    #[test]
    fn clamp_moves_zero_exponents_into_range() {
        let out = clamp(false, Coefficient::ZERO, 9, 3, Rounding::HalfUp, -5, 5);
        match out.value {
            Bounded::Finite { exponent, .. } => assert_eq!(exponent, 5),
            _ => panic!("expected a finite value"),
        }
        assert!(out.clamped);
        assert!(!out.rounded);
    }
}
