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

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{FromPrimitive, Pow, ToPrimitive};

/// The coefficient of a finite decimal: a non-negative integer with the
/// digit-oriented operations the arithmetic and rounding engines need.
///
/// Values that fit in a machine word stay inline; only coefficients beyond
/// `u128::MAX` (38 digits) spill to a heap-backed big integer. The variant
/// is canonical: `Big` never holds a value that fits in `Small`, so derived
/// equality is value equality.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub(crate) enum Coefficient {
    Small(u128),
    Big(BigUint),
}

impl Coefficient {
    pub(crate) const ZERO: Coefficient = Coefficient::Small(0);
    pub(crate) const ONE: Coefficient = Coefficient::Small(1);

    /// Wraps a big integer, demoting it to the inline representation when it
    /// fits.
    pub(crate) fn from_big(n: BigUint) -> Coefficient {
        match n.to_u128() {
            Some(small) => Coefficient::Small(small),
            None => Coefficient::Big(n),
        }
    }

    pub(crate) fn from_u128(n: u128) -> Coefficient {
        Coefficient::Small(n)
    }

    /// Truncates a finite non-negative float to a coefficient.
    pub(crate) fn from_f64(n: f64) -> Option<Coefficient> {
        BigUint::from_f64(n).map(Coefficient::from_big)
    }

    /// The value `10^n`.
    pub(crate) fn pow10(n: u32) -> Coefficient {
        match 10u128.checked_pow(n) {
            Some(p) => Coefficient::Small(p),
            None => Coefficient::Big(BigUint::from(10u8).pow(n)),
        }
    }

    pub(crate) fn to_biguint(&self) -> BigUint {
        match self {
            Coefficient::Small(n) => BigUint::from(*n),
            Coefficient::Big(n) => n.clone(),
        }
    }

    pub(crate) fn to_u128(&self) -> Option<u128> {
        match self {
            Coefficient::Small(n) => Some(*n),
            Coefficient::Big(_) => None,
        }
    }

    pub(crate) fn is_zero(&self) -> bool {
        matches!(self, Coefficient::Small(0))
    }

    /// The number of decimal digits, counting zero as one digit.
    pub(crate) fn digits(&self) -> u32 {
        match self {
            Coefficient::Small(0) => 1,
            Coefficient::Small(n) => n.ilog10() + 1,
            Coefficient::Big(n) => n.to_str_radix(10).len() as u32,
        }
    }

    pub(crate) fn last_digit(&self) -> u8 {
        match self {
            Coefficient::Small(n) => (n % 10) as u8,
            Coefficient::Big(n) => (n % BigUint::from(10u8))
                .to_u8()
                .expect("remainder modulo ten fits in u8"),
        }
    }

    /// Appends a low-order decimal digit, i.e. `self = self * 10 + digit`.
    pub(crate) fn push_digit(&mut self, digit: u8) {
        match self {
            Coefficient::Small(n) => {
                match n
                    .checked_mul(10)
                    .and_then(|m| m.checked_add(u128::from(digit)))
                {
                    Some(m) => *n = m,
                    None => {
                        *self = Coefficient::Big(
                            BigUint::from(*n) * 10u32 + u32::from(digit),
                        );
                    }
                }
            }
            Coefficient::Big(n) => {
                *n *= 10u32;
                *n += u32::from(digit);
            }
        }
    }

    pub(crate) fn add(&self, other: &Coefficient) -> Coefficient {
        match (self, other) {
            (Coefficient::Small(a), Coefficient::Small(b)) => match a.checked_add(*b) {
                Some(sum) => Coefficient::Small(sum),
                None => Coefficient::Big(BigUint::from(*a) + BigUint::from(*b)),
            },
            _ => Coefficient::from_big(self.to_biguint() + other.to_biguint()),
        }
    }

    /// Subtracts `other` from `self`. `self` must not be smaller.
    pub(crate) fn sub(&self, other: &Coefficient) -> Coefficient {
        debug_assert!(self >= other);
        match (self, other) {
            (Coefficient::Small(a), Coefficient::Small(b)) => Coefficient::Small(a - b),
            _ => Coefficient::from_big(self.to_biguint() - other.to_biguint()),
        }
    }

    pub(crate) fn mul(&self, other: &Coefficient) -> Coefficient {
        match (self, other) {
            (Coefficient::Small(a), Coefficient::Small(b)) => match a.checked_mul(*b) {
                Some(product) => Coefficient::Small(product),
                None => Coefficient::from_big(BigUint::from(*a) * BigUint::from(*b)),
            },
            _ => Coefficient::from_big(self.to_biguint() * other.to_biguint()),
        }
    }

    /// Multiplies by `10^n`.
    pub(crate) fn mul_pow10(&self, n: u32) -> Coefficient {
        if n == 0 || self.is_zero() {
            return self.clone();
        }
        match self {
            Coefficient::Small(v) => {
                match 10u128.checked_pow(n).and_then(|p| v.checked_mul(p)) {
                    Some(m) => Coefficient::Small(m),
                    None => Coefficient::from_big(
                        BigUint::from(*v) * BigUint::from(10u8).pow(n),
                    ),
                }
            }
            Coefficient::Big(v) => Coefficient::from_big(v * BigUint::from(10u8).pow(n)),
        }
    }

    /// Splits off the low `n` decimal digits, returning
    /// `(self / 10^n, self % 10^n)`.
    pub(crate) fn div_rem_pow10(&self, n: u32) -> (Coefficient, Coefficient) {
        if n == 0 {
            return (self.clone(), Coefficient::ZERO);
        }
        match self {
            Coefficient::Small(v) => match 10u128.checked_pow(n) {
                Some(p) => (Coefficient::Small(v / p), Coefficient::Small(v % p)),
                // 10^n exceeds u128::MAX, and therefore exceeds `v`.
                None => (Coefficient::ZERO, self.clone()),
            },
            Coefficient::Big(v) => {
                let (q, r) = v.div_rem(&BigUint::from(10u8).pow(n));
                (Coefficient::from_big(q), Coefficient::from_big(r))
            }
        }
    }

    pub(crate) fn incr(&self) -> Coefficient {
        self.add(&Coefficient::ONE)
    }

    /// The decimal digits of the coefficient, most significant first, with
    /// no leading zeros unless the value is zero itself.
    pub(crate) fn to_decimal_string(&self) -> String {
        match self {
            Coefficient::Small(n) => n.to_string(),
            Coefficient::Big(n) => n.to_str_radix(10),
        }
    }
}

impl Ord for Coefficient {
    fn cmp(&self, other: &Coefficient) -> Ordering {
        match (self, other) {
            (Coefficient::Small(a), Coefficient::Small(b)) => a.cmp(b),
            (Coefficient::Big(a), Coefficient::Big(b)) => a.cmp(b),
            // Big is canonical: it always exceeds any Small value.
            (Coefficient::Small(_), Coefficient::Big(_)) => Ordering::Less,
            (Coefficient::Big(_), Coefficient::Small(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for Coefficient {
    fn partial_cmp(&self, other: &Coefficient) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digit_count() {
        assert_eq!(Coefficient::ZERO.digits(), 1);
        assert_eq!(Coefficient::from_u128(7).digits(), 1);
        assert_eq!(Coefficient::from_u128(10).digits(), 2);
        assert_eq!(Coefficient::from_u128(999_999_999).digits(), 9);
        assert_eq!(Coefficient::from_u128(u128::MAX).digits(), 39);
        assert_eq!(Coefficient::pow10(50).digits(), 51);
    }

    #[test]
    fn push_digit_promotes_on_overflow() {
        let mut c = Coefficient::from_u128(u128::MAX / 10);
        c.push_digit(9);
        assert!(matches!(c, Coefficient::Big(_)));
        assert_eq!(c.to_decimal_string(), format!("{}9", u128::MAX / 10));
    }

    #[test]
    fn sub_demotes_to_small() {
        let big = Coefficient::pow10(40);
        let diff = big.sub(&big.sub(&Coefficient::ONE));
        assert_eq!(diff, Coefficient::ONE);
    }

    #[test]
    fn div_rem_pow10_splits_digits() {
        let c = Coefficient::from_u128(1_234_567);
        let (q, r) = c.div_rem_pow10(3);
        assert_eq!(q, Coefficient::from_u128(1_234));
        assert_eq!(r, Coefficient::from_u128(567));

        let (q, r) = c.div_rem_pow10(0);
        assert_eq!(q, c);
        assert_eq!(r, Coefficient::ZERO);

        let big = Coefficient::pow10(45);
        let (q, r) = big.div_rem_pow10(40);
        assert_eq!(q, Coefficient::pow10(5));
        assert_eq!(r, Coefficient::ZERO);
    }

    #[test]
    fn ordering_across_variants() {
        let small = Coefficient::from_u128(u128::MAX);
        let big = Coefficient::pow10(39);
        assert!(small < big);
        assert!(big > small);
        assert_eq!(big.cmp(&big), Ordering::Equal);
    }

    #[test]
    fn mul_pow10_round_trips() {
        let c = Coefficient::from_u128(123);
        let scaled = c.mul_pow10(40);
        assert!(matches!(scaled, Coefficient::Big(_)));
        let (q, r) = scaled.div_rem_pow10(40);
        assert_eq!(q, c);
        assert_eq!(r, Coefficient::ZERO);
    }
}
