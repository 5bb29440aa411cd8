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
use std::error::Error;
use std::hash::{Hash, Hasher};
use std::panic;

use decten::{ConditionError, Decimal, Hook, NoOp, Rounding, Throw};

/// Three digits, half-up, matching the coarse scenarios below.
struct P3;

impl Hook for P3 {
    const PRECISION: u32 = 3;
}

/// Sixty-four digits for the long-coefficient scenarios.
struct P64;

impl Hook for P64 {
    const PRECISION: u32 = 64;
}

struct FloorP9;

impl Hook for FloorP9 {
    const ROUNDING: Rounding = Rounding::Floor;
}

/// A policy with exponent bounds small enough to trip in tests.
struct Tight;

impl Hook for Tight {
    const PRECISION: u32 = 3;
    const MAX_EXPONENT: i64 = 5;
    const MIN_EXPONENT: i64 = -5;
}

/// Like [`Tight`] but truncating, so overflow caps at the largest finite
/// value instead of infinity.
struct TightDown;

impl Hook for TightDown {
    const PRECISION: u32 = 3;
    const ROUNDING: Rounding = Rounding::Down;
    const MAX_EXPONENT: i64 = 5;
    const MIN_EXPONENT: i64 = -5;
}

fn dec(s: &str) -> Decimal {
    Decimal::parse(s)
}

#[derive(Default)]
struct ValidatingHasher {
    bytes: Vec<u8>,
}

impl Hasher for ValidatingHasher {
    fn write(&mut self, bytes: &[u8]) {
        self.bytes.extend(bytes)
    }

    fn finish(&self) -> u64 {
        unimplemented!()
    }
}

fn hash_data<H>(h: H) -> Vec<u8>
where
    H: Hash,
{
    let mut hasher = ValidatingHasher::default();
    h.hash(&mut hasher);
    hasher.bytes
}

const ORDER_TESTS: &[(&str, &str, Ordering)] = &[
    ("1.2", "1.2", Ordering::Equal),
    ("1.2", "1.200", Ordering::Equal),
    ("1", "2", Ordering::Less),
    ("2", "1", Ordering::Greater),
    ("-1", "1", Ordering::Less),
    ("-0", "+0", Ordering::Equal),
    ("0.000", "0E5", Ordering::Equal),
    ("22.000", "22", Ordering::Equal),
    ("NaN", "NaN", Ordering::Equal),
    ("-NaN", "NaN", Ordering::Less),
    ("NaN", "1", Ordering::Less),
    ("NaN", "-1e20", Ordering::Less),
    ("-NaN", "-Inf", Ordering::Greater),
    ("-Inf", "-NaN", Ordering::Less),
    ("-Inf", "-1e999", Ordering::Less),
    ("Inf", "NaN", Ordering::Greater),
    ("Inf", "1e999", Ordering::Greater),
    ("Infinity", "Inf", Ordering::Equal),
];

#[test]
fn test_total_order() -> Result<(), Box<dyn Error>> {
    for (lhs, rhs, expected) in ORDER_TESTS {
        println!("cmp({}, {}): expected {:?}", lhs, rhs, expected);
        let lhs: Decimal = lhs.parse()?;
        let rhs: Decimal = rhs.parse()?;
        assert_eq!(lhs.cmp(&rhs), *expected);
        assert_eq!(rhs.cmp(&lhs), expected.reverse());
        assert_eq!(lhs == rhs, *expected == Ordering::Equal);

        if lhs == rhs && hash_data(&lhs) != hash_data(&rhs) {
            panic!("{} and {} are equal but hashes are not equal", lhs, rhs);
        } else if lhs != rhs && hash_data(&lhs) == hash_data(&rhs) {
            panic!("{} and {} are not equal but hashes are equal", lhs, rhs);
        }
    }
    Ok(())
}

#[test]
fn test_sorting() -> Result<(), Box<dyn Error>> {
    let mut values: Vec<Decimal> = ["1", "-Inf", "NaN", "-NaN", "0", "-3.5", "Inf", "2e2"]
        .iter()
        .map(|s| s.parse())
        .collect::<Result<_, _>>()?;
    values.sort();
    let sorted: Vec<String> = values.iter().map(|d| d.to_string()).collect();
    assert_eq!(
        sorted,
        ["-Infinity", "-NaN", "NaN", "-3.5", "0", "1", "200"]
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
    );
    Ok(())
}

#[test]
fn test_subtraction_of_tiny_operands() {
    let diff = dec("1.23E-10") - dec("2.00E-10");
    assert_eq!(diff.to_string(), "-0.000000000077");
    assert!(!diff.status().any());
}

#[test]
fn test_coarse_addition_rounds_half_up() {
    let sum = Decimal::<P3>::parse("0.999E-2") + Decimal::<P3>::parse("0.1E-2");
    assert_eq!(sum.to_string(), "0.0110");
    assert!(sum.status().inexact());
    assert!(sum.status().rounded());
}

#[test]
fn test_division_rounds_to_precision() {
    let q = dec("1") / dec("3");
    assert_eq!(q.to_string(), "0.333333333");
    assert!(q.status().inexact());
    assert!(q.status().rounded());
}

#[test]
fn test_high_precision_alignment() {
    let sum = Decimal::<P64>::parse("1e-50") + Decimal::<P64>::parse("4e-50");
    assert_eq!(sum.to_string(), format!("0.{}5", "0".repeat(49)));
    assert!(!sum.status().any());

    let diff = Decimal::<P64>::parse("10000e+9") - Decimal::<P64>::parse("7");
    assert_eq!(diff.to_string(), "9999999999993");
    assert!(!diff.status().any());
}

#[test]
fn test_nan_propagation_takes_the_first_operand() {
    let sum = dec("NaN") + dec("Inf");
    assert_eq!(sum.to_string(), "NaN");
    assert!(!sum.status().any());

    let sum = dec("1") + dec("-NaN");
    assert_eq!(sum.to_string(), "-NaN");
    assert!(!sum.status().any());
}

#[test]
fn test_infinity_minus_infinity_is_invalid() {
    let diff = dec("Inf") - dec("Inf");
    assert!(diff.is_nan());
    assert!(diff.status().invalid_operation());

    let sum = dec("Inf") + dec("-Inf");
    assert!(sum.is_nan());
    assert!(sum.status().invalid_operation());

    let sum = dec("Inf") + dec("Inf");
    assert!(sum.is_infinite());
    assert!(!sum.status().any());
}

#[test]
fn test_representation_of_small_scientific_input() {
    let d = dec("1.2345678E-7");
    assert_eq!(d.digits(), 8);
    assert_eq!(d.exponent(), -14);
    assert_eq!(d.to_string(), "0.00000012345678");
}

#[test]
fn test_division_by_zero_flags() {
    let q = dec("1") / dec("0");
    assert!(q.is_infinite());
    assert!(!q.is_negative());
    assert!(q.status().division_by_zero());
    assert!(q.status().invalid_operation());

    let q = dec("-1") / dec("0");
    assert!(q.is_infinite());
    assert!(q.is_negative());

    let q = dec("1") / dec("-0");
    assert!(q.is_infinite());
    assert!(q.is_negative());

    let q = dec("0") / dec("0");
    assert!(q.is_nan());
    assert!(q.status().division_by_zero());
    assert!(!q.status().invalid_operation());
}

#[test]
fn test_division_special_operands() {
    let q = dec("Inf") / dec("Inf");
    assert!(q.is_nan());
    assert!(q.status().invalid_operation());

    let q = dec("-Inf") / dec("2");
    assert_eq!(q.to_string(), "-Infinity");
    assert!(!q.status().any());

    let q = dec("2") / dec("-Inf");
    assert!(q.is_zero());
    assert!(q.is_negative());
}

#[test]
fn test_multiplication_specials() {
    let p = dec("0") * dec("Inf");
    assert!(p.is_nan());
    assert!(p.status().invalid_operation());

    let p = dec("Inf") * dec("-3");
    assert_eq!(p.to_string(), "-Infinity");

    let p = dec("-Inf") * dec("-Inf");
    assert_eq!(p.to_string(), "Infinity");

    let p = dec("0") * dec("-0");
    assert!(p.is_zero());
    assert!(p.is_negative());

    let p = dec("1.5") * dec("2");
    assert_eq!(p.to_string(), "3.0");
}

#[test]
fn test_zero_sign_resolution() {
    let sum = dec("-0") + dec("-0");
    assert!(sum.is_zero());
    assert!(sum.is_negative());

    let sum = dec("1") + dec("-1");
    assert!(sum.is_zero());
    assert!(!sum.is_negative());

    let sum = Decimal::<FloorP9>::parse("1") + Decimal::<FloorP9>::parse("-1");
    assert!(sum.is_zero());
    assert!(sum.is_negative());
}

#[test]
fn test_malformed_strings() {
    for s in ["", "+", "-", "1.2.3", "1e", "1e+", "--1", "1ee5", "12a", ".", "sNaN", "1 "] {
        assert!(s.parse::<Decimal>().is_err(), "{s:?} should fail FromStr");
        let d: Decimal = Decimal::parse(s);
        assert!(d.is_nan(), "{s:?} should parse to NaN");
        assert!(d.status().invalid_operation());
    }
}

#[test]
fn test_parse_accepts_grammar_forms() -> Result<(), Box<dyn Error>> {
    assert_eq!("1.".parse::<Decimal>()?.to_string(), "1");
    assert_eq!(".5".parse::<Decimal>()?.to_string(), "0.5");
    assert_eq!("+.5e+2".parse::<Decimal>()?.to_string(), "50");
    assert_eq!("nan123".parse::<Decimal>()?.to_string(), "NaN");
    assert_eq!("INFINITY".parse::<Decimal>()?.to_string(), "Infinity");
    assert_eq!("-inf".parse::<Decimal>()?.to_string(), "-Infinity");
    Ok(())
}

#[test]
fn test_streaming_parse() {
    let chars = "12.5e2".bytes().map(char::from);
    let d = Decimal::<NoOp>::from_chars(chars);
    assert_eq!(d.to_string(), "1250");
}

#[test]
fn test_parse_rounds_long_coefficients() {
    let d = dec("1234567898765");
    assert_eq!(d.to_string(), "1234567900000");
    assert!(d.status().rounded());
    assert!(d.status().inexact());

    let d = dec("1230000000");
    assert_eq!(d.to_string(), "1230000000");
    assert!(d.status().rounded());
    assert!(!d.status().inexact());
}

#[test]
fn test_exponent_clamping() {
    let d = Decimal::<Tight>::parse("1e7");
    assert_eq!(d.to_string(), "10000000");
    assert!(d.status().clamped());
    assert!(!d.status().overflow());
}

#[test]
fn test_overflow_honors_the_rounding_mode() {
    let d = Decimal::<Tight>::parse("1e8");
    assert!(d.is_infinite());
    assert!(d.status().overflow());
    assert!(d.status().inexact());
    assert!(d.status().rounded());

    let d = Decimal::<Tight>::parse("-1e8");
    assert!(d.is_infinite());
    assert!(d.is_negative());

    let d = Decimal::<TightDown>::parse("1e8");
    assert_eq!(d.to_string(), "99900000");
    assert!(d.status().overflow());
}

#[test]
fn test_underflow_and_subnormals() {
    let d = Decimal::<Tight>::parse("99e-6");
    assert_eq!(d.to_string(), "0.00010");
    assert!(d.status().subnormal());
    assert!(d.status().underflow());
    assert!(d.status().inexact());
    assert!(!d.status().clamped());

    let d = Decimal::<Tight>::parse("1e-8");
    assert!(d.is_zero());
    assert_eq!(d.to_string(), "0.00000");
    assert!(d.status().subnormal());
    assert!(d.status().underflow());
    assert!(d.status().clamped());
}

#[test]
fn test_factory_constants() {
    assert_eq!(Decimal::<Tight>::max().to_string(), "99900000");
    assert_eq!(Decimal::<Tight>::min().to_string(), "-0.00001");
    assert!(Decimal::<NoOp>::nan().is_nan());
    assert!(Decimal::<NoOp>::infinity().is_infinite());
    assert!(Decimal::<NoOp>::zero().is_zero());
    assert_eq!(Decimal::<NoOp>::default(), Decimal::<NoOp>::zero());
}

#[test]
fn test_mixed_hook_arithmetic() {
    let fine: Decimal = dec("10.2345");
    let coarse = Decimal::<P3>::parse("1");

    let sum = fine.add(&coarse);
    assert_eq!(sum.to_string(), "11.2345");
    assert!(!sum.status().any());

    let sum = coarse.add(&fine);
    assert_eq!(sum.to_string(), "11.2");
    assert!(sum.status().rounded());
    assert!(sum.status().inexact());

    assert_eq!(coarse.add(&fine), fine.add(&coarse).sub(&dec("0.0345")));
    assert_eq!(Decimal::<P3>::parse("22.000"), dec("22"));
}

#[test]
fn test_compound_assignment() {
    let mut d = dec("1.5");
    d += dec("0.5");
    assert_eq!(d.to_string(), "2.0");
    d -= dec("1.0");
    assert_eq!(d.to_string(), "1.0");
    d *= dec("4");
    assert_eq!(d.to_string(), "4.0");
    d /= dec("8");
    assert_eq!(d.to_string(), "0.5");

    // Increment and decrement are spelled with a unit addend.
    let mut d = dec("41");
    d += Decimal::one();
    assert_eq!(d.to_string(), "42");
    d -= Decimal::one();
    assert_eq!(d.to_string(), "41");
}

#[test]
fn test_negation_and_abs() {
    assert_eq!((-dec("1.5")).to_string(), "-1.5");
    assert_eq!((-dec("-1.5")).to_string(), "1.5");
    assert_eq!((-dec("Inf")).to_string(), "-Infinity");
    assert_eq!((-dec("NaN")).to_string(), "NaN");
    assert_eq!((-dec("-NaN")).to_string(), "-NaN");
    assert_eq!((-dec("0")).to_string(), "0");
    assert_eq!((-dec("-0")).to_string(), "-0");

    assert_eq!(dec("-1.5").abs().to_string(), "1.5");
    assert_eq!(dec("-NaN").abs().to_string(), "NaN");
    assert_eq!(dec("-0").abs().to_string(), "0");
}

#[test]
fn test_additive_inverse_is_zero() {
    for s in ["1.5", "-0.007", "123456789", "4e-12"] {
        let a = dec(s);
        let sum = &a + &(-a.clone());
        assert!(sum.is_zero(), "{s} + -{s} should be zero");
        assert!(!sum.status().any());
    }
}

#[test]
fn test_division_round_trips_near_the_dividend() {
    let a = dec("1");
    let b = dec("3");
    let q = &a / &b;
    let back = &q * &b;
    let error = (&back - &a).abs();
    // The round trip lands within one unit in the quotient's last place.
    let ulp: Decimal = Decimal::parse("1e-9");
    assert!(error <= ulp, "error {error} exceeds {ulp}");

    let a = dec("1");
    let b = dec("7");
    let q = &a / &b;
    let back = &q * &b;
    let error = (&back - &a).abs();
    let ulp: Decimal = Decimal::parse("1e-9");
    assert!(error <= ulp, "error {error} exceeds {ulp}");
}

#[test]
fn test_sum_and_product() {
    let values: Vec<Decimal> = ["0.1", "0.2", "0.3"].iter().map(|s| dec(s)).collect();
    let total: Decimal = values.iter().sum();
    assert_eq!(total.to_string(), "0.6");
    let total: Decimal = values.into_iter().sum();
    assert_eq!(total.to_string(), "0.6");

    let values: Vec<Decimal> = ["1.5", "2", "-4"].iter().map(|s| dec(s)).collect();
    let product: Decimal = values.iter().product();
    assert_eq!(product.to_string(), "-12.0");
}

#[test]
fn test_flags_describe_one_computation_only() {
    let inexact = dec("1") / dec("3");
    assert!(inexact.status().inexact());

    // The flags of an operand do not leak onto a fresh result.
    let sum = &inexact + &dec("1");
    assert!(!sum.status().any());

    let mut d = inexact;
    d.clear_status();
    assert!(!d.status().any());
}

#[test]
fn test_throw_hook_raises_typed_errors() {
    let payload = panic::catch_unwind(|| {
        Decimal::<Throw>::parse("1") / Decimal::<Throw>::parse("0")
    })
    .expect_err("division by zero should raise");
    let condition = payload
        .downcast_ref::<ConditionError>()
        .expect("payload should be a ConditionError");
    assert_eq!(*condition, ConditionError::DivisionByZero);

    let payload = panic::catch_unwind(|| {
        Decimal::<Throw>::parse("Inf") - Decimal::<Throw>::parse("Inf")
    })
    .expect_err("infinity minus infinity should raise");
    let condition = payload
        .downcast_ref::<ConditionError>()
        .expect("payload should be a ConditionError");
    assert_eq!(*condition, ConditionError::InvalidOperation);

    // Inexact results are informational and must not raise.
    let q = panic::catch_unwind(|| {
        Decimal::<Throw>::parse("1") / Decimal::<Throw>::parse("3")
    })
    .expect("inexact division should not raise");
    assert!(q.status().inexact());
}

#[test]
fn test_callbacks_observe_the_populated_result() {
    use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};

    static SAW_FLAGGED_RESULT: AtomicBool = AtomicBool::new(false);

    struct Recording;

    impl Hook for Recording {
        fn on_division_by_zero(result: &Decimal<Self>) {
            SAW_FLAGGED_RESULT.store(
                result.is_infinite() && result.status().division_by_zero(),
                AtomicOrdering::SeqCst,
            );
        }
    }

    let _ = Decimal::<Recording>::parse("1") / Decimal::<Recording>::parse("0");
    assert!(SAW_FLAGGED_RESULT.load(AtomicOrdering::SeqCst));
}

#[test]
fn test_integer_constructors() {
    assert_eq!(Decimal::<NoOp>::from(0u8).to_string(), "0");
    assert_eq!(Decimal::<NoOp>::from(255u8).to_string(), "255");
    assert_eq!(Decimal::<NoOp>::from(-128i8).to_string(), "-128");
    assert_eq!(Decimal::<NoOp>::from(i64::MIN).to_string(), "-9223372040000000000");
    assert_eq!(
        Decimal::<P64>::from(i64::MIN).to_string(),
        i64::MIN.to_string()
    );
    assert_eq!(
        Decimal::<P64>::from(u128::MAX).to_string(),
        u128::MAX.to_string()
    );
    // Conversion is a construction like any other: it rounds.
    let d = Decimal::<NoOp>::from(9_999_999_999u64);
    assert_eq!(d.to_string(), "10000000000");
    assert!(d.status().rounded());
}

#[test]
fn test_boolean_conversion() {
    assert!(!dec("0").to_bool());
    assert!(!dec("0.999999").to_bool());
    assert!(dec("1").to_bool());
    assert!(dec("1.00").to_bool());
    assert!(dec("-2e5").to_bool());
    assert!(dec("NaN").to_bool());
    assert!(dec("-Inf").to_bool());
}

#[test]
fn test_equality_across_representations() {
    assert_eq!(dec("22.000"), dec("22"));
    assert_eq!(dec("1e3"), dec("1000"));
    assert_ne!(dec("1.0"), dec("1.01"));
    assert_eq!(dec("-0"), dec("0"));
    assert_eq!(dec("NaN"), dec("NaN"));
    assert_ne!(dec("-NaN"), dec("NaN"));
}
