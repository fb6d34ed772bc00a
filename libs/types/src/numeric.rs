//! Fixed-point accounting amounts
//!
//! Ledger balances are unsigned integers in accounting-currency minor units
//! with 6 fractional digits (1.000000 unit = 1_000_000). `rust_decimal` is
//! used only at the edges: configuration values and human-readable output.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Amount in accounting-currency minor units.
pub type Amount = u128;

/// Number of fractional digits carried by an [`Amount`].
pub const ACCOUNTING_SCALE: u32 = 6;

/// Minor units per whole accounting unit.
pub const UNIT: Amount = 1_000_000;

/// Convert minor units into a whole-unit decimal.
///
/// Returns `None` if the amount exceeds what `Decimal` can represent
/// (96-bit mantissa).
pub fn to_decimal(amount: Amount) -> Option<Decimal> {
    let mantissa = i128::try_from(amount).ok()?;
    Decimal::try_from_i128_with_scale(mantissa, ACCOUNTING_SCALE).ok()
}

/// Convert a whole-unit decimal into minor units.
///
/// Rejects negative values and values with more than 6 fractional digits
/// rather than rounding them.
pub fn from_decimal(value: Decimal) -> Option<Amount> {
    if value.is_sign_negative() && !value.is_zero() {
        return None;
    }
    let scaled = value.checked_mul(Decimal::from(UNIT as u64))?;
    if !scaled.fract().is_zero() {
        return None;
    }
    scaled.trunc().to_u128()
}

/// Render minor units as a decimal string with all 6 fractional digits.
pub fn format_units(amount: Amount) -> String {
    format!("{}.{:06}", amount / UNIT, amount % UNIT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_to_decimal() {
        assert_eq!(to_decimal(5_000_000_000), Some(Decimal::from(5000)));
        assert_eq!(to_decimal(1), Some(Decimal::from_str("0.000001").unwrap()));
        assert_eq!(to_decimal(0), Some(Decimal::ZERO));
    }

    #[test]
    fn test_to_decimal_out_of_range() {
        assert_eq!(to_decimal(u128::MAX), None);
    }

    #[test]
    fn test_from_decimal() {
        assert_eq!(from_decimal(Decimal::from_str("5000.00").unwrap()), Some(5_000_000_000));
        assert_eq!(from_decimal(Decimal::from_str("0.5").unwrap()), Some(500_000));
        assert_eq!(from_decimal(Decimal::ZERO), Some(0));
    }

    #[test]
    fn test_from_decimal_rejects_sub_unit_precision() {
        assert_eq!(from_decimal(Decimal::from_str("0.0000001").unwrap()), None);
    }

    #[test]
    fn test_from_decimal_rejects_negative() {
        assert_eq!(from_decimal(Decimal::from(-1)), None);
    }

    #[test]
    fn test_format_units() {
        assert_eq!(format_units(1_500_000_000), "1500.000000");
        assert_eq!(format_units(42), "0.000042");
    }

    mod fuzz {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// A seventh fractional digit is never silently rounded away.
            #[test]
            fn fuzz_seventh_digit_rejected(
                units in 0i128..1_000_000_000_000i128,
                digit in 1i128..10i128,
            ) {
                let value = Decimal::try_from_i128_with_scale(units * 10 + digit, 7).unwrap();
                prop_assert_eq!(from_decimal(value), None);
            }
        }
    }
}
