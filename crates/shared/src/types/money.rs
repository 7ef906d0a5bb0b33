//! Money helpers with decimal precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! All amounts are `rust_decimal::Decimal` at currency scale 2.

use rust_decimal::{Decimal, RoundingStrategy};

/// The currency scale for all stored amounts (2 decimal places).
pub const CURRENCY_SCALE: u32 = 2;

/// Rounds an amount to currency scale using Banker's Rounding.
#[must_use]
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::MidpointNearestEven)
}

/// Returns true if the amount is valid for a fee or expense:
/// non-negative, where negative zero counts as zero.
#[must_use]
pub fn is_valid_amount(amount: Decimal) -> bool {
    !amount.is_sign_negative() || amount.is_zero()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_cents() {
        assert_eq!(round_cents(dec!(10)), dec!(10.00));
        assert_eq!(round_cents(dec!(10.005)), dec!(10.00)); // banker's: to even
        assert_eq!(round_cents(dec!(10.015)), dec!(10.02));
        assert_eq!(round_cents(dec!(10.999)), dec!(11.00));
    }

    #[test]
    fn test_is_valid_amount() {
        assert!(is_valid_amount(dec!(0)));
        assert!(is_valid_amount(dec!(10.00)));
        assert!(is_valid_amount(dec!(-0.00))); // negative zero is still zero
        assert!(!is_valid_amount(dec!(-0.01)));
    }
}
