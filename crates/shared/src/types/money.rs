//! Money helpers with millime precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! All amounts are Tunisian Dinar with 3 fractional digits (millimes),
//! represented as `rust_decimal::Decimal`.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of fractional digits for Tunisian Dinar amounts (millimes).
pub const DINAR_DP: u32 = 3;

/// Quantizes an amount to millime precision using Banker's Rounding.
#[must_use]
pub fn normalize(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(DINAR_DP, RoundingStrategy::MidpointNearestEven)
}

/// Returns true if the amount is a valid positive operation amount.
#[must_use]
pub fn montant_valide(amount: Decimal) -> bool {
    amount > Decimal::ZERO
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_normalize_keeps_millimes() {
        assert_eq!(normalize(dec!(12.345)), dec!(12.345));
        assert_eq!(normalize(dec!(12)), dec!(12));
    }

    #[test]
    fn test_normalize_rounds_half_to_even() {
        assert_eq!(normalize(dec!(1.0005)), dec!(1.000));
        assert_eq!(normalize(dec!(1.0015)), dec!(1.002));
        assert_eq!(normalize(dec!(1.00149)), dec!(1.001));
    }

    #[test]
    fn test_montant_valide() {
        assert!(montant_valide(dec!(0.001)));
        assert!(!montant_valide(Decimal::ZERO));
        assert!(!montant_valide(dec!(-5)));
    }
}
