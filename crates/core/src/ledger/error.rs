//! Ledger error types.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur while applying ledger rules.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    /// Operation amounts must be strictly positive.
    #[error("Operation amount must be strictly positive, got {0}")]
    NonPositiveAmount(Decimal),

    /// "Autre" operations require an explicit direction.
    #[error("Operation of type 'autre' requires a direction (plus/moins)")]
    MissingDirection,

    /// The register balance would go negative.
    #[error("Insufficient register funds: available {disponible}, requested {demande}")]
    InsufficientFunds {
        /// Balance available before the operation.
        disponible: Decimal,
        /// Amount the operation would withdraw.
        demande: Decimal,
    },
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NonPositiveAmount(_) => "NON_POSITIVE_AMOUNT",
            Self::MissingDirection => "MISSING_DIRECTION",
            Self::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            LedgerError::NonPositiveAmount(dec!(0)).error_code(),
            "NON_POSITIVE_AMOUNT"
        );
        assert_eq!(LedgerError::MissingDirection.error_code(), "MISSING_DIRECTION");
        assert_eq!(
            LedgerError::InsufficientFunds {
                disponible: dec!(100),
                demande: dec!(150),
            }
            .error_code(),
            "INSUFFICIENT_FUNDS"
        );
    }

    #[test]
    fn test_insufficient_funds_display() {
        let err = LedgerError::InsufficientFunds {
            disponible: dec!(100.000),
            demande: dec!(150.000),
        };
        assert_eq!(
            err.to_string(),
            "Insufficient register funds: available 100.000, requested 150.000"
        );
    }
}
