//! Label semantics for monthly charges.
//!
//! The free-text `libelle` doubles as a semantic tag: fee-received entries
//! feed the cash register's base valuation, and card-payment entries
//! trigger an automatic register withdrawal. Matching is case-insensitive
//! and tolerant of the accented and unaccented spellings found in legacy
//! data.

use rust_decimal::Decimal;

/// Markers identifying a fee-received entry ("HONORAIRES REÇU").
const FEE_RECEIVED_MARKERS: [&str; 2] = ["HONORAIRES RECU", "HONORAIRES REÇU"];

/// Marker identifying a card-payment expense ("[CARTE BANCAIRE]").
const CARD_MARKER: &str = "CARTE BANCAIRE";

/// Returns true if the label identifies a fee-received entry.
#[must_use]
pub fn is_fee_received(libelle: &str) -> bool {
    let upper = libelle.to_uppercase();
    FEE_RECEIVED_MARKERS.iter().any(|m| upper.contains(m))
}

/// Returns true if the label identifies a card-payment expense.
#[must_use]
pub fn is_card_payment(libelle: &str) -> bool {
    libelle.to_uppercase().contains(CARD_MARKER)
}

/// Returns true if a charge should auto-create a register withdrawal:
/// a card-payment debit (no credit part) that is not itself a fee receipt.
#[must_use]
pub fn triggers_auto_withdrawal(libelle: &str, montant: Decimal, avance: Decimal) -> bool {
    montant > Decimal::ZERO
        && avance == Decimal::ZERO
        && is_card_payment(libelle)
        && !is_fee_received(libelle)
}

/// Returns this charge's contribution to the register base valuation:
/// `max(avance, montant)` for fee-received entries with a positive amount,
/// zero otherwise.
#[must_use]
pub fn base_contribution(libelle: &str, montant: Decimal, avance: Decimal) -> Decimal {
    if is_fee_received(libelle) && (montant > Decimal::ZERO || avance > Decimal::ZERO) {
        avance.max(montant)
    } else {
        Decimal::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case("HONORAIRES REÇU mars", true)]
    #[case("Honoraires recu - dossier 12", true)]
    #[case("honoraires reçu", true)]
    #[case("HONORAIRES 2026", false)]
    #[case("Loyer bureau", false)]
    fn test_is_fee_received(#[case] libelle: &str, #[case] expected: bool) {
        assert_eq!(is_fee_received(libelle), expected);
    }

    #[rstest]
    #[case("[CARTE BANCAIRE] Fournitures", true)]
    #[case("paiement carte bancaire", true)]
    #[case("Virement bancaire", false)]
    fn test_is_card_payment(#[case] libelle: &str, #[case] expected: bool) {
        assert_eq!(is_card_payment(libelle), expected);
    }

    #[test]
    fn test_auto_withdrawal_requires_pure_debit() {
        assert!(triggers_auto_withdrawal(
            "[CARTE BANCAIRE] Fournitures",
            dec!(80),
            dec!(0)
        ));
        // A credit part disables the trigger.
        assert!(!triggers_auto_withdrawal(
            "[CARTE BANCAIRE] Fournitures",
            dec!(80),
            dec!(10)
        ));
        // Fee receipts never trigger a withdrawal, card marker or not.
        assert!(!triggers_auto_withdrawal(
            "HONORAIRES REÇU [CARTE BANCAIRE]",
            dec!(80),
            dec!(0)
        ));
        assert!(!triggers_auto_withdrawal("Loyer", dec!(80), dec!(0)));
    }

    #[test]
    fn test_base_contribution() {
        assert_eq!(
            base_contribution("HONORAIRES REÇU", dec!(0), dec!(250.000)),
            dec!(250.000)
        );
        assert_eq!(
            base_contribution("HONORAIRES RECU", dec!(300), dec!(120)),
            dec!(300)
        );
        assert_eq!(base_contribution("HONORAIRES REÇU", dec!(0), dec!(0)), dec!(0));
        assert_eq!(base_contribution("Loyer", dec!(100), dec!(0)), dec!(0));
    }
}
