//! Direction rules, non-negative guard, and edit inversion for the register.

use cogest_shared::types::montant_valide;
use rust_decimal::Decimal;

use super::types::{Direction, OperationKind};
use crate::ledger::LedgerError;

/// Returns true if the operation adds to the register balance.
///
/// Versement and "autre/plus" add; retrait, paiement_client and
/// "autre/moins" subtract. "Autre" without an explicit direction is
/// rejected.
pub fn is_credit(kind: OperationKind, sens: Option<Direction>) -> Result<bool, LedgerError> {
    match kind {
        OperationKind::Versement => Ok(true),
        OperationKind::Retrait | OperationKind::PaiementClient => Ok(false),
        OperationKind::Autre => match sens {
            Some(Direction::Plus) => Ok(true),
            Some(Direction::Moins) => Ok(false),
            None => Err(LedgerError::MissingDirection),
        },
    }
}

/// Signed balance delta of an operation.
pub fn signed_amount(
    kind: OperationKind,
    sens: Option<Direction>,
    montant: Decimal,
) -> Result<Decimal, LedgerError> {
    if is_credit(kind, sens)? {
        Ok(montant)
    } else {
        Ok(-montant)
    }
}

/// Applies an operation to a balance, enforcing the register guards.
///
/// The amount must be strictly positive and the resulting balance must not
/// go negative; either violation rejects the whole operation (no partial
/// execution).
pub fn apply_operation(
    avant: Decimal,
    kind: OperationKind,
    sens: Option<Direction>,
    montant: Decimal,
) -> Result<Decimal, LedgerError> {
    if !montant_valide(montant) {
        return Err(LedgerError::NonPositiveAmount(montant));
    }

    let apres = avant + signed_amount(kind, sens, montant)?;
    if apres < Decimal::ZERO {
        return Err(LedgerError::InsufficientFunds {
            disponible: avant,
            demande: montant,
        });
    }

    Ok(apres)
}

/// Derives the balance before an existing operation by inverting its
/// effect on the current balance: credit ops subtract their amount back,
/// debit ops add it back. Used by the edit path.
pub fn balance_before(
    courant: Decimal,
    kind: OperationKind,
    sens: Option<Direction>,
    montant: Decimal,
) -> Result<Decimal, LedgerError> {
    Ok(courant - signed_amount(kind, sens, montant)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_direction_rules() {
        assert_eq!(is_credit(OperationKind::Versement, None), Ok(true));
        assert_eq!(is_credit(OperationKind::Retrait, None), Ok(false));
        assert_eq!(is_credit(OperationKind::PaiementClient, None), Ok(false));
        assert_eq!(
            is_credit(OperationKind::Autre, Some(Direction::Plus)),
            Ok(true)
        );
        assert_eq!(
            is_credit(OperationKind::Autre, Some(Direction::Moins)),
            Ok(false)
        );
        assert_eq!(
            is_credit(OperationKind::Autre, None),
            Err(LedgerError::MissingDirection)
        );
    }

    #[test]
    fn test_apply_versement_adds() {
        let apres =
            apply_operation(dec!(1000.000), OperationKind::Versement, None, dec!(200.000)).unwrap();
        assert_eq!(apres, dec!(1200.000));
    }

    #[test]
    fn test_apply_retrait_subtracts() {
        let apres =
            apply_operation(dec!(1200.000), OperationKind::Retrait, None, dec!(300.000)).unwrap();
        assert_eq!(apres, dec!(900.000));
    }

    #[test]
    fn test_insufficient_funds_rejected() {
        // Balance 100.000, withdrawal of 150.000: rejected, nothing applied.
        let result = apply_operation(dec!(100.000), OperationKind::Retrait, None, dec!(150.000));
        assert_eq!(
            result,
            Err(LedgerError::InsufficientFunds {
                disponible: dec!(100.000),
                demande: dec!(150.000),
            })
        );
    }

    #[test]
    fn test_non_positive_amount_rejected() {
        assert_eq!(
            apply_operation(dec!(100), OperationKind::Versement, None, dec!(0)),
            Err(LedgerError::NonPositiveAmount(dec!(0)))
        );
        assert_eq!(
            apply_operation(dec!(100), OperationKind::Versement, None, dec!(-5)),
            Err(LedgerError::NonPositiveAmount(dec!(-5)))
        );
    }

    #[test]
    fn test_withdrawal_to_exactly_zero_is_allowed() {
        let apres =
            apply_operation(dec!(100.000), OperationKind::Retrait, None, dec!(100.000)).unwrap();
        assert_eq!(apres, dec!(0.000));
    }

    #[test]
    fn test_balance_before_inverts_apply() {
        let avant = dec!(750.000);
        let apres =
            apply_operation(avant, OperationKind::Autre, Some(Direction::Plus), dec!(50)).unwrap();
        let recovered =
            balance_before(apres, OperationKind::Autre, Some(Direction::Plus), dec!(50)).unwrap();
        assert_eq!(recovered, avant);
    }
}
