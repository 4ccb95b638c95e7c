//! Carry-forward resolution and year chaining for monthly charges.

use rust_decimal::Decimal;

use crate::ledger::{ChainEntry, recompute_chain};

/// The debit/credit amounts of one charge row, in chain order.
#[derive(Debug, Clone, Copy)]
pub struct ChargeAmounts {
    /// Charge row identifier.
    pub id: i32,
    /// Debit amount (increases client debt).
    pub montant: Decimal,
    /// Credit amount (decreases client debt).
    pub avance: Decimal,
}

/// Signed balance delta of a charge: `avance - montant`.
#[must_use]
pub fn solde_delta(montant: Decimal, avance: Decimal) -> Decimal {
    avance - montant
}

/// Resolves the opening balance of a year from the previous year's rows.
///
/// December of year-1 wins; failing that the latest available row of
/// year-1; failing that the chain opens at zero.
#[must_use]
pub fn carry_in(prev_december: Option<Decimal>, prev_latest: Option<Decimal>) -> Decimal {
    prev_december.or(prev_latest).unwrap_or(Decimal::ZERO)
}

/// Resolves the balance preceding a charge at (annee, mois).
///
/// The latest same-year charge of an earlier month wins; otherwise the
/// previous year's carry-in rules apply.
#[must_use]
pub fn predecessor_balance(
    same_year_before_month: Option<Decimal>,
    prev_december: Option<Decimal>,
    prev_latest: Option<Decimal>,
) -> Decimal {
    same_year_before_month.unwrap_or_else(|| carry_in(prev_december, prev_latest))
}

/// Chains a full year of charges from its carry-in balance.
///
/// `charges` must already be ordered chronologically (mois ascending,
/// creation time then identifier as tie-breaks).
#[must_use]
pub fn chain_for_year(carry: Decimal, charges: &[ChargeAmounts]) -> Vec<ChainEntry> {
    let deltas: Vec<(i32, Decimal)> = charges
        .iter()
        .map(|c| (c.id, solde_delta(c.montant, c.avance)))
        .collect();

    recompute_chain(carry, &deltas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_solde_delta_signs() {
        assert_eq!(solde_delta(dec!(500), dec!(0)), dec!(-500));
        assert_eq!(solde_delta(dec!(0), dec!(200)), dec!(200));
        assert_eq!(solde_delta(dec!(300), dec!(100)), dec!(-200));
    }

    #[test]
    fn test_carry_in_prefers_december() {
        assert_eq!(carry_in(Some(dec!(-120)), Some(dec!(-80))), dec!(-120));
        assert_eq!(carry_in(None, Some(dec!(-80))), dec!(-80));
        assert_eq!(carry_in(None, None), dec!(0));
    }

    #[test]
    fn test_predecessor_prefers_same_year() {
        assert_eq!(
            predecessor_balance(Some(dec!(-50)), Some(dec!(-120)), Some(dec!(-80))),
            dec!(-50)
        );
        assert_eq!(
            predecessor_balance(None, Some(dec!(-120)), None),
            dec!(-120)
        );
        assert_eq!(predecessor_balance(None, None, None), dec!(0));
    }

    #[test]
    fn test_year_chain_debit_then_credit() {
        // month 1: montant=500, month 2: avance=200, carry-in 0
        // expected solde_restant chain: [-500, -300]
        let charges = [
            ChargeAmounts { id: 1, montant: dec!(500), avance: dec!(0) },
            ChargeAmounts { id: 2, montant: dec!(0), avance: dec!(200) },
        ];
        let chain = chain_for_year(dec!(0), &charges);

        assert_eq!(chain[0].apres, dec!(-500));
        assert_eq!(chain[1].apres, dec!(-300));
    }

    #[test]
    fn test_year_chain_final_balance_identity() {
        let charges = [
            ChargeAmounts { id: 1, montant: dec!(150.500), avance: dec!(0) },
            ChargeAmounts { id: 2, montant: dec!(75.250), avance: dec!(20) },
            ChargeAmounts { id: 3, montant: dec!(0), avance: dec!(300.750) },
        ];
        let carry = dec!(-42.000);
        let chain = chain_for_year(carry, &charges);

        let total_montant: Decimal = charges.iter().map(|c| c.montant).sum();
        let total_avance: Decimal = charges.iter().map(|c| c.avance).sum();
        assert_eq!(
            chain.last().unwrap().apres,
            carry - total_montant + total_avance
        );
    }

    #[test]
    fn test_year_chain_recompute_is_idempotent() {
        let charges = [
            ChargeAmounts { id: 7, montant: dec!(10), avance: dec!(0) },
            ChargeAmounts { id: 9, montant: dec!(0), avance: dec!(4.250) },
        ];
        let first = chain_for_year(dec!(5), &charges);
        let second = chain_for_year(dec!(5), &charges);
        assert_eq!(first, second);
    }
}
