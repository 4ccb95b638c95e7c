//! Forward chaining of running balances.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One recomputed link of a balance chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainEntry {
    /// Identifier of the ledger row this link belongs to.
    pub id: i32,
    /// Balance before applying this row's delta.
    pub avant: Decimal,
    /// Balance after applying this row's delta.
    pub apres: Decimal,
}

/// Recomputes a balance chain from a starting balance and ordered signed deltas.
///
/// For every position `i`: `avant_i = apres_{i-1}` (or `depart` for the first
/// link) and `apres_i = avant_i + delta_i`. Pure and idempotent: identical
/// inputs always yield identical outputs.
#[must_use]
pub fn recompute_chain(depart: Decimal, deltas: &[(i32, Decimal)]) -> Vec<ChainEntry> {
    let mut solde = depart;
    let mut out = Vec::with_capacity(deltas.len());

    for &(id, delta) in deltas {
        let avant = solde;
        solde = avant + delta;
        out.push(ChainEntry {
            id,
            avant,
            apres: solde,
        });
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_empty_chain() {
        assert!(recompute_chain(dec!(10), &[]).is_empty());
    }

    #[test]
    fn test_first_link_starts_at_depart() {
        let chain = recompute_chain(dec!(100.000), &[(1, dec!(-30.000))]);
        assert_eq!(chain[0].avant, dec!(100.000));
        assert_eq!(chain[0].apres, dec!(70.000));
    }

    #[test]
    fn test_links_are_contiguous() {
        let deltas = [(1, dec!(-500)), (2, dec!(200)), (3, dec!(-50.500))];
        let chain = recompute_chain(dec!(0), &deltas);

        assert_eq!(chain.len(), 3);
        for pair in chain.windows(2) {
            assert_eq!(pair[0].apres, pair[1].avant);
        }
        assert_eq!(chain[2].apres, dec!(-350.500));
    }

    #[test]
    fn test_middle_deletion_shifts_later_links() {
        // Dropping a 50.000 debit from the middle lifts every later
        // balance by exactly 50.000.
        let full = [(1, dec!(-100.000)), (2, dec!(-50.000)), (3, dec!(-20.000))];
        let reduced = [(1, dec!(-100.000)), (3, dec!(-20.000))];

        let before = recompute_chain(dec!(0), &full);
        let after = recompute_chain(dec!(0), &reduced);

        assert_eq!(after[1].avant, before[2].avant + dec!(50.000));
        assert_eq!(after[1].apres, before[2].apres + dec!(50.000));
    }

    #[test]
    fn test_negative_intermediates_are_allowed() {
        // The primitive never guards; guards belong to the caller.
        let chain = recompute_chain(dec!(10), &[(1, dec!(-25)), (2, dec!(40))]);
        assert_eq!(chain[0].apres, dec!(-15));
        assert_eq!(chain[1].apres, dec!(25));
    }
}
