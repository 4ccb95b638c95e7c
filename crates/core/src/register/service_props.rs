//! Property-based tests for register operation rules.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::service::{apply_operation, balance_before, signed_amount};
use super::types::{Direction, OperationKind};
use crate::ledger::recompute_chain;

/// Strategy to generate positive millime amounts (0.001 to 10,000.000).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|millimes| Decimal::new(millimes, 3))
}

/// Strategy to generate non-negative balances.
fn balance() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000_000i64).prop_map(|millimes| Decimal::new(millimes, 3))
}

/// Strategy to generate a fully-directed operation shape.
fn operation_shape() -> impl Strategy<Value = (OperationKind, Option<Direction>)> {
    prop_oneof![
        Just((OperationKind::Retrait, None)),
        Just((OperationKind::Versement, None)),
        Just((OperationKind::PaiementClient, None)),
        Just((OperationKind::Autre, Some(Direction::Plus))),
        Just((OperationKind::Autre, Some(Direction::Moins))),
    ]
}

proptest! {
    // `prop_rejection_is_total` filters on `montant > avant`, which accepts
    // only a small fraction of draws; give the assume a large reject budget.
    #![proptest_config(ProptestConfig {
        max_global_rejects: 1_000_000,
        ..ProptestConfig::with_cases(200)
    })]

    /// A successful apply never yields a negative balance.
    #[test]
    fn prop_apply_never_goes_negative(
        avant in balance(),
        (kind, sens) in operation_shape(),
        montant in positive_amount(),
    ) {
        if let Ok(apres) = apply_operation(avant, kind, sens, montant) {
            prop_assert!(apres >= Decimal::ZERO);
        }
    }

    /// apply then invert recovers the original balance exactly.
    #[test]
    fn prop_inversion_roundtrip(
        avant in balance(),
        (kind, sens) in operation_shape(),
        montant in positive_amount(),
    ) {
        if let Ok(apres) = apply_operation(avant, kind, sens, montant) {
            prop_assert_eq!(balance_before(apres, kind, sens, montant).unwrap(), avant);
        }
    }

    /// A rejected apply leaves nothing to persist: the error carries the
    /// untouched balance.
    #[test]
    fn prop_rejection_is_total(
        avant in balance(),
        montant in positive_amount(),
    ) {
        prop_assume!(montant > avant);
        let err = apply_operation(avant, OperationKind::Retrait, None, montant).unwrap_err();
        prop_assert_eq!(
            err,
            crate::ledger::LedgerError::InsufficientFunds { disponible: avant, demande: montant }
        );
    }

    /// Editing link k and re-chaining only the tail (the subsequent-recompute
    /// path) reproduces the chain a full from-scratch rebuild would produce.
    #[test]
    fn prop_tail_recompute_equals_full_rebuild(
        depart in balance(),
        amounts in prop::collection::vec(positive_amount(), 3..12),
        new_amount in positive_amount(),
    ) {
        let k = amounts.len() / 2;

        let edited: Vec<(i32, Decimal)> = amounts
            .iter()
            .enumerate()
            .map(|(i, m)| {
                let m = if i == k { new_amount } else { *m };
                let delta = signed_amount(OperationKind::Versement, None, m).unwrap();
                (i as i32 + 1, delta)
            })
            .collect();

        // Full rebuild of the modified sequence.
        let full = recompute_chain(depart, &edited);

        // Edit path: chain up to and including k from the original prefix,
        // then seed the tail from link k's new `apres` only.
        let prefix = recompute_chain(depart, &edited[..=k]);
        let seed = prefix.last().unwrap().apres;
        let tail = recompute_chain(seed, &edited[k + 1..]);

        let stitched: Vec<_> = prefix.into_iter().chain(tail).collect();
        prop_assert_eq!(stitched, full);
    }
}
