//! Property-based tests for the balance chain primitive.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::chain::recompute_chain;

/// Strategy to generate signed millime deltas (-10,000.000 to 10,000.000).
fn signed_delta() -> impl Strategy<Value = Decimal> {
    (-10_000_000i64..10_000_000i64).prop_map(|millimes| Decimal::new(millimes, 3))
}

/// Strategy to generate a starting balance.
fn starting_balance() -> impl Strategy<Value = Decimal> {
    (-1_000_000_000i64..1_000_000_000i64).prop_map(|millimes| Decimal::new(millimes, 3))
}

/// Strategy to generate an id-tagged delta sequence.
fn delta_sequence() -> impl Strategy<Value = Vec<(i32, Decimal)>> {
    prop::collection::vec(signed_delta(), 0..50)
        .prop_map(|d| d.into_iter().enumerate().map(|(i, v)| (i as i32 + 1, v)).collect())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// The final balance equals the start plus the sum of all deltas.
    #[test]
    fn prop_final_balance_is_start_plus_sum(
        depart in starting_balance(),
        deltas in delta_sequence(),
    ) {
        let chain = recompute_chain(depart, &deltas);
        let total: Decimal = deltas.iter().map(|(_, d)| *d).sum();

        let last = chain.last().map_or(depart, |e| e.apres);
        prop_assert_eq!(last, depart + total);
    }

    /// Every link's `avant` equals the previous link's `apres`.
    #[test]
    fn prop_chain_is_contiguous(
        depart in starting_balance(),
        deltas in delta_sequence(),
    ) {
        let chain = recompute_chain(depart, &deltas);

        if let Some(first) = chain.first() {
            prop_assert_eq!(first.avant, depart);
        }
        for pair in chain.windows(2) {
            prop_assert_eq!(pair[0].apres, pair[1].avant);
        }
    }

    /// Recomputing twice with identical inputs yields identical outputs.
    #[test]
    fn prop_recompute_is_idempotent(
        depart in starting_balance(),
        deltas in delta_sequence(),
    ) {
        let first = recompute_chain(depart, &deltas);
        let second = recompute_chain(depart, &deltas);
        prop_assert_eq!(first, second);
    }

    /// Removing a middle link shifts every later balance by exactly its delta,
    /// preserving the relative deltas of the survivors.
    #[test]
    fn prop_middle_removal_shifts_tail(
        depart in starting_balance(),
        deltas in delta_sequence(),
    ) {
        prop_assume!(deltas.len() >= 3);
        let removed_idx = deltas.len() / 2;
        let removed_delta = deltas[removed_idx].1;

        let full = recompute_chain(depart, &deltas);

        let mut reduced_deltas = deltas.clone();
        reduced_deltas.remove(removed_idx);
        let reduced = recompute_chain(depart, &reduced_deltas);

        for (i, link) in reduced.iter().enumerate().skip(removed_idx) {
            let original = &full[i + 1];
            prop_assert_eq!(link.avant, original.avant - removed_delta);
            prop_assert_eq!(link.apres, original.apres - removed_delta);
        }
    }
}
