//! Process-wide recompute locks.
//!
//! Two concurrent writers recomputing overlapping chain ranges can
//! interleave incorrectly, so mutating ledger operations serialize here
//! in addition to their database transaction: at most one in-flight
//! recompute per (client, annee) for the charge ledger, and one for the
//! register ledger globally.

use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::Lazy;
use tokio::sync::Mutex;

static CHARGE_LOCKS: Lazy<DashMap<(i32, i32), Arc<Mutex<()>>>> = Lazy::new(DashMap::new);

static CAISSE_LOCK: Lazy<Arc<Mutex<()>>> = Lazy::new(|| Arc::new(Mutex::new(())));

/// Returns the lock guarding charge recomputation for (client, annee).
///
/// Lock entries are never evicted; the set of (client, year) pairs a
/// deployment touches is small and bounded.
#[must_use]
pub fn charge_year_lock(client_id: i32, annee: i32) -> Arc<Mutex<()>> {
    CHARGE_LOCKS
        .entry((client_id, annee))
        .or_insert_with(|| Arc::new(Mutex::new(())))
        .clone()
}

/// Returns the single lock guarding register recomputation.
#[must_use]
pub fn caisse_lock() -> Arc<Mutex<()>> {
    CAISSE_LOCK.clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_key_yields_same_lock() {
        let a = charge_year_lock(1, 2026);
        let b = charge_year_lock(1, 2026);
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_distinct_keys_yield_distinct_locks() {
        let a = charge_year_lock(1, 2026);
        let b = charge_year_lock(1, 2027);
        let c = charge_year_lock(2, 2026);
        assert!(!Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
    }

    #[tokio::test]
    async fn test_caisse_lock_is_global() {
        let a = caisse_lock();
        let b = caisse_lock();
        assert!(Arc::ptr_eq(&a, &b));

        let guard = a.lock().await;
        assert!(b.try_lock().is_err());
        drop(guard);
        assert!(b.try_lock().is_ok());
    }
}
