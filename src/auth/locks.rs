/// Per-account operation locks
///
/// At most one login operation runs per account. A second one is refused
/// immediately instead of queueing behind the first.
use crate::store::AccountId;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

#[derive(Default)]
pub struct AccountLocks {
    locks: Mutex<HashMap<AccountId, Arc<AsyncMutex<()>>>>,
}

/// Held for the duration of one operation; released on drop
pub struct AccountGuard {
    _guard: OwnedMutexGuard<()>,
}

impl AccountLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` when another operation for the account is in flight
    pub fn try_acquire(&self, account: AccountId) -> Option<AccountGuard> {
        let mut locks = self.locks.lock();
        // Unheld entries only have the map's reference
        locks.retain(|id, lock| *id == account || Arc::strong_count(lock) > 1);

        let lock = locks
            .entry(account)
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone();

        lock.try_lock_owned()
            .ok()
            .map(|guard| AccountGuard { _guard: guard })
    }

    pub fn is_busy(&self, account: AccountId) -> bool {
        self.locks
            .lock()
            .get(&account)
            .map(|lock| lock.try_lock().is_err())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_acquire_rejected() {
        let locks = AccountLocks::new();
        let guard = locks.try_acquire(1).unwrap();
        assert!(locks.try_acquire(1).is_none());
        assert!(locks.is_busy(1));
        drop(guard);
        assert!(!locks.is_busy(1));
        assert!(locks.try_acquire(1).is_some());
    }

    #[test]
    fn test_accounts_independent() {
        let locks = AccountLocks::new();
        let _a = locks.try_acquire(1).unwrap();
        assert!(locks.try_acquire(2).is_some());
    }

    #[test]
    fn test_released_entries_pruned() {
        let locks = AccountLocks::new();
        drop(locks.try_acquire(1));
        drop(locks.try_acquire(2));
        assert_eq!(locks.locks.lock().len(), 1);
    }
}
