//! Per-key lock registry.
//!
//! The engine serializes ledger mutations per user and per transaction.
//! Handles are interned in a map so two requests for the same key share one
//! async mutex, while different keys never contend. Callers must take the
//! user lock before the transaction lock; the fixed order keeps the two
//! registries deadlock-free.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex as StdMutex},
};

use tokio::sync::Mutex;

#[derive(Default)]
pub(crate) struct LockMap {
    inner: StdMutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl LockMap {
    /// Returns the shared lock handle for `key`, creating it on first use.
    pub(crate) fn handle(&self, key: &str) -> Arc<Mutex<()>> {
        let mut guard = match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.entry(key.to_string()).or_default().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_key_shares_one_lock() {
        let locks = LockMap::default();
        let a = locks.handle("user-1");
        let b = locks.handle("user-1");
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn different_keys_do_not_share() {
        let locks = LockMap::default();
        let a = locks.handle("user-1");
        let b = locks.handle("user-2");
        assert!(!Arc::ptr_eq(&a, &b));
    }

    #[tokio::test]
    async fn handle_survives_while_held() {
        let locks = LockMap::default();
        let handle = locks.handle("tx-1");
        let _guard = handle.lock().await;
        // A second handle for the same key must observe the held lock.
        let other = locks.handle("tx-1");
        assert!(other.try_lock().is_err());
    }
}
