//! Per-address serialization of spends.
//!
//! Two runs that read the same UTXO snapshot pick the same entries and one
//! of their submissions is rejected as a double spend. Holding an address
//! lock across fetch, generate, sign and submit rules that out within one
//! process.

use std::collections::HashMap;
use std::sync::Arc;

use kas_script::Address;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

/// Registry of one async mutex per funding address.
#[derive(Clone, Debug, Default)]
pub struct AddressLocks {
    locks: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl AddressLocks {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive use of `address`.
    ///
    /// The lock is released when the guard is dropped.
    pub async fn lock(&self, address: &Address) -> OwnedMutexGuard<()> {
        let key = address.to_string();
        let lock = {
            let mut locks = self.locks.lock().await;
            // Entries referenced only by the registry have no holder or waiter.
            locks.retain(|_, l| Arc::strong_count(l) > 1);
            locks.entry(key.clone()).or_default().clone()
        };
        debug!(address = %key, "waiting for address lock");
        lock.lock_owned().await
    }

    /// Whether `address` is currently held.
    pub async fn is_locked(&self, address: &Address) -> bool {
        let locks = self.locks.lock().await;
        locks
            .get(&address.to_string())
            .map(|l| l.try_lock().is_err())
            .unwrap_or(false)
    }

    /// Number of addresses currently tracked by the registry.
    pub async fn len(&self) -> usize {
        self.locks.lock().await.len()
    }

    /// Whether no address is tracked.
    pub async fn is_empty(&self) -> bool {
        self.locks.lock().await.is_empty()
    }
}
