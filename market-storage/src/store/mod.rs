pub mod lmdb_store;
pub mod memory;

use std::fmt;
use std::sync::Arc;

use crate::error::StoreError;

// Re-export commonly used items
pub use lmdb_store::LmdbStore;
pub use memory::MemoryStore;

/// Logical partition of the key-value store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    Rates,
    Tickers,
}

impl Namespace {
    /// Name of the backing database for this namespace
    pub fn as_str(&self) -> &'static str {
        match self {
            Namespace::Rates => "market_rates",
            Namespace::Tickers => "market_tickers",
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Namespaced key-value store with atomic single-key get and put.
///
/// No atomicity is assumed across a `get` followed by a `put`.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, or `StoreError::NotFound`
    fn get(&self, namespace: Namespace, key: &str) -> Result<Vec<u8>, StoreError>;

    /// Insert or replace the value stored under `key`
    fn put(&self, namespace: Namespace, key: &str, value: &[u8]) -> Result<(), StoreError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, namespace: Namespace, key: &str) -> Result<Vec<u8>, StoreError> {
        (**self).get(namespace, key)
    }

    fn put(&self, namespace: Namespace, key: &str, value: &[u8]) -> Result<(), StoreError> {
        (**self).put(namespace, key, value)
    }
}
