use std::collections::HashMap;
use std::sync::RwLock;

use super::{KeyValueStore, Namespace};
use crate::error::StoreError;

/// In-process store backed by a locked `HashMap`.
///
/// Used by tests and by callers that do not need persistence.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<(Namespace, String), Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries across all namespaces
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, namespace: Namespace, key: &str) -> Result<Vec<u8>, StoreError> {
        let entries = self
            .entries
            .read()
            .map_err(|e| StoreError::Backend(format!("memory store lock poisoned: {}", e)))?;

        entries
            .get(&(namespace, key.to_string()))
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                namespace,
                key: key.to_string(),
            })
    }

    fn put(&self, namespace: Namespace, key: &str, value: &[u8]) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| StoreError::Backend(format!("memory store lock poisoned: {}", e)))?;

        entries.insert((namespace, key.to_string()), value.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_missing_key() {
        let store = MemoryStore::new();
        let err = store.get(Namespace::Rates, "EUR").unwrap_err();
        assert_eq!(
            err,
            StoreError::NotFound {
                namespace: Namespace::Rates,
                key: "EUR".to_string()
            }
        );
    }

    #[test]
    fn test_namespaces_are_separate() {
        let store = MemoryStore::new();
        store.put(Namespace::Rates, "BTC", b"rate").unwrap();
        store.put(Namespace::Tickers, "BTC", b"ticker").unwrap();

        assert_eq!(store.get(Namespace::Rates, "BTC").unwrap(), b"rate");
        assert_eq!(store.get(Namespace::Tickers, "BTC").unwrap(), b"ticker");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_put_replaces() {
        let store = MemoryStore::new();
        store.put(Namespace::Tickers, "ETH", b"one").unwrap();
        store.put(Namespace::Tickers, "ETH", b"two").unwrap();
        assert_eq!(store.get(Namespace::Tickers, "ETH").unwrap(), b"two");
        assert_eq!(store.len(), 1);
    }
}
