use anyhow::{Context, Result};
use lmdb::{Database, DatabaseFlags, Environment, Transaction, WriteFlags};
use std::path::Path;
use tracing;

use super::{KeyValueStore, Namespace};
use crate::config::StorageConfig;
use crate::error::StoreError;

/// LMDB-backed key-value store
///
/// Each namespace lives in its own named database inside one LMDB
/// environment:
/// - market_rates: exchange rates keyed by currency code
/// - market_tickers: tickers keyed by derived asset key
///
/// Value format: JSON serialized record
pub struct LmdbStore {
    env: Environment,
    db_rates: Database,
    db_tickers: Database,
}

impl LmdbStore {
    /// Open (or create) the LMDB environment with default settings
    ///
    /// # Arguments
    /// * `db_path` - Path to LMDB directory, created if missing
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let config = StorageConfig {
            lmdb_path: db_path.as_ref().to_path_buf(),
            ..StorageConfig::default()
        };
        Self::open(&config)
    }

    /// Open (or create) the LMDB environment described by `config`
    pub fn open(config: &StorageConfig) -> Result<Self> {
        let db_path = config.lmdb_path.as_path();

        std::fs::create_dir_all(db_path).with_context(|| {
            format!("Failed to create LMDB directory: {}", db_path.display())
        })?;

        tracing::info!("Opening LMDB read-write at: {}", db_path.display());

        let env = Environment::new()
            .set_max_dbs(config.max_dbs)
            .set_map_size(config.map_size)
            .open(db_path)
            .context("Failed to open LMDB environment")?;

        let db_rates = env
            .create_db(Some(Namespace::Rates.as_str()), DatabaseFlags::empty())
            .context("Failed to open market_rates database")?;

        let db_tickers = env
            .create_db(Some(Namespace::Tickers.as_str()), DatabaseFlags::empty())
            .context("Failed to open market_tickers database")?;

        tracing::info!("Successfully opened both LMDB market databases");

        Ok(Self {
            env,
            db_rates,
            db_tickers,
        })
    }

    fn database(&self, namespace: Namespace) -> Database {
        match namespace {
            Namespace::Rates => self.db_rates,
            Namespace::Tickers => self.db_tickers,
        }
    }
}

fn backend_error(context: &str, err: lmdb::Error) -> StoreError {
    StoreError::Backend(format!("{}: {}", context, err))
}

impl KeyValueStore for LmdbStore {
    fn get(&self, namespace: Namespace, key: &str) -> Result<Vec<u8>, StoreError> {
        let txn = self
            .env
            .begin_ro_txn()
            .map_err(|e| backend_error("Failed to begin read transaction", e))?;

        let value = match txn.get(self.database(namespace), &key) {
            Ok(bytes) => Ok(bytes.to_vec()),
            Err(lmdb::Error::NotFound) => Err(StoreError::NotFound {
                namespace,
                key: key.to_string(),
            }),
            Err(e) => Err(backend_error("LMDB read error", e)),
        };
        value
    }

    fn put(&self, namespace: Namespace, key: &str, value: &[u8]) -> Result<(), StoreError> {
        let mut txn = self
            .env
            .begin_rw_txn()
            .map_err(|e| backend_error("Failed to begin write transaction", e))?;

        txn.put(self.database(namespace), &key, &value, WriteFlags::empty())
            .map_err(|e| backend_error("LMDB write error", e))?;

        txn.commit()
            .map_err(|e| backend_error("LMDB commit error", e))
    }
}
