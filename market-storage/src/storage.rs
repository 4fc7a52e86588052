use market_core::{ProviderPriority, Rate, Ticker};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing;

use crate::arbitration::arbitrate;
use crate::error::{BatchError, RateFailure, StorageError};
use crate::key::derive_key;
use crate::store::{KeyValueStore, Namespace};

/// Outcome counts of a rate batch that had no store failures
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct RateBatchSummary {
    pub total: usize,
    pub written: usize,
    /// Rates that lost arbitration against the stored value
    pub skipped: usize,
}

/// Arbitrated writer for tickers and exchange rates on top of a key-value store.
///
/// Every write is checked against the currently stored record for the same
/// key (see [`crate::arbitration`]).
///
/// The two paths report a lost arbitration differently: `submit_ticker`
/// returns `StorageError::Rejected`, while `submit_rates` skips the rate
/// silently and only counts store failures.
///
/// # Concurrency
///
/// Safe to share across threads, but the read-decide-write sequence is not
/// atomic. Two concurrent submissions for the same key can both pass
/// arbitration against the same prior record, and whichever physical write
/// lands last wins. Callers needing strict ordering must serialize writes
/// per key themselves.
pub struct MarketStorage<S> {
    store: S,
}

impl<S: KeyValueStore> MarketStorage<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn get_json<T: DeserializeOwned>(&self, namespace: Namespace, key: &str) -> Result<T, StorageError> {
        let bytes = self.store.get(namespace, key)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn put_json<T: Serialize>(&self, namespace: Namespace, key: &str, value: &T) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec(value)?;
        self.store.put(namespace, key, &bytes)?;
        Ok(())
    }

    /// Save a ticker if it wins arbitration against the stored one.
    ///
    /// # Returns
    /// * `Ok(())` - ticker written (first write for the key, or won arbitration)
    /// * `Err(StorageError::Rejected(_))` - lost arbitration, store unchanged
    /// * `Err(_)` - the stored ticker could not be read, or the write failed
    pub fn submit_ticker<P>(&self, ticker: &Ticker, priority: &P) -> Result<(), StorageError>
    where
        P: ProviderPriority + ?Sized,
    {
        let key = derive_key(&ticker.coin_name, &ticker.token_id);

        match self.get_json::<Ticker>(Namespace::Tickers, &key) {
            Ok(existing) => {
                if let Some(rejection) = arbitrate(
                    existing.provider(),
                    &existing.last_update,
                    ticker.provider(),
                    &ticker.last_update,
                    priority,
                ) {
                    tracing::debug!(
                        "Ticker {} from {} rejected: {} (stored from {})",
                        key,
                        ticker.provider(),
                        rejection,
                        existing.provider()
                    );
                    return Err(StorageError::Rejected(rejection));
                }
            }
            Err(StorageError::NotFound { .. }) => {
                tracing::debug!("First ticker for {} from {}", key, ticker.provider());
            }
            Err(e) => return Err(e),
        }

        self.put_json(Namespace::Tickers, &key, ticker)
    }

    /// Read the stored ticker for an asset
    ///
    /// # Arguments
    /// * `symbol` - Asset symbol, any case
    /// * `token_id` - Sub-unit identifier, empty for the base asset
    pub fn get_ticker(&self, symbol: &str, token_id: &str) -> Result<Ticker, StorageError> {
        let key = derive_key(symbol, token_id);
        self.get_json(Namespace::Tickers, &key)
    }

    /// Save a batch of rates, each independently arbitrated.
    ///
    /// Rates that lose arbitration are skipped without error. A stored rate
    /// that cannot be read is overwritten. Write failures are collected per
    /// rate and never stop the batch; nothing is rolled back.
    ///
    /// # Returns
    /// * `Ok(summary)` - no write failures
    /// * `Err(BatchError::Partial)` - some (not all) rates failed to write
    /// * `Err(BatchError::Total)` - every rate in a non-empty batch failed to write
    pub fn submit_rates<P>(&self, rates: &[Rate], priority: &P) -> Result<RateBatchSummary, BatchError>
    where
        P: ProviderPriority + ?Sized,
    {
        let mut summary = RateBatchSummary {
            total: rates.len(),
            ..RateBatchSummary::default()
        };
        let mut failures = Vec::new();

        for rate in rates {
            match self.get_json::<Rate>(Namespace::Rates, &rate.currency) {
                Ok(existing) => {
                    if let Some(rejection) = arbitrate(
                        &existing.provider,
                        &existing.timestamp,
                        &rate.provider,
                        &rate.timestamp,
                        priority,
                    ) {
                        tracing::debug!(
                            "Skipping rate {} from {}: {}",
                            rate.currency,
                            rate.provider,
                            rejection
                        );
                        summary.skipped += 1;
                        continue;
                    }
                }
                Err(StorageError::NotFound { .. }) => {}
                Err(e) => {
                    // Unreadable stored value: overwrite it
                    tracing::warn!(
                        "Failed to read stored rate {}, writing without arbitration: {}",
                        rate.currency,
                        e
                    );
                }
            }

            if let Err(e) = self.put_json(Namespace::Rates, &rate.currency, rate) {
                tracing::error!(
                    "Failed to write rate {} from {}: {}",
                    rate.currency,
                    rate.provider,
                    e
                );
                failures.push(RateFailure {
                    rate: rate.clone(),
                    reason: e.to_string(),
                });
                continue;
            }

            summary.written += 1;
        }

        if !failures.is_empty() && failures.len() == summary.total {
            return Err(BatchError::Total {
                total: summary.total,
                failures,
            });
        }

        if !failures.is_empty() {
            return Err(BatchError::Partial {
                total: summary.total,
                failures,
            });
        }

        tracing::debug!(
            "Saved rates: {} written, {} skipped of {}",
            summary.written,
            summary.skipped,
            summary.total
        );

        Ok(summary)
    }

    /// Read the stored rate for a currency code (used verbatim as key)
    pub fn get_rate(&self, currency: &str) -> Result<Rate, StorageError> {
        self.get_json(Namespace::Rates, currency)
    }
}
