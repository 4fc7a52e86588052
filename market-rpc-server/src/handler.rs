use market_core::{ProviderList, Rate, Ticker};
use market_storage::{derive_key, KeyValueStore, MarketStorage, RateBatchSummary};
use std::sync::Arc;
use std::time::Instant;

use crate::error::RpcError;
use crate::protocol::*;

/// Handler for market storage requests
pub struct MarketHandler {
    storage: MarketStorage<Arc<dyn KeyValueStore>>,
    providers: ProviderList,
}

impl MarketHandler {
    pub fn new(store: Arc<dyn KeyValueStore>, providers: ProviderList) -> Self {
        Self {
            storage: MarketStorage::new(store),
            providers,
        }
    }

    /// Handle a market.submit_ticker request
    pub fn submit_ticker(&self, ticker: Ticker) -> Result<SubmitTickerResponse, RpcError> {
        let key = derive_key(&ticker.coin_name, &ticker.token_id);

        match self.storage.submit_ticker(&ticker, &self.providers) {
            Ok(()) => {
                tracing::debug!("Ticker {} saved from {}", key, ticker.provider());
                Ok(SubmitTickerResponse {
                    accepted: true,
                    key,
                })
            }
            Err(e) => {
                if e.is_rejection() {
                    tracing::info!("Ticker {} from {} rejected: {}", key, ticker.provider(), e);
                } else {
                    tracing::error!("Failed to save ticker {}: {}", key, e);
                }
                Err(e.into())
            }
        }
    }

    /// Handle a market.get_ticker request
    pub fn get_ticker(&self, params: GetTickerRequest) -> Result<Ticker, RpcError> {
        Ok(self.storage.get_ticker(&params.symbol, &params.token_id)?)
    }

    /// Handle a market.submit_rates request
    pub fn submit_rates(&self, rates: Vec<Rate>) -> Result<RateBatchSummary, RpcError> {
        let start = Instant::now();
        let result = self.storage.submit_rates(&rates, &self.providers);
        let duration = start.elapsed().as_millis() as u64;

        match result {
            Ok(summary) => {
                tracing::info!(
                    "Rates saved: total={}, written={}, skipped={}, duration={}ms",
                    summary.total,
                    summary.written,
                    summary.skipped,
                    duration
                );
                Ok(summary)
            }
            Err(e) => {
                tracing::error!("{} (duration={}ms)", e, duration);
                Err(e.into())
            }
        }
    }

    /// Handle a market.get_rate request
    pub fn get_rate(&self, params: GetRateRequest) -> Result<Rate, RpcError> {
        Ok(self.storage.get_rate(&params.currency)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use market_storage::MemoryStore;

    fn handler() -> MarketHandler {
        MarketHandler::new(
            Arc::new(MemoryStore::new()),
            ProviderList::new(["binance", "coingecko", "cmc"]),
        )
    }

    #[test]
    fn test_submit_and_get_ticker() {
        let handler = handler();
        let ticker = Ticker::new("btc", 68000.0, "coingecko", Utc.timestamp_opt(100, 0).unwrap());

        let response = handler.submit_ticker(ticker.clone()).unwrap();
        assert!(response.accepted);
        assert_eq!(response.key, "BTC");

        let stored = handler
            .get_ticker(GetTickerRequest {
                symbol: "BTC".to_string(),
                token_id: String::new(),
            })
            .unwrap();
        assert_eq!(stored, ticker);
    }

    #[test]
    fn test_rejected_ticker_maps_to_rejection_code() {
        let handler = handler();
        handler
            .submit_ticker(Ticker::new("BTC", 68000.0, "binance", Utc.timestamp_opt(100, 0).unwrap()))
            .unwrap();

        let err = handler
            .submit_ticker(Ticker::new("BTC", 1.0, "cmc", Utc.timestamp_opt(200, 0).unwrap()))
            .unwrap_err();
        assert_eq!(err.code(), TICKER_REJECTED);
        assert!(err.data().is_some());
    }

    #[test]
    fn test_missing_rate_maps_to_not_found_code() {
        let err = handler()
            .get_rate(GetRateRequest {
                currency: "EUR".to_string(),
            })
            .unwrap_err();
        assert_eq!(err.code(), RECORD_NOT_FOUND);
    }

    #[test]
    fn test_submit_rates_summary() {
        let handler = handler();
        let summary = handler
            .submit_rates(vec![
                Rate::new("EUR", 0.92, "binance", 100),
                Rate::new("GBP", 0.79, "binance", 100),
            ])
            .unwrap();
        assert_eq!(summary.written, 2);
        assert_eq!(handler.get_rate(GetRateRequest { currency: "GBP".to_string() }).unwrap().rate, 0.79);
    }
}
