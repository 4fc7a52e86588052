pub mod provider;
pub mod rate;
pub mod ticker;

// Re-export common types
pub use provider::{ProviderList, ProviderPriority, UNRANKED};
pub use rate::Rate;
pub use ticker::{CoinType, Ticker, TickerPrice};

/// Timestamp in seconds since Unix epoch
pub type TimestampSecs = i64;

/// Upstream data provider identifier (e.g., "binance", "coinmarketcap")
pub type ProviderId = String;
