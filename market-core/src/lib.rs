pub mod types;

// Re-export commonly used items
pub use types::{
    CoinType, ProviderId, ProviderList, ProviderPriority, Rate, Ticker, TickerPrice,
    TimestampSecs, UNRANKED,
};
