use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::ProviderId;

/// Whether a ticker prices a chain's native coin or a token issued on it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoinType {
    #[default]
    Coin,
    Token,
}

/// Price block of a ticker, including the provider that quoted it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerPrice {
    pub value: f64,
    #[serde(default)]
    pub change_24h: f64,
    #[serde(default)]
    pub currency: String,
    pub provider: ProviderId,
}

/// Latest known price of one asset (a coin, or a token on that coin's chain).
///
/// Stored under the key derived from `coin_name` and `token_id`; a later
/// accepted write replaces the whole record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticker {
    // ═══════════════════════════════════════════════════
    // IDENTIFICATION
    // ═══════════════════════════════════════════════════
    #[serde(default)]
    pub coin: u32,
    pub coin_name: String,
    /// Empty for the base asset
    #[serde(default)]
    pub token_id: String,
    #[serde(default, rename = "type")]
    pub coin_type: CoinType,

    // ═══════════════════════════════════════════════════
    // PRICE
    // ═══════════════════════════════════════════════════
    pub price: TickerPrice,
    pub last_update: DateTime<Utc>,
}

impl Ticker {
    /// Create a base-asset ticker quoted in USD
    pub fn new(
        coin_name: impl Into<String>,
        value: f64,
        provider: impl Into<ProviderId>,
        last_update: DateTime<Utc>,
    ) -> Self {
        Self {
            coin: 0,
            coin_name: coin_name.into(),
            token_id: String::new(),
            coin_type: CoinType::Coin,
            price: TickerPrice {
                value,
                change_24h: 0.0,
                currency: "USD".to_string(),
                provider: provider.into(),
            },
            last_update,
        }
    }

    /// Turn this ticker into a token ticker on the same chain
    pub fn with_token(mut self, token_id: impl Into<String>) -> Self {
        self.token_id = token_id.into();
        self.coin_type = if self.token_id.is_empty() {
            CoinType::Coin
        } else {
            CoinType::Token
        };
        self
    }

    pub fn provider(&self) -> &str {
        &self.price.provider
    }

    pub fn is_token(&self) -> bool {
        !self.token_id.is_empty()
    }
}
