use serde::{Deserialize, Serialize};

use crate::types::{ProviderId, TimestampSecs};

/// Exchange rate of one fiat or crypto currency against the reference currency.
///
/// `currency` is the storage key as-is; callers are expected to pass it in
/// canonical (uppercase) form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rate {
    pub currency: String,
    pub rate: f64,
    #[serde(default)]
    pub percent_change_24h: f64,
    pub provider: ProviderId,
    pub timestamp: TimestampSecs,
}

impl Rate {
    pub fn new(
        currency: impl Into<String>,
        rate: f64,
        provider: impl Into<ProviderId>,
        timestamp: TimestampSecs,
    ) -> Self {
        Self {
            currency: currency.into(),
            rate,
            percent_change_24h: 0.0,
            provider: provider.into(),
            timestamp,
        }
    }
}
