use crate::types::ProviderId;

/// Rank reported for a provider that has no configured priority
pub const UNRANKED: i32 = -1;

/// Trust ranking over data providers.
///
/// Lower ranks are more trusted. `UNRANKED` (-1) means the provider is
/// unknown. Implementations must be pure lookups: the storage layer asks for
/// a fresh rank on every write decision.
pub trait ProviderPriority {
    fn priority(&self, provider: &str) -> i32;
}

impl<F> ProviderPriority for F
where
    F: Fn(&str) -> i32,
{
    fn priority(&self, provider: &str) -> i32 {
        self(provider)
    }
}

/// Ordered list of providers, most trusted first.
///
/// A provider's rank is its position in the list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderList {
    providers: Vec<ProviderId>,
}

impl ProviderList {
    pub fn new<I, S>(providers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ProviderId>,
    {
        Self {
            providers: providers.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a comma-separated list such as "binance,coingecko,cmc"
    pub fn from_csv(csv: &str) -> Self {
        Self::new(
            csv.split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty()),
        )
    }

    pub fn providers(&self) -> &[ProviderId] {
        &self.providers
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl ProviderPriority for ProviderList {
    fn priority(&self, provider: &str) -> i32 {
        self.providers
            .iter()
            .position(|p| p == provider)
            .map(|idx| idx as i32)
            .unwrap_or(UNRANKED)
    }
}
