use market_core::ProviderList;
use market_storage::StorageConfig;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub storage: StorageConfig,
    /// Provider ranking, most trusted first
    pub providers: ProviderList,
    /// Longest accepted request line in bytes, newline excluded
    pub max_request_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 7880,
            storage: StorageConfig::default(),
            providers: ProviderList::default(),
            max_request_bytes: 1024 * 1024,
        }
    }
}
