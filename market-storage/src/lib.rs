pub mod arbitration;
pub mod config;
pub mod error;
pub mod key;
pub mod storage;
pub mod store;

// Re-export commonly used items
pub use arbitration::{arbitrate, should_reject};
pub use config::StorageConfig;
pub use error::{BatchError, RateFailure, Rejection, StorageError, StoreError};
pub use key::derive_key;
pub use storage::{MarketStorage, RateBatchSummary};
pub use store::{KeyValueStore, LmdbStore, MemoryStore, Namespace};
