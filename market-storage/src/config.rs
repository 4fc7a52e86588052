use std::path::PathBuf;

/// LMDB storage configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub lmdb_path: PathBuf,
    /// Maximum size of the memory map in bytes
    pub map_size: usize,
    pub max_dbs: u32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            lmdb_path: PathBuf::from("./data/market-lmdb"),
            map_size: 256 * 1024 * 1024,
            max_dbs: 4,
        }
    }
}
