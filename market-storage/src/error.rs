use market_core::Rate;
use serde::Serialize;
use thiserror::Error;

use crate::store::Namespace;

/// Errors reported by a `KeyValueStore` backend
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Key not found: {namespace}/{key}")]
    NotFound { namespace: Namespace, key: String },

    #[error("Store backend error: {0}")]
    Backend(String),
}

/// Why a candidate record lost arbitration against the stored one
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    #[error("lower priority provider (existing rank {existing_rank}, candidate rank {candidate_rank})")]
    LowerPriority {
        existing_rank: i32,
        candidate_rank: i32,
    },

    #[error("outdated update")]
    Outdated,
}

/// Errors from single-record storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("No {namespace} record for key {key}")]
    NotFound { namespace: Namespace, key: String },

    #[error("Ticker rejected: {0}")]
    Rejected(Rejection),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Codec error: {0}")]
    Codec(#[from] serde_json::Error),
}

impl StorageError {
    /// True when nothing changed because the candidate lost arbitration,
    /// as opposed to an infrastructure failure
    pub fn is_rejection(&self) -> bool {
        matches!(self, StorageError::Rejected(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound { .. })
    }
}

impl From<StoreError> for StorageError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { namespace, key } => StorageError::NotFound { namespace, key },
            StoreError::Backend(msg) => StorageError::Store(msg),
        }
    }
}

/// One rate that could not be saved, kept as diagnostic metadata
#[derive(Debug, Clone, Serialize)]
pub struct RateFailure {
    pub rate: Rate,
    pub reason: String,
}

/// Aggregate failure of a rate batch
#[derive(Error, Debug)]
pub enum BatchError {
    #[error("Save some rates failed: {} of {total} rates", .failures.len())]
    Partial {
        total: usize,
        failures: Vec<RateFailure>,
    },

    #[error("Save all rates failed: {total} rates")]
    Total {
        total: usize,
        failures: Vec<RateFailure>,
    },
}

impl BatchError {
    pub fn failures(&self) -> &[RateFailure] {
        match self {
            BatchError::Partial { failures, .. } | BatchError::Total { failures, .. } => failures,
        }
    }

    pub fn is_total(&self) -> bool {
        matches!(self, BatchError::Total { .. })
    }
}
