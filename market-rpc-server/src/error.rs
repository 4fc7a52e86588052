use market_storage::{BatchError, StorageError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RpcError {
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Method not found: {0}")]
    MethodNotFound(String),

    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error("Internal error: {0}")]
    InternalError(String),

    #[error("{0}")]
    Storage(#[from] StorageError),

    #[error("{0}")]
    Batch(#[from] BatchError),
}

impl RpcError {
    /// Get the JSON-RPC error code for this error
    pub fn code(&self) -> i32 {
        use crate::protocol::*;
        match self {
            RpcError::ParseError(_) => PARSE_ERROR,
            RpcError::InvalidRequest(_) => INVALID_REQUEST,
            RpcError::MethodNotFound(_) => METHOD_NOT_FOUND,
            RpcError::InvalidParams(_) => INVALID_PARAMS,
            RpcError::InternalError(_) => INTERNAL_ERROR,
            RpcError::Storage(StorageError::Rejected(_)) => TICKER_REJECTED,
            RpcError::Storage(StorageError::NotFound { .. }) => RECORD_NOT_FOUND,
            RpcError::Storage(StorageError::Store(_)) => STORE_ERROR,
            RpcError::Storage(StorageError::Codec(_)) => STORE_ERROR,
            RpcError::Batch(BatchError::Partial { .. }) => PARTIAL_BATCH_FAILURE,
            RpcError::Batch(BatchError::Total { .. }) => TOTAL_BATCH_FAILURE,
        }
    }

    /// Get additional error data (optional)
    pub fn data(&self) -> Option<serde_json::Value> {
        match self {
            RpcError::Storage(StorageError::Rejected(rejection)) => Some(serde_json::json!({
                "reason": rejection.to_string(),
            })),
            RpcError::Storage(StorageError::NotFound { namespace, key }) => Some(serde_json::json!({
                "namespace": namespace.as_str(),
                "key": key,
            })),
            RpcError::Batch(err) => Some(serde_json::json!({
                "failures": err.failures(),
            })),
            _ => None,
        }
    }
}
