use market_core::Rate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON-RPC 2.0 Request
#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub id: Option<Value>,
    pub method: String,
    pub params: Option<Value>,
}

/// JSON-RPC 2.0 Success Response
#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: Option<Value>,
    pub result: Value,
}

/// JSON-RPC 2.0 Error Response
#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    pub jsonrpc: String,
    pub id: Option<Value>,
    pub error: ErrorObject,
}

/// JSON-RPC Error Object
#[derive(Debug, Serialize)]
pub struct ErrorObject {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

// Standard JSON-RPC error codes
pub const PARSE_ERROR: i32 = -32700;
pub const INVALID_REQUEST: i32 = -32600;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
pub const INTERNAL_ERROR: i32 = -32603;

// Custom error codes for market storage operations
pub const TICKER_REJECTED: i32 = -32001;
pub const RECORD_NOT_FOUND: i32 = -32002;
pub const STORE_ERROR: i32 = -32003;
pub const PARTIAL_BATCH_FAILURE: i32 = -32004;
pub const TOTAL_BATCH_FAILURE: i32 = -32005;

// Method names
pub const SUBMIT_TICKER: &str = "market.submit_ticker";
pub const GET_TICKER: &str = "market.get_ticker";
pub const SUBMIT_RATES: &str = "market.submit_rates";
pub const GET_RATE: &str = "market.get_rate";

/// market.get_ticker parameters
#[derive(Debug, Deserialize)]
pub struct GetTickerRequest {
    pub symbol: String,
    #[serde(default)]
    pub token_id: String,
}

/// market.submit_rates parameters
#[derive(Debug, Deserialize)]
pub struct SubmitRatesRequest {
    pub rates: Vec<Rate>,
}

/// market.get_rate parameters
#[derive(Debug, Deserialize)]
pub struct GetRateRequest {
    pub currency: String,
}

/// market.submit_ticker result
#[derive(Debug, Serialize)]
pub struct SubmitTickerResponse {
    pub accepted: bool,
    pub key: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_ticker_token_defaults_to_base_asset() {
        let req: GetTickerRequest = serde_json::from_str(r#"{"symbol":"btc"}"#).unwrap();
        assert_eq!(req.symbol, "btc");
        assert_eq!(req.token_id, "");
    }

    #[test]
    fn test_parse_jsonrpc_request() {
        let json = r#"{
            "jsonrpc": "2.0",
            "id": 1,
            "method": "market.get_rate",
            "params": {"currency": "EUR"}
        }"#;

        let req: JsonRpcRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.jsonrpc, "2.0");
        assert_eq!(req.method, GET_RATE);
    }

    #[test]
    fn test_parse_submit_rates_params() {
        let json = r#"{"rates":[{"currency":"EUR","rate":0.92,"provider":"fixer","timestamp":100}]}"#;
        let req: SubmitRatesRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.rates.len(), 1);
        assert_eq!(req.rates[0].currency, "EUR");
    }
}
