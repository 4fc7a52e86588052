use anyhow::{Context, Result};
use market_storage::{KeyValueStore, LmdbStore};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

use crate::config::ServerConfig;
use crate::error::RpcError;
use crate::handler::MarketHandler;
use crate::protocol::*;

/// JSON-RPC server for market storage requests
pub struct RpcServer {
    config: ServerConfig,
    handler: Arc<MarketHandler>,
}

impl RpcServer {
    /// Create a new RPC server backed by LMDB
    pub fn new(config: ServerConfig) -> Result<Self> {
        tracing::info!("Initializing market storage...");

        let store: Arc<dyn KeyValueStore> = Arc::new(
            LmdbStore::open(&config.storage).context("Failed to open LMDB market store")?,
        );

        if config.providers.is_empty() {
            tracing::warn!("No provider priorities configured; all providers are unranked");
        }

        let handler = Arc::new(MarketHandler::new(store, config.providers.clone()));

        tracing::info!("✅ Market storage initialized successfully");

        Ok(Self { config, handler })
    }

    /// Start the server and handle connections
    pub async fn run(&self) -> Result<()> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = TcpListener::bind(&addr)
            .await
            .context(format!("Failed to bind to {}", addr))?;

        tracing::info!("✅ Market JSON-RPC Server listening on {}", addr);
        tracing::info!("Ready to accept connections");

        loop {
            match listener.accept().await {
                Ok((socket, addr)) => {
                    tracing::debug!("New connection from {}", addr);
                    let handler = Arc::clone(&self.handler);
                    let max_request_bytes = self.config.max_request_bytes;

                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(socket, handler, max_request_bytes).await {
                            tracing::error!("Connection error from {}: {}", addr, e);
                        }
                    });
                }
                Err(e) => {
                    tracing::error!("Failed to accept connection: {}", e);
                }
            }
        }
    }
}

/// Outcome of reading one request line
#[derive(Debug, PartialEq, Eq)]
enum Frame {
    Line,
    TooLong,
    Closed,
}

/// Read one newline-terminated request of at most `limit` bytes
async fn read_request_line<R>(reader: &mut R, line: &mut String, limit: usize) -> std::io::Result<Frame>
where
    R: AsyncBufRead + Unpin,
{
    line.clear();
    let bytes_read = reader.take(limit as u64 + 1).read_line(line).await?;

    if bytes_read == 0 {
        return Ok(Frame::Closed);
    }

    if bytes_read > limit && !line.ends_with('\n') {
        return Ok(Frame::TooLong);
    }

    Ok(Frame::Line)
}

/// Handle a single TCP connection
async fn handle_connection(
    mut socket: TcpStream,
    handler: Arc<MarketHandler>,
    max_request_bytes: usize,
) -> Result<()> {
    let (reader, writer) = socket.split();
    serve_stream(BufReader::new(reader), writer, handler, max_request_bytes).await
}

/// Answer newline-delimited requests until the peer closes the stream
async fn serve_stream<R, W>(
    mut reader: R,
    mut writer: W,
    handler: Arc<MarketHandler>,
    max_request_bytes: usize,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut line = String::new();

    loop {
        match read_request_line(&mut reader, &mut line, max_request_bytes).await? {
            Frame::Closed => break,
            Frame::TooLong => {
                tracing::warn!("Request exceeds {} bytes, closing connection", max_request_bytes);
                let response = create_error_response(
                    None,
                    RpcError::InvalidRequest(format!("Request exceeds {} bytes", max_request_bytes)),
                );
                write_response(&mut writer, &response).await?;
                // Rest of the oversized line is still unread
                break;
            }
            Frame::Line => {}
        }

        if line.trim().is_empty() {
            continue;
        }

        tracing::debug!("Received request: {}", line.trim());

        // LMDB calls block, keep them off the async workers
        let request_handler = Arc::clone(&handler);
        let request = line.clone();
        let response =
            tokio::task::spawn_blocking(move || process_request(&request, &request_handler))
                .await
                .context("Request handler panicked")?;

        write_response(&mut writer, &response).await?;

        tracing::debug!("Sent response");
    }

    Ok(())
}

async fn write_response<W: AsyncWrite + Unpin>(writer: &mut W, response: &Value) -> Result<()> {
    let response_json = serde_json::to_string(response)?;
    writer.write_all(response_json.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}

/// Process a JSON-RPC request
fn process_request(line: &str, handler: &MarketHandler) -> Value {
    // Parse JSON-RPC request
    let request: JsonRpcRequest = match serde_json::from_str(line) {
        Ok(req) => req,
        Err(e) => return create_error_response(None, RpcError::ParseError(e.to_string())),
    };

    // Validate JSON-RPC version
    if request.jsonrpc != "2.0" {
        return create_error_response(
            request.id,
            RpcError::InvalidRequest("JSON-RPC version must be 2.0".to_string()),
        );
    }

    let id = request.id.clone();

    // Route to method handler
    let result = match request.method.as_str() {
        SUBMIT_TICKER => parse_params(request.params).and_then(|t| to_result(handler.submit_ticker(t))),
        GET_TICKER => parse_params(request.params).and_then(|p| to_result(handler.get_ticker(p))),
        SUBMIT_RATES => parse_params(request.params)
            .and_then(|p: SubmitRatesRequest| to_result(handler.submit_rates(p.rates))),
        GET_RATE => parse_params(request.params).and_then(|p| to_result(handler.get_rate(p))),
        _ => Err(RpcError::MethodNotFound(request.method.clone())),
    };

    match result {
        Ok(result) => create_success_response(id, result),
        Err(e) => create_error_response(id, e),
    }
}

/// Deserialize method params, rejecting missing or malformed params
fn parse_params<T: DeserializeOwned>(params: Option<Value>) -> Result<T, RpcError> {
    let params = params.ok_or_else(|| RpcError::InvalidParams("Missing params".to_string()))?;
    serde_json::from_value(params).map_err(|e| RpcError::InvalidParams(format!("Invalid params: {}", e)))
}

fn to_result<T: Serialize>(outcome: Result<T, RpcError>) -> Result<Value, RpcError> {
    let value = outcome?;
    serde_json::to_value(value).map_err(|e| RpcError::InternalError(e.to_string()))
}

/// Create a success response
fn create_success_response(id: Option<Value>, result: Value) -> Value {
    serde_json::to_value(JsonRpcResponse {
        jsonrpc: "2.0".to_string(),
        id,
        result,
    })
    .unwrap_or_default()
}

/// Create an error response
fn create_error_response(id: Option<Value>, error: RpcError) -> Value {
    serde_json::to_value(JsonRpcError {
        jsonrpc: "2.0".to_string(),
        id,
        error: ErrorObject {
            code: error.code(),
            message: error.to_string(),
            data: error.data(),
        },
    })
    .unwrap_or_default()
}
