//! JSON-RPC transport
//!
//! [`RpcTransport`] is the seam between the chain client and the wire.
//! [`HttpTransport`] speaks Ethereum JSON-RPC over HTTP POST; tests plug in
//! scripted doubles.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// JSON-RPC request structure
#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    method: &'a str,
    params: Vec<serde_json::Value>,
    id: u64,
}

/// JSON-RPC response structure
#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    result: Option<String>,
    error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

/// Failures below the contract layer
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("RPC request failed with status: {0}")]
    Status(u16),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Malformed RPC response: {0}")]
    Decode(String),
}

impl TransportError {
    /// The endpoint could not be reached or refused to serve the request
    pub fn is_network(&self) -> bool {
        matches!(self, TransportError::Http(_) | TransportError::Status(_))
    }

    /// The node executed the call and the EVM reverted
    pub fn is_revert(&self) -> bool {
        match self {
            TransportError::Rpc { code, message } => {
                *code == 3 || message.to_ascii_lowercase().contains("revert")
            }
            _ => false,
        }
    }
}

/// A read-only Ethereum JSON-RPC endpoint
///
/// Every method the client uses returns a hex string, so implementations
/// return the raw `result` field.
pub trait RpcTransport: Send + Sync {
    /// Endpoint description reported in `NetworkInfo`
    fn endpoint(&self) -> &str;

    fn request(
        &self,
        method: &str,
        params: Vec<serde_json::Value>,
    ) -> impl Future<Output = Result<String, TransportError>> + Send;
}

/// JSON-RPC over HTTP POST
#[derive(Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
    next_id: AtomicU64,
}

impl HttpTransport {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            next_id: AtomicU64::new(1),
        }
    }
}

impl RpcTransport for HttpTransport {
    fn endpoint(&self) -> &str {
        &self.url
    }

    async fn request(
        &self,
        method: &str,
        params: Vec<serde_json::Value>,
    ) -> Result<String, TransportError> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            method,
            params,
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
        };

        let response = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(status_error(status.as_u16(), &body));
        }

        parse_response(&body)
    }
}

/// Error for a non-2xx reply, keeping a JSON-RPC error object if the body has one
fn status_error(status: u16, body: &str) -> TransportError {
    match parse_response(body) {
        Err(rpc @ TransportError::Rpc { .. }) => rpc,
        _ => TransportError::Status(status),
    }
}

/// Extract the `result` of a JSON-RPC response body
fn parse_response(body: &str) -> Result<String, TransportError> {
    let rpc_response: JsonRpcResponse =
        serde_json::from_str(body).map_err(|e| TransportError::Decode(e.to_string()))?;

    if let Some(error) = rpc_response.error {
        return Err(TransportError::Rpc {
            code: error.code,
            message: error.message,
        });
    }

    rpc_response
        .result
        .ok_or_else(|| TransportError::Decode("No result in RPC response".to_string()))
}

/// Parse a hex quantity such as `0x2105`
pub fn parse_hex_quantity(hex_str: &str) -> Result<u64, TransportError> {
    let digits = hex_str
        .strip_prefix("0x")
        .ok_or_else(|| TransportError::Decode(format!("quantity without 0x prefix: {}", hex_str)))?;

    u64::from_str_radix(digits, 16)
        .map_err(|e| TransportError::Decode(format!("bad quantity {}: {}", hex_str, e)))
}
