use header_primitives::{BlockHash, BlockNumber, RawHeader, parse};
use reqwest::{self, Client, StatusCode, Url, header};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{self, Value, json};
use std::fmt;

/// Errors that can occur when talking to an Ethereum JSON-RPC endpoint.
#[derive(Debug)]
pub enum RpcError {
    NonHttpUrl,
    Client(String),
    Json(serde_json::Error),
    Status(StatusCode),
    Rpc { code: i64, message: String },
    Quantity(String),
}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RpcError::NonHttpUrl => write!(f, "only http:// and https:// URLs are supported"),
            RpcError::Client(e) => write!(f, "client error: {e}"),
            RpcError::Json(e) => write!(f, "JSON error: {e}"),
            RpcError::Status(status) => write!(f, "unexpected HTTP status: {status}"),
            RpcError::Rpc { code, message } => {
                write!(f, "RPC error {code}: {message}")
            }
            RpcError::Quantity(e) => write!(f, "bad quantity in response: {e}"),
        }
    }
}

impl std::error::Error for RpcError {}

impl From<serde_json::Error> for RpcError {
    fn from(e: serde_json::Error) -> Self {
        RpcError::Json(e)
    }
}

impl RpcError {
    /// Transport failures and server-side HTTP errors; worth another attempt.
    pub fn is_transient(&self) -> bool {
        match self {
            RpcError::Client(_) => true,
            RpcError::Status(status) => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
            _ => false,
        }
    }
}

#[derive(Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    id: &'a str,
    method: &'a str,
    #[serde(borrow)]
    params: &'a [Value],
}

#[derive(Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

#[derive(Deserialize)]
struct JsonRpcResponse<T> {
    result: Option<T>,
    error: Option<JsonRpcError>,
}

/// Minimal JSON-RPC client for an Ethereum execution node over HTTP(S).
///
/// Only the calls the header sync needs are exposed.
pub struct RpcClient {
    client: Client,
    url: Url,
}

impl RpcClient {
    /// Creates a new client for the given endpoint, e.g. `http://127.0.0.1:8545`.
    pub fn new(url: &str) -> Result<Self, RpcError> {
        let url = Url::parse(url).map_err(|e| RpcError::Client(e.to_string()))?;
        match url.scheme() {
            "http" | "https" => {}
            _ => {
                return Err(RpcError::NonHttpUrl);
            }
        }

        let client = Client::new();

        Ok(RpcClient { client, url })
    }

    /// Like `call`, but a `null` result is returned as `None` instead of an error.
    async fn call_nullable<T>(&self, method: &str, params: &[Value]) -> Result<Option<T>, RpcError>
    where
        T: DeserializeOwned,
    {
        let request_body = JsonRpcRequest {
            jsonrpc: "2.0",
            id: "header-store",
            method,
            params,
        };

        let req = self
            .client
            .post(self.url.clone())
            .header(header::CONTENT_TYPE, "application/json");

        let res = req
            .json(&request_body)
            .send()
            .await
            .map_err(|e| RpcError::Client(e.to_string()))?;

        if !res.status().is_success() {
            return Err(RpcError::Status(res.status()));
        }

        let bytes = res
            .bytes()
            .await
            .map_err(|e| RpcError::Client(e.to_string()))?;
        let rpc_response: JsonRpcResponse<T> = serde_json::from_slice(&bytes)?;

        if let Some(err) = rpc_response.error {
            return Err(RpcError::Rpc {
                code: err.code,
                message: err.message,
            });
        }

        Ok(rpc_response.result)
    }

    async fn call<T>(&self, method: &str, params: &[Value]) -> Result<T, RpcError>
    where
        T: DeserializeOwned,
    {
        self.call_nullable(method, params)
            .await?
            .ok_or_else(|| RpcError::Rpc {
                code: -1,
                message: "missing result field in RPC response".to_string(),
            })
    }

    /// Returns the number of the most recent block (`eth_blockNumber`).
    pub async fn get_block_number(&self) -> Result<BlockNumber, RpcError> {
        let number: String = self.call("eth_blockNumber", &[]).await?;
        parse::quantity("number", &number).map_err(|e| RpcError::Quantity(e.to_string()))
    }

    /// Returns the header fields of the block at `number`, or `None` past the tip.
    pub async fn get_block_by_number(
        &self,
        number: BlockNumber,
    ) -> Result<Option<RawHeader>, RpcError> {
        self.call_nullable(
            "eth_getBlockByNumber",
            &[json!(format!("{number:#x}")), json!(false)],
        )
        .await
    }

    /// Returns the header fields of the block with the given hash, if known.
    pub async fn get_block_by_hash(&self, hash: &BlockHash) -> Result<Option<RawHeader>, RpcError> {
        self.call_nullable(
            "eth_getBlockByHash",
            &[json!(parse::to_hex(hash)), json!(false)],
        )
        .await
    }
}
