//! # JSON-RPC API Definitions
//!
//! Type-safe definitions for the handful of node JSON-RPC calls Veil makes.
//! This module defines the request/response envelopes and the method
//! enumeration; the HTTP plumbing lives in [`super::transport`] and the
//! typed calls in [`super::node`].
//!
//! ## Method Index
//!
//! | Method                           | Used for                                  |
//! |----------------------------------|-------------------------------------------|
//! | `web3_clientVersion`             | privacy capability probe                  |
//! | `eth_getTransactionCount`        | next nonce for the sender                 |
//! | `eth_sendRawTransaction`         | public path submission                    |
//! | `eth_sendRawPrivateTransaction`  | private path submission                   |
//! | `eth_sendTransaction`            | node-signed path submission               |
//! | `eth_getTransactionReceipt`      | receipt polling                           |

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::JSONRPC_VERSION;

// ---------------------------------------------------------------------------
// RPC Method Enumeration
// ---------------------------------------------------------------------------

/// Supported JSON-RPC methods. The wire name is the serde rename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RpcMethod {
    /// Parameters: none.
    #[serde(rename = "web3_clientVersion")]
    ClientVersion,
    /// Parameters: `(address, block_tag)`.
    #[serde(rename = "eth_getTransactionCount")]
    GetTransactionCount,
    /// Parameters: `(signed_hex)`.
    #[serde(rename = "eth_sendRawTransaction")]
    SendRawTransaction,
    /// Parameters: `(signed_hex, { privateFor, privacyFlag?, mandatoryFor? })`.
    #[serde(rename = "eth_sendRawPrivateTransaction")]
    SendRawPrivateTransaction,
    /// Parameters: `(transaction_object)`.
    #[serde(rename = "eth_sendTransaction")]
    SendTransaction,
    /// Parameters: `(tx_hash)`.
    #[serde(rename = "eth_getTransactionReceipt")]
    GetTransactionReceipt,
}

impl RpcMethod {
    /// The method name as it appears on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ClientVersion => "web3_clientVersion",
            Self::GetTransactionCount => "eth_getTransactionCount",
            Self::SendRawTransaction => "eth_sendRawTransaction",
            Self::SendRawPrivateTransaction => "eth_sendRawPrivateTransaction",
            Self::SendTransaction => "eth_sendTransaction",
            Self::GetTransactionReceipt => "eth_getTransactionReceipt",
        }
    }
}

impl fmt::Display for RpcMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// RPC Request / Response
// ---------------------------------------------------------------------------

/// A JSON-RPC 2.0 request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcRequest {
    /// JSON-RPC version. Always "2.0".
    pub jsonrpc: String,
    /// Request identifier. Echoed back in the response.
    pub id: u64,
    pub method: RpcMethod,
    /// Positional parameters.
    #[serde(default)]
    pub params: serde_json::Value,
}

impl RpcRequest {
    pub fn new(id: u64, method: RpcMethod, params: serde_json::Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            method,
            params,
        }
    }
}

/// A JSON-RPC 2.0 response.
///
/// Exactly one of `result` or `error` should be set. A `null` result is
/// legitimate (a receipt that doesn't exist yet), so `result` is kept as a
/// raw value and not an `Option` of a typed payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub id: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

impl RpcResponse {
    /// Splits the envelope into the result value or the node's error.
    ///
    /// A response with neither field is treated as a `null` result.
    pub fn into_result(self) -> Result<serde_json::Value, RpcError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.result.unwrap_or(serde_json::Value::Null)),
        }
    }
}

// ---------------------------------------------------------------------------
// RPC Errors
// ---------------------------------------------------------------------------

/// JSON-RPC 2.0 error object as returned by the node.
///
/// Standard codes: `-32700` parse error, `-32600` invalid request, `-32601`
/// method not found, `-32602` invalid params, `-32603` internal error.
/// Nodes report transaction rejections in the `-32000` range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {})", self.message, self.code)
    }
}
