//! JSON-RPC transport.
//!
//! [`RpcTransport`] is the seam between the typed node calls and the wire.
//! [`HttpTransport`] is the production implementation; tests plug in a
//! scripted transport instead.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

use super::rpc::{RpcError, RpcMethod, RpcRequest, RpcResponse};
use crate::config::HTTP_TIMEOUT;

/// Errors raised while talking to the node.
#[derive(Debug, Error)]
pub enum RpcClientError {
    /// The request never produced a response (connection refused, timeout).
    #[error("transport error: {0}")]
    Transport(String),

    /// The node answered with a JSON-RPC error object.
    #[error("node returned error: {0}")]
    Node(RpcError),

    /// The node answered, but not with what we asked for.
    #[error("unexpected response to {method}: {reason}")]
    UnexpectedResponse { method: RpcMethod, reason: String },
}

impl RpcClientError {
    pub fn unexpected(method: RpcMethod, reason: impl Into<String>) -> Self {
        Self::UnexpectedResponse {
            method,
            reason: reason.into(),
        }
    }
}

/// Sends a single JSON-RPC call and returns its `result` value.
///
/// A `null` result is returned as [`Value::Null`], not as an error.
#[async_trait]
pub trait RpcTransport: Send + Sync {
    async fn request(&self, method: RpcMethod, params: Value) -> Result<Value, RpcClientError>;
}

/// JSON-RPC over HTTP POST.
pub struct HttpTransport {
    url: String,
    client: Client,
    next_id: AtomicU64,
}

impl HttpTransport {
    /// Creates a transport for `url` with the default request timeout.
    pub fn new(url: impl Into<String>) -> Result<Self, RpcClientError> {
        let client = Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| RpcClientError::Transport(e.to_string()))?;
        Ok(Self::with_client(url, client))
    }

    /// Creates a transport sharing an existing HTTP client.
    pub fn with_client(url: impl Into<String>, client: Client) -> Self {
        Self {
            url: url.into(),
            client,
            next_id: AtomicU64::new(1),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl RpcTransport for HttpTransport {
    async fn request(&self, method: RpcMethod, params: Value) -> Result<Value, RpcClientError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = RpcRequest::new(id, method, params);

        tracing::trace!(id, %method, url = %self.url, "sending rpc request");

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| RpcClientError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RpcClientError::unexpected(
                method,
                format!("HTTP {}: {}", status, body),
            ));
        }

        let envelope: RpcResponse = response
            .json()
            .await
            .map_err(|e| RpcClientError::unexpected(method, e.to_string()))?;

        envelope.into_result().map_err(|err| {
            tracing::debug!(id, %method, code = err.code, message = %err.message, "node rejected rpc request");
            RpcClientError::Node(err)
        })
    }
}
