//! Typed chain-node calls.
//!
//! [`NodeRpc`] wraps an [`RpcTransport`] and turns the raw JSON values into
//! the types the managers work with. It is cheap to clone; clones share the
//! transport.

use primitive_types::U256;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

use super::rpc::RpcMethod;
use super::transport::{HttpTransport, RpcClientError, RpcTransport};
use crate::config::NONCE_BLOCK_TAG;
use crate::transaction::types::address_to_hex;
use crate::transaction::{Address, PrivacyFlag, PrivateTransaction, SubmissionResult};

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// Second parameter of `eth_sendRawPrivateTransaction`.
///
/// `privacyFlag` and `mandatoryFor` are omitted when absent. An explicit
/// `Some` is always sent, even if it is the standard flag or an empty list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivateRawParams {
    pub private_for: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privacy_flag: Option<PrivacyFlag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mandatory_for: Option<Vec<String>>,
}

/// The parts of a transaction receipt Veil looks at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    pub transaction_hash: String,
    #[serde(default)]
    pub block_hash: Option<String>,
    #[serde(default)]
    pub block_number: Option<U256>,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub contract_address: Option<String>,
    #[serde(default)]
    pub gas_used: Option<U256>,
    /// `0x1` on success, `0x0` on revert. Absent on very old nodes.
    #[serde(default)]
    pub status: Option<U256>,
}

impl TransactionReceipt {
    /// `true` unless the node reported a zero status.
    pub fn is_success(&self) -> bool {
        self.status.map_or(true, |status| !status.is_zero())
    }
}

// ---------------------------------------------------------------------------
// NodeRpc
// ---------------------------------------------------------------------------

/// Typed client for the chain node's JSON-RPC API.
#[derive(Clone)]
pub struct NodeRpc {
    transport: Arc<dyn RpcTransport>,
}

impl NodeRpc {
    pub fn new(transport: Arc<dyn RpcTransport>) -> Self {
        Self { transport }
    }

    /// Connects to `url` over HTTP.
    pub fn http(url: impl Into<String>) -> Result<Self, RpcClientError> {
        Ok(Self::new(Arc::new(HttpTransport::new(url)?)))
    }

    async fn call<T: DeserializeOwned>(&self, method: RpcMethod, params: Value) -> Result<T, RpcClientError> {
        let result = self.transport.request(method, params).await?;
        serde_json::from_value(result).map_err(|e| RpcClientError::unexpected(method, e.to_string()))
    }

    async fn submit(&self, method: RpcMethod, params: Value) -> Result<SubmissionResult, RpcClientError> {
        let hash: String = self.call(method, params).await?;
        Ok(SubmissionResult::new(hash))
    }

    /// `web3_clientVersion`.
    pub async fn client_version(&self) -> Result<String, RpcClientError> {
        self.call(RpcMethod::ClientVersion, json!([])).await
    }

    /// Next nonce for `address`, counting pending transactions.
    pub async fn transaction_count(&self, address: &Address) -> Result<U256, RpcClientError> {
        self.call(
            RpcMethod::GetTransactionCount,
            json!([address_to_hex(address), NONCE_BLOCK_TAG]),
        )
        .await
    }

    /// Submits a signed public transaction.
    pub async fn send_raw_transaction(&self, signed_hex: &str) -> Result<SubmissionResult, RpcClientError> {
        self.submit(RpcMethod::SendRawTransaction, json!([signed_hex])).await
    }

    /// Submits a signed, marked private transaction whose payload is already
    /// in the enclave.
    pub async fn send_raw_private_transaction(
        &self,
        signed_hex: &str,
        params: &PrivateRawParams,
    ) -> Result<SubmissionResult, RpcClientError> {
        self.submit(RpcMethod::SendRawPrivateTransaction, json!([signed_hex, params]))
            .await
    }

    /// Hands an unsigned transaction to the node for node-side signing.
    pub async fn send_transaction(&self, tx: &PrivateTransaction) -> Result<SubmissionResult, RpcClientError> {
        self.submit(RpcMethod::SendTransaction, json!([tx])).await
    }

    /// Receipt for `tx_hash`, or `None` while it is still pending.
    pub async fn transaction_receipt(&self, tx_hash: &str) -> Result<Option<TransactionReceipt>, RpcClientError> {
        self.call(RpcMethod::GetTransactionReceipt, json!([tx_hash])).await
    }
}

impl std::fmt::Debug for NodeRpc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeRpc").finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
