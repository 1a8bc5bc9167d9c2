//! Node-signed transaction manager.
//!
//! The node holds the key. We send an unsigned transaction object carrying
//! `privateFor` via `eth_sendTransaction`; the node signs it, talks to its
//! enclave and applies the private marker itself. There is no local signing
//! and no recovery-field rewrite on this path.

use parking_lot::RwLock;
use primitive_types::U256;

use super::error::ManagerError;
use crate::config::supports_privacy;
use crate::network::{NodeRpc, PollingReceiptProcessor, TransactionReceipt};
use crate::transaction::{PrivateTransaction, SubmissionResult};

pub struct ClientTransactionManager {
    node: NodeRpc,
    from_address: String,
    private_for: RwLock<Vec<String>>,
    receipts: PollingReceiptProcessor,
}

impl ClientTransactionManager {
    /// Connects with the default receipt polling (20 attempts, 1 s apart).
    ///
    /// Fails with [`ManagerError::UnsupportedTransport`] if the node's client
    /// version doesn't identify a privacy-capable node.
    pub async fn connect(
        node: NodeRpc,
        from_address: impl Into<String>,
        private_for: Vec<String>,
    ) -> Result<Self, ManagerError> {
        Self::connect_with_polling(node, from_address, private_for, PollingReceiptProcessor::default()).await
    }

    pub async fn connect_with_polling(
        node: NodeRpc,
        from_address: impl Into<String>,
        private_for: Vec<String>,
        receipts: PollingReceiptProcessor,
    ) -> Result<Self, ManagerError> {
        let client_version = node.client_version().await?;
        if !supports_privacy(&client_version) {
            return Err(ManagerError::UnsupportedTransport { client_version });
        }
        tracing::debug!(%client_version, "node supports private transactions");

        Ok(Self {
            node,
            from_address: from_address.into(),
            private_for: RwLock::new(private_for),
            receipts,
        })
    }

    pub fn from_address(&self) -> &str {
        &self.from_address
    }

    pub fn private_for(&self) -> Vec<String> {
        self.private_for.read().clone()
    }

    /// Takes effect for calls that start after this returns.
    pub fn set_private_for(&self, private_for: Vec<String>) {
        *self.private_for.write() = private_for;
    }

    pub fn receipt_processor(&self) -> PollingReceiptProcessor {
        self.receipts
    }

    /// Asks the node to sign and submit. The nonce and gas price are left to
    /// the node; `gas_price` is accepted for signature parity with the raw
    /// manager and is not sent.
    pub async fn send_transaction(
        &self,
        _gas_price: U256,
        gas_limit: U256,
        to: Option<String>,
        data: &str,
        value: U256,
    ) -> Result<SubmissionResult, ManagerError> {
        let tx = PrivateTransaction {
            from: self.from_address.clone(),
            nonce: None,
            gas_price: None,
            gas_limit,
            to,
            value,
            data: data.to_string(),
            private_for: self.private_for(),
        };

        let result = self.node.send_transaction(&tx).await?;
        tracing::info!(
            tx = %result.transaction_hash,
            recipients = tx.private_for.len(),
            "node-signed transaction submitted"
        );
        Ok(result)
    }

    pub async fn wait_for_receipt(&self, result: &SubmissionResult) -> Result<TransactionReceipt, ManagerError> {
        Ok(self
            .receipts
            .wait_for_receipt(&self.node, &result.transaction_hash)
            .await?)
    }
}

impl std::fmt::Debug for ClientTransactionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientTransactionManager")
            .field("from_address", &self.from_address)
            .field("private_for", &*self.private_for.read())
            .field("receipts", &self.receipts)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::RpcMethod;
    use crate::testing::ScriptedTransport;
    use serde_json::json;
    use std::time::Duration;

    #[tokio::test]
    async fn rejects_non_private_node() {
        let transport = ScriptedTransport::with_replies(vec![Ok(json!("Geth/v1.13.0-stable"))]);
        let err = ClientTransactionManager::connect(NodeRpc::new(transport), "0xaa", vec![])
            .await
            .unwrap_err();

        match err {
            ManagerError::UnsupportedTransport { client_version } => {
                assert_eq!(client_version, "Geth/v1.13.0-stable")
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn sends_unsigned_transaction_with_recipients() {
        let transport = ScriptedTransport::with_replies(vec![
            Ok(json!("Geth/v1.9.7-stable (quorum-v21.1.0)")),
            Ok(json!("0xbeef")),
        ]);
        let manager = ClientTransactionManager::connect(NodeRpc::new(transport.clone()), "0xaa", vec!["B".into()])
            .await
            .unwrap();

        let result = manager
            .send_transaction(
                U256::from(1u64),
                U256::from(21_000u64),
                Some("0xbb".into()),
                "0xdeadbeef",
                U256::zero(),
            )
            .await
            .unwrap();
        assert_eq!(result.transaction_hash, "0xbeef");

        let (method, params) = &transport.calls()[1];
        assert_eq!(*method, RpcMethod::SendTransaction);
        let sent = &params[0];
        assert_eq!(sent["from"], "0xaa");
        assert_eq!(sent["to"], "0xbb");
        assert_eq!(sent["gas"], "0x5208");
        assert_eq!(sent["data"], "0xdeadbeef");
        assert_eq!(sent["privateFor"], json!(["B"]));
        assert!(sent.get("nonce").is_none());
        assert!(sent.get("gasPrice").is_none());
    }

    #[tokio::test]
    async fn set_private_for_applies_to_next_send() {
        let transport =
            ScriptedTransport::with_replies(vec![Ok(json!("GoQuorum/v22")), Ok(json!("0x1"))]);
        let manager = ClientTransactionManager::connect(NodeRpc::new(transport.clone()), "0xaa", vec![])
            .await
            .unwrap();

        manager.set_private_for(vec!["C".into(), "D".into()]);
        assert_eq!(manager.private_for(), vec!["C".to_string(), "D".to_string()]);
        manager
            .send_transaction(U256::zero(), U256::zero(), None, "0x", U256::zero())
            .await
            .unwrap();

        let params = &transport.calls()[1].1;
        assert_eq!(params[0]["privateFor"], json!(["C", "D"]));
        assert!(params[0].get("to").is_none());
    }

    #[tokio::test]
    async fn polling_defaults_and_override() {
        let transport = ScriptedTransport::with_replies(vec![Ok(json!("quorum")), Ok(json!("quorum"))]);
        let node = NodeRpc::new(transport);

        let default = ClientTransactionManager::connect(node.clone(), "0xaa", vec![]).await.unwrap();
        assert_eq!(default.receipt_processor().attempts(), 20);
        assert_eq!(default.receipt_processor().interval(), Duration::from_millis(1_000));

        let custom = ClientTransactionManager::connect_with_polling(
            node,
            "0xaa",
            vec![],
            PollingReceiptProcessor::new(5, Duration::from_millis(10)),
        )
        .await
        .unwrap();
        assert_eq!(custom.receipt_processor().attempts(), 5);
        assert_eq!(custom.from_address(), "0xaa");
    }
}
