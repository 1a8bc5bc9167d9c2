//! Locally-signed transaction manager.
//!
//! [`RawTransactionManager`] owns the sender's credentials and the privacy
//! settings, fetches nonces, and hands each transaction to the
//! [`PrivacyPipeline`].
//!
//! # Concurrency
//!
//! The privacy settings are instance state, not call state. Each call takes
//! one snapshot of them at entry and uses it throughout, so a single call
//! never mixes old and new settings. Across calls there is no ordering: a
//! setter racing with `send_transaction` may land before or after the
//! snapshot, and the same call can be routed public or private depending on
//! who wins. Finish reconfiguring before issuing calls that depend on it.
//!
//! Nonces come from the node's pending count. Two concurrent sends from the
//! same sender can read the same nonce; serialize sends per sender if that
//! matters.

use parking_lot::RwLock;
use primitive_types::U256;
use std::sync::Arc;

use super::config::{ManagerConfig, PrivacySettings};
use super::error::ManagerError;
use super::pipeline::PrivacyPipeline;
use crate::enclave::Enclave;
use crate::network::{NodeRpc, PollingReceiptProcessor, TransactionReceipt};
use crate::transaction::{Address, PrivacyFlag, RawTransaction, SubmissionResult};

pub struct RawTransactionManager {
    pipeline: PrivacyPipeline,
    settings: RwLock<PrivacySettings>,
    receipts: PollingReceiptProcessor,
}

impl RawTransactionManager {
    pub fn new(config: ManagerConfig, enclave: Arc<dyn Enclave>, node: NodeRpc) -> Self {
        let ManagerConfig {
            credentials,
            enclave_key,
            privacy,
            chain_id,
        } = config;
        Self {
            pipeline: PrivacyPipeline::new(credentials, enclave_key, chain_id, enclave, node),
            settings: RwLock::new(privacy),
            receipts: PollingReceiptProcessor::default(),
        }
    }

    /// Overrides the receipt polling used by [`Self::wait_for_receipt`].
    pub fn with_receipt_processor(mut self, receipts: PollingReceiptProcessor) -> Self {
        self.receipts = receipts;
        self
    }

    pub fn from_address(&self) -> Address {
        self.pipeline.credentials().address()
    }

    /// Copy of the current privacy settings.
    pub fn settings(&self) -> PrivacySettings {
        self.settings.read().clone()
    }

    pub fn private_for(&self) -> Vec<String> {
        self.settings.read().private_for.clone()
    }

    pub fn set_private_for(&self, private_for: Vec<String>) {
        self.settings.write().private_for = private_for;
    }

    pub fn privacy_flag(&self) -> Option<PrivacyFlag> {
        self.settings.read().privacy_flag
    }

    pub fn set_privacy_flag(&self, flag: Option<PrivacyFlag>) {
        self.settings.write().privacy_flag = flag;
    }

    pub fn mandatory_for(&self) -> Option<Vec<String>> {
        self.settings.read().mandatory_for.clone()
    }

    pub fn set_mandatory_for(&self, mandatory_for: Option<Vec<String>>) {
        self.settings.write().mandatory_for = mandatory_for;
    }

    /// Fetches the sender's next nonce, builds the transaction and runs it
    /// through the pipeline.
    ///
    /// `to = None` deploys a contract. `data` is hex, with or without `0x`.
    pub async fn send_transaction(
        &self,
        gas_price: U256,
        gas_limit: U256,
        to: Option<Address>,
        data: &str,
        value: U256,
    ) -> Result<SubmissionResult, ManagerError> {
        let nonce = self.pipeline.node().transaction_count(&self.from_address()).await?;
        tracing::debug!(%nonce, "fetched nonce");

        let tx = RawTransaction::builder(nonce, gas_price, gas_limit)
            .to(to)
            .value(value)
            .data(data)
            .build()?;

        self.sign_and_send(&tx).await
    }

    /// Returns the signed hex without submitting. Marked when the current
    /// recipient set is non-empty. No enclave call is made.
    pub fn sign(&self, tx: &RawTransaction) -> String {
        let settings = self.settings();
        self.pipeline.sign(tx, &settings)
    }

    /// Stores `tx`'s payload in the enclave for the current recipients and
    /// returns the derived transaction, ready for [`Self::sign`].
    pub async fn store_payload(&self, tx: &RawTransaction) -> Result<RawTransaction, ManagerError> {
        let settings = self.settings();
        self.pipeline.substitute_payload(tx, &settings.private_for).await
    }

    /// Signs and submits `tx`, private or public depending on the current
    /// recipient set.
    pub async fn sign_and_send(&self, tx: &RawTransaction) -> Result<SubmissionResult, ManagerError> {
        let settings = self.settings();
        self.pipeline.sign_and_send(tx, &settings).await
    }

    /// Polls until `result`'s transaction has a receipt.
    pub async fn wait_for_receipt(&self, result: &SubmissionResult) -> Result<TransactionReceipt, ManagerError> {
        Ok(self
            .receipts
            .wait_for_receipt(self.pipeline.node(), &result.transaction_hash)
            .await?)
    }
}

impl std::fmt::Debug for RawTransactionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawTransactionManager")
            .field("pipeline", &self.pipeline)
            .field("settings", &*self.settings.read())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::Credentials;
    use crate::network::RpcMethod;
    use crate::testing::{RecordingEnclave, ScriptedTransport};
    use crate::transaction::decode_signed;
    use serde_json::json;

    fn manager(
        config: ManagerConfig,
        enclave: Arc<RecordingEnclave>,
        transport: Arc<ScriptedTransport>,
    ) -> RawTransactionManager {
        RawTransactionManager::new(config, enclave, NodeRpc::new(transport))
    }

    #[tokio::test]
    async fn send_transaction_uses_pending_nonce() {
        let creds = Credentials::generate();
        let transport = ScriptedTransport::with_replies(vec![Ok(json!("0x7")), Ok(json!("0xaa"))]);
        let manager = manager(
            ManagerConfig::new(creds.clone(), "A"),
            RecordingEnclave::returning("q80="),
            transport.clone(),
        );

        let result = manager
            .send_transaction(U256::zero(), U256::from(21_000u64), None, "0x", U256::zero())
            .await
            .unwrap();
        assert_eq!(result.transaction_hash, "0xaa");

        let calls = transport.calls();
        assert_eq!(calls[0].0, RpcMethod::GetTransactionCount);
        assert_eq!(calls[0].1[0], json!(creds.address_hex()));
        assert_eq!(calls[1].0, RpcMethod::SendRawTransaction);

        let raw = calls[1].1[0].as_str().unwrap().trim_start_matches("0x").to_string();
        let decoded = decode_signed(&hex::decode(raw).unwrap()).unwrap();
        assert_eq!(decoded.transaction.nonce(), U256::from(7u64));
    }

    #[tokio::test]
    async fn nonce_failure_is_rpc_error() {
        let enclave = RecordingEnclave::returning("q80=");
        let manager = manager(
            ManagerConfig::new(Credentials::generate(), "A").with_private_for(vec!["B".into()]),
            enclave.clone(),
            ScriptedTransport::with_replies(vec![]),
        );

        let err = manager
            .send_transaction(U256::zero(), U256::zero(), None, "0x", U256::zero())
            .await
            .unwrap_err();
        assert!(matches!(err, ManagerError::Rpc(_)));
        assert!(enclave.stored().is_empty());
    }

    #[tokio::test]
    async fn bad_data_is_transaction_error() {
        let manager = manager(
            ManagerConfig::new(Credentials::generate(), "A"),
            RecordingEnclave::returning("q80="),
            ScriptedTransport::with_replies(vec![Ok(json!("0x0"))]),
        );

        let err = manager
            .send_transaction(U256::zero(), U256::zero(), None, "0xzz", U256::zero())
            .await
            .unwrap_err();
        assert!(matches!(err, ManagerError::Transaction(_)));
    }

    #[tokio::test]
    async fn setters_change_routing_of_later_calls() {
        let enclave = RecordingEnclave::returning("q80=");
        let transport = ScriptedTransport::with_replies(vec![Ok(json!("0x01"))]);
        let manager = manager(
            ManagerConfig::new(Credentials::generate(), "A"),
            enclave.clone(),
            transport.clone(),
        );
        let tx = RawTransaction::builder(U256::zero(), U256::zero(), U256::from(21_000u64))
            .data("0xdeadbeef")
            .build()
            .unwrap();

        manager.sign_and_send(&tx).await.unwrap();
        assert_eq!(transport.calls().len(), 1);

        manager.set_private_for(vec!["B".into()]);
        manager.set_privacy_flag(Some(PrivacyFlag::PartyProtection));
        manager.set_mandatory_for(Some(vec!["B".into()]));
        manager.sign_and_send(&tx).await.unwrap();

        assert_eq!(transport.calls().len(), 1);
        let sent = enclave.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].privacy_flag, Some(PrivacyFlag::PartyProtection));
        assert_eq!(sent[0].mandatory_for, Some(vec!["B".to_string()]));
    }

    #[test]
    fn getters_reflect_setters() {
        let manager = manager(
            ManagerConfig::new(Credentials::generate(), "A"),
            RecordingEnclave::returning("q80="),
            ScriptedTransport::with_replies(vec![]),
        );
        assert!(manager.private_for().is_empty());
        assert_eq!(manager.privacy_flag(), None);
        assert_eq!(manager.mandatory_for(), None);

        manager.set_mandatory_for(Some(vec![]));
        assert_eq!(manager.mandatory_for(), Some(vec![]));
        manager.set_mandatory_for(None);
        assert_eq!(manager.mandatory_for(), None);
    }

    #[tokio::test]
    async fn store_payload_then_sign_matches_sign_and_send() {
        let enclave = RecordingEnclave::returning("q80=");
        let manager = manager(
            ManagerConfig::new(Credentials::generate(), "A").with_private_for(vec!["B".into()]),
            enclave.clone(),
            ScriptedTransport::with_replies(vec![]),
        );
        let tx = RawTransaction::builder(U256::one(), U256::zero(), U256::from(50_000u64))
            .data("0xdeadbeef")
            .build()
            .unwrap();

        let derived = manager.store_payload(&tx).await.unwrap();
        let offline = manager.sign(&derived);
        manager.sign_and_send(&tx).await.unwrap();

        assert_eq!(enclave.sent()[0].signed_hex, offline);
    }
}
