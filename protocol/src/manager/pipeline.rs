//! The privacy-marking pipeline.
//!
//! The recipient set decides the path, and nothing else does:
//!
//! ```text
//! private_for empty      sign(tx, chain_id) ─────────────────────────► eth_sendRawTransaction
//!
//! private_for non-empty  data ─hex→b64─► store_raw_request ─► key ─b64→hex─► derived tx
//!                        derived tx ─► sign(no chain id) ─► mark_private ─► send_raw_request
//! ```
//!
//! Steps run strictly in order and nothing is retried. A payload stored in
//! the enclave is not cleaned up if a later step fails.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::sync::Arc;

use super::config::PrivacySettings;
use super::error::ManagerError;
use crate::crypto::hash::keccak256_hex;
use crate::crypto::Credentials;
use crate::enclave::{Enclave, EnclaveError};
use crate::network::NodeRpc;
use crate::transaction::types::to_hex_prefixed;
use crate::transaction::{mark_private, sign_transaction, RawTransaction, SubmissionResult};

/// Signs, marks and submits transactions for one sender.
pub struct PrivacyPipeline {
    credentials: Credentials,
    enclave_key: String,
    chain_id: Option<u64>,
    enclave: Arc<dyn Enclave>,
    node: NodeRpc,
}

impl PrivacyPipeline {
    pub fn new(
        credentials: Credentials,
        enclave_key: String,
        chain_id: Option<u64>,
        enclave: Arc<dyn Enclave>,
        node: NodeRpc,
    ) -> Self {
        Self {
            credentials,
            enclave_key,
            chain_id,
            enclave,
            node,
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn enclave_key(&self) -> &str {
        &self.enclave_key
    }

    pub fn node(&self) -> &NodeRpc {
        &self.node
    }

    /// Stores `tx`'s payload in the enclave and returns a derived transaction
    /// carrying the storage key as its `data`.
    pub async fn substitute_payload(
        &self,
        tx: &RawTransaction,
        private_for: &[String],
    ) -> Result<RawTransaction, ManagerError> {
        let payload = STANDARD.encode(tx.data_bytes());
        let stored = self
            .enclave
            .store_raw_request(&payload, &self.enclave_key, private_for)
            .await?;

        let key = STANDARD
            .decode(stored.key.trim())
            .map_err(|e| EnclaveError::MalformedResponse(format!("storage key is not base64: {}", e)))?;

        tracing::debug!(recipients = private_for.len(), key_len = key.len(), "payload stored in enclave");
        Ok(tx.with_data(&key))
    }

    /// Legacy-signs `tx` and applies the private marker.
    pub fn sign_private(&self, tx: &RawTransaction) -> Vec<u8> {
        mark_private(&sign_transaction(tx, &self.credentials, None))
    }

    /// Signs `tx` for the public path, with replay protection if configured.
    pub fn sign_public(&self, tx: &RawTransaction) -> Vec<u8> {
        sign_transaction(tx, &self.credentials, self.chain_id)
    }

    /// Signs `tx` without submitting. Marks it when `settings` selects the
    /// private path.
    ///
    /// No enclave call happens here: `tx` is signed as given, so on the
    /// private path its `data` should already be an enclave key (see
    /// [`Self::substitute_payload`]).
    pub fn sign(&self, tx: &RawTransaction, settings: &PrivacySettings) -> String {
        let signed = if settings.is_private() {
            self.sign_private(tx)
        } else {
            self.sign_public(tx)
        };
        to_hex_prefixed(&signed)
    }

    /// Runs the full pipeline for `tx`.
    pub async fn sign_and_send(
        &self,
        tx: &RawTransaction,
        settings: &PrivacySettings,
    ) -> Result<SubmissionResult, ManagerError> {
        if !settings.is_private() {
            let signed = to_hex_prefixed(&self.sign_public(tx));
            let result = self.node.send_raw_transaction(&signed).await?;
            tracing::info!(tx = %result.transaction_hash, "public transaction submitted");
            return Ok(result);
        }

        let derived = self.substitute_payload(tx, &settings.private_for).await?;
        let marked = self.sign_private(&derived);
        tracing::debug!(hash = %keccak256_hex(&marked), "private transaction signed and marked");
        let signed = to_hex_prefixed(&marked);
        let result = self
            .enclave
            .send_raw_request(
                &signed,
                &settings.private_for,
                settings.privacy_flag,
                settings.mandatory_for.as_deref(),
            )
            .await?;

        tracing::info!(
            tx = %result.transaction_hash,
            recipients = settings.private_for.len(),
            flag = ?settings.privacy_flag,
            "private transaction submitted"
        );
        Ok(result)
    }
}

impl std::fmt::Debug for PrivacyPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivacyPipeline")
            .field("sender", &self.credentials.address())
            .field("chain_id", &self.chain_id)
            .finish_non_exhaustive()
    }
}
