//! Enclave backed by a Tessera store and a privacy-capable node.

use async_trait::async_trait;

use super::{Enclave, EnclaveError, StoreRawRequest, StoreRawResponse, TesseraClient};
use crate::network::{NodeRpc, PrivateRawParams};
use crate::transaction::{PrivacyFlag, SubmissionResult};

/// Stores payloads in Tessera and submits through
/// `eth_sendRawPrivateTransaction` on the node.
#[derive(Debug, Clone)]
pub struct QuorumEnclave {
    store: TesseraClient,
    node: NodeRpc,
}

impl QuorumEnclave {
    pub fn new(store: TesseraClient, node: NodeRpc) -> Self {
        Self { store, node }
    }
}

#[async_trait]
impl Enclave for QuorumEnclave {
    async fn store_raw_request(
        &self,
        payload: &str,
        from: &str,
        to: &[String],
    ) -> Result<StoreRawResponse, EnclaveError> {
        let request = StoreRawRequest {
            payload: payload.to_string(),
            from: from.to_string(),
            to: to.to_vec(),
        };
        self.store.store_raw(&request).await
    }

    async fn send_raw_request(
        &self,
        signed_hex: &str,
        to: &[String],
        privacy_flag: Option<PrivacyFlag>,
        mandatory_for: Option<&[String]>,
    ) -> Result<SubmissionResult, EnclaveError> {
        let params = PrivateRawParams {
            private_for: to.to_vec(),
            privacy_flag,
            mandatory_for: mandatory_for.map(<[String]>::to_vec),
        };
        Ok(self.node.send_raw_private_transaction(signed_hex, &params).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::RpcMethod;
    use crate::testing::ScriptedTransport;
    use serde_json::json;

    fn enclave(transport: std::sync::Arc<ScriptedTransport>) -> QuorumEnclave {
        let store = TesseraClient::new("http://127.0.0.1:9").unwrap();
        QuorumEnclave::new(store, NodeRpc::new(transport))
    }

    #[tokio::test]
    async fn send_raw_request_forwards_absent_fields_as_absent() {
        let transport = ScriptedTransport::with_replies(vec![Ok(json!("0x77"))]);
        let result = enclave(transport.clone())
            .send_raw_request("0xf8", &["B".to_string()], None, None)
            .await
            .unwrap();

        assert_eq!(result.transaction_hash, "0x77");
        let (method, params) = &transport.calls()[0];
        assert_eq!(*method, RpcMethod::SendRawPrivateTransaction);
        assert_eq!(params[1], json!({ "privateFor": ["B"] }));
    }

    #[tokio::test]
    async fn send_raw_request_forwards_explicit_fields() {
        let transport = ScriptedTransport::with_replies(vec![Ok(json!("0x77"))]);
        let mandatory = vec!["B".to_string()];
        enclave(transport.clone())
            .send_raw_request(
                "0xf8",
                &["B".to_string(), "C".to_string()],
                Some(PrivacyFlag::StateValidation),
                Some(mandatory.as_slice()),
            )
            .await
            .unwrap();

        let params = &transport.calls()[0].1;
        assert_eq!(
            params[1],
            json!({ "privateFor": ["B", "C"], "privacyFlag": 2, "mandatoryFor": ["B"] })
        );
    }

    #[tokio::test]
    async fn node_rejection_surfaces_as_rpc_error() {
        let transport = ScriptedTransport::with_replies(vec![Err(crate::network::RpcClientError::Node(
            crate::network::RpcError {
                code: -32000,
                message: "privacy not enabled".into(),
                data: None,
            },
        ))]);
        let err = enclave(transport)
            .send_raw_request("0xf8", &["B".to_string()], None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, EnclaveError::Rpc(_)));
    }
}
