//! End-to-end integration tests for Veil.
//!
//! These drive the transaction managers through the public API against an
//! in-memory enclave and an in-memory node. They cover the whole path from
//! nonce fetch to submission: builder, enclave round-trip, signing, the
//! private marker, and what finally reaches the wire.
//!
//! Each test builds its own doubles. No shared state, no network.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use primitive_types::U256;
use serde_json::{json, Value};

use veil_protocol::crypto::Credentials;
use veil_protocol::enclave::{Enclave, EnclaveError, QuorumEnclave, StoreRawResponse, TesseraClient};
use veil_protocol::manager::{ClientTransactionManager, ManagerConfig, ManagerError, RawTransactionManager};
use veil_protocol::network::{NodeRpc, RpcClientError, RpcMethod, RpcTransport};
use veil_protocol::transaction::{
    decode_signed, recover_sender, sign_transaction, PrivacyFlag, RawTransaction, SubmissionResult,
};

// ---------------------------------------------------------------------------
// Test Doubles
// ---------------------------------------------------------------------------

/// Node double: answers each method from a fixed table and records calls.
#[derive(Default)]
struct FakeNode {
    client_version: String,
    nonce: u64,
    calls: Mutex<Vec<(RpcMethod, Value)>>,
}

impl FakeNode {
    fn new(client_version: &str, nonce: u64) -> Arc<Self> {
        Arc::new(Self {
            client_version: client_version.to_string(),
            nonce,
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<(RpcMethod, Value)> {
        self.calls.lock().clone()
    }

    fn calls_to(&self, method: RpcMethod) -> Vec<Value> {
        self.calls()
            .into_iter()
            .filter(|(m, _)| *m == method)
            .map(|(_, params)| params)
            .collect()
    }
}

#[async_trait]
impl RpcTransport for FakeNode {
    async fn request(&self, method: RpcMethod, params: Value) -> Result<Value, RpcClientError> {
        self.calls.lock().push((method, params));
        match method {
            RpcMethod::ClientVersion => Ok(json!(self.client_version)),
            RpcMethod::GetTransactionCount => Ok(json!(format!("0x{:x}", self.nonce))),
            RpcMethod::SendRawTransaction => Ok(json!("0x0000000000000000000000000000000000000000000000000000000000000001")),
            RpcMethod::SendRawPrivateTransaction => {
                Ok(json!("0x0000000000000000000000000000000000000000000000000000000000000002"))
            }
            RpcMethod::SendTransaction => Ok(json!("0x0000000000000000000000000000000000000000000000000000000000000003")),
            RpcMethod::GetTransactionReceipt => Ok(Value::Null),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Submitted {
    signed_hex: String,
    to: Vec<String>,
    privacy_flag: Option<PrivacyFlag>,
    mandatory_for: Option<Vec<String>>,
}

/// Enclave double: hands out queued keys and records both calls.
struct FakeEnclave {
    keys: Mutex<VecDeque<Result<String, u16>>>,
    stored: Mutex<Vec<(String, String, Vec<String>)>>,
    submitted: Mutex<Vec<Submitted>>,
}

impl FakeEnclave {
    fn with_keys(keys: Vec<Result<&str, u16>>) -> Arc<Self> {
        Arc::new(Self {
            keys: Mutex::new(keys.into_iter().map(|k| k.map(str::to_string)).collect()),
            stored: Mutex::new(Vec::new()),
            submitted: Mutex::new(Vec::new()),
        })
    }

    fn submitted(&self) -> Vec<Submitted> {
        self.submitted.lock().clone()
    }
}

#[async_trait]
impl Enclave for FakeEnclave {
    async fn store_raw_request(
        &self,
        payload: &str,
        from: &str,
        to: &[String],
    ) -> Result<StoreRawResponse, EnclaveError> {
        self.stored
            .lock()
            .push((payload.to_string(), from.to_string(), to.to_vec()));
        match self.keys.lock().pop_front() {
            Some(Ok(key)) => Ok(StoreRawResponse { key }),
            Some(Err(status)) => Err(EnclaveError::Rejected {
                status,
                body: "store failed".into(),
            }),
            None => Err(EnclaveError::Transport("no key queued".into())),
        }
    }

    async fn send_raw_request(
        &self,
        signed_hex: &str,
        to: &[String],
        privacy_flag: Option<PrivacyFlag>,
        mandatory_for: Option<&[String]>,
    ) -> Result<SubmissionResult, EnclaveError> {
        self.submitted.lock().push(Submitted {
            signed_hex: signed_hex.to_string(),
            to: to.to_vec(),
            privacy_flag,
            mandatory_for: mandatory_for.map(|m| m.to_vec()),
        });
        Ok(SubmissionResult::new("0xenclave"))
    }
}

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

const SENDER_ENCLAVE_KEY: &str = "BULeR8JyUWhiuuCMU/HLA0Q5pzkYT+cHII3ZKBey3Bo=";

fn hex_bytes(signed_hex: &str) -> Vec<u8> {
    hex::decode(signed_hex.trim_start_matches("0x")).expect("hex")
}

fn sample_tx(data: &str) -> RawTransaction {
    RawTransaction::builder(U256::from(5u64), U256::zero(), U256::from(4_300_000u64))
        .to_hex("0x2c7536e3605d9c16a7a3d7b1898e529396a65c23")
        .expect("address")
        .data(data)
        .build()
        .expect("tx")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_public_path_is_byte_identical_to_plain_signing() {
    let creds = Credentials::generate();
    let node = FakeNode::new("GoQuorum/v22.7.0", 5);
    let enclave = FakeEnclave::with_keys(vec![]);
    let manager = RawTransactionManager::new(
        ManagerConfig::new(creds.clone(), SENDER_ENCLAVE_KEY),
        enclave.clone(),
        NodeRpc::new(node.clone()),
    );

    manager
        .send_transaction(U256::zero(), U256::from(4_300_000u64), sample_tx("0x").to().copied(), "0xdeadbeef", U256::zero())
        .await
        .unwrap();

    let raw = node.calls_to(RpcMethod::SendRawTransaction);
    assert_eq!(raw.len(), 1);
    let expected = sign_transaction(&sample_tx("0xdeadbeef"), &creds, None);
    assert_eq!(hex_bytes(raw[0][0].as_str().unwrap()), expected);
    assert!(enclave.submitted().is_empty());
    assert!(enclave.stored.lock().is_empty());
}

#[tokio::test]
async fn test_private_path_substitutes_payload_and_marks() {
    let creds = Credentials::generate();
    let node = FakeNode::new("GoQuorum/v22.7.0", 5);
    // "q80=" is base64 for 0xabcd.
    let enclave = FakeEnclave::with_keys(vec![Ok("q80=")]);
    let manager = RawTransactionManager::new(
        ManagerConfig::new(creds.clone(), SENDER_ENCLAVE_KEY).with_private_for(vec!["B".into()]),
        enclave.clone(),
        NodeRpc::new(node.clone()),
    );

    let result = manager.sign_and_send(&sample_tx("0xdeadbeef")).await.unwrap();
    assert_eq!(result.transaction_hash, "0xenclave");

    let stored = enclave.stored.lock().clone();
    assert_eq!(
        stored,
        vec![("3q2+7w==".to_string(), SENDER_ENCLAVE_KEY.to_string(), vec!["B".to_string()])]
    );

    let submitted = enclave.submitted();
    assert_eq!(submitted.len(), 1);
    let signed = decode_signed(&hex_bytes(&submitted[0].signed_hex)).unwrap();
    assert_eq!(signed.transaction.data(), "0xabcd");
    assert_eq!(signed.transaction.nonce(), U256::from(5u64));
    assert!(signed.v == 37 || signed.v == 38, "v = {}", signed.v);
    assert_eq!(recover_sender(&hex_bytes(&submitted[0].signed_hex)).unwrap(), creds.address());

    // Nothing went out over the plain submission call.
    assert!(node.calls_to(RpcMethod::SendRawTransaction).is_empty());
}

#[tokio::test]
async fn test_storage_key_bytes_are_substituted_verbatim() {
    let node = FakeNode::new("GoQuorum/v22.7.0", 0);
    // "a2V5" is base64 for the ASCII bytes "key".
    let enclave = FakeEnclave::with_keys(vec![Ok("a2V5")]);
    let manager = RawTransactionManager::new(
        ManagerConfig::new(Credentials::generate(), SENDER_ENCLAVE_KEY).with_private_for(vec!["B".into()]),
        enclave.clone(),
        NodeRpc::new(node),
    );

    manager.sign_and_send(&sample_tx("0xdeadbeef")).await.unwrap();

    let signed = decode_signed(&hex_bytes(&enclave.submitted()[0].signed_hex)).unwrap();
    assert_eq!(signed.transaction.data(), "0x6b6579");
}

#[tokio::test]
async fn test_private_recovery_byte_is_never_legacy() {
    // Many keys, so both recovery-id parities show up.
    for _ in 0..16 {
        let enclave = FakeEnclave::with_keys(vec![Ok("q80=")]);
        let manager = RawTransactionManager::new(
            ManagerConfig::new(Credentials::generate(), SENDER_ENCLAVE_KEY).with_private_for(vec!["B".into()]),
            enclave.clone(),
            NodeRpc::new(FakeNode::new("GoQuorum", 0)),
        );
        manager.sign_and_send(&sample_tx("0x01")).await.unwrap();

        let v = decode_signed(&hex_bytes(&enclave.submitted()[0].signed_hex)).unwrap().v;
        assert!(v == 37 || v == 38, "v = {}", v);
    }
}

#[tokio::test]
async fn test_absent_flag_and_mandatory_for_reach_enclave_as_absent() {
    let enclave = FakeEnclave::with_keys(vec![Ok("q80=")]);
    let manager = RawTransactionManager::new(
        ManagerConfig::new(Credentials::generate(), SENDER_ENCLAVE_KEY).with_private_for(vec!["B".into(), "C".into()]),
        enclave.clone(),
        NodeRpc::new(FakeNode::new("GoQuorum", 0)),
    );

    manager.sign_and_send(&sample_tx("0x01")).await.unwrap();

    let submitted = &enclave.submitted()[0];
    assert_eq!(submitted.to, vec!["B".to_string(), "C".to_string()]);
    assert_eq!(submitted.privacy_flag, None);
    assert_eq!(submitted.mandatory_for, None);
}

#[tokio::test]
async fn test_absent_fields_are_omitted_on_the_wire() {
    // Real enclave adapter, fake node: check the JSON the node would see.
    let node = FakeNode::new("GoQuorum", 0);
    let rpc = NodeRpc::new(node.clone());
    let enclave = QuorumEnclave::new(TesseraClient::new("http://127.0.0.1:9").unwrap(), rpc.clone());

    enclave
        .send_raw_request("0xf86c", &["B".to_string()], None, None)
        .await
        .unwrap();
    let mandatory: Vec<String> = vec![];
    enclave
        .send_raw_request("0xf86c", &["B".to_string()], Some(PrivacyFlag::StandardPrivate), Some(mandatory.as_slice()))
        .await
        .unwrap();

    let calls = node.calls_to(RpcMethod::SendRawPrivateTransaction);
    assert_eq!(calls[0][1], json!({ "privateFor": ["B"] }));
    assert_eq!(
        calls[1][1],
        json!({ "privateFor": ["B"], "privacyFlag": 0, "mandatoryFor": [] })
    );
}

#[tokio::test]
async fn test_enclave_failure_aborts_without_submission() {
    let node = FakeNode::new("GoQuorum", 0);
    let enclave = FakeEnclave::with_keys(vec![Err(503)]);
    let manager = RawTransactionManager::new(
        ManagerConfig::new(Credentials::generate(), SENDER_ENCLAVE_KEY).with_private_for(vec!["B".into()]),
        enclave.clone(),
        NodeRpc::new(node.clone()),
    );

    let err = manager
        .send_transaction(U256::zero(), U256::from(100_000u64), None, "0x6060", U256::zero())
        .await
        .unwrap_err();

    assert!(matches!(err, ManagerError::Enclave(EnclaveError::Rejected { status: 503, .. })));
    assert!(enclave.submitted().is_empty());
    assert_eq!(
        node.calls().into_iter().map(|(m, _)| m).collect::<Vec<_>>(),
        vec![RpcMethod::GetTransactionCount]
    );
}

#[tokio::test]
async fn test_reconfiguration_switches_path_for_later_calls() {
    let node = FakeNode::new("GoQuorum", 0);
    let enclave = FakeEnclave::with_keys(vec![Ok("q80=")]);
    let manager = RawTransactionManager::new(
        ManagerConfig::new(Credentials::generate(), SENDER_ENCLAVE_KEY).with_private_for(vec!["B".into()]),
        enclave.clone(),
        NodeRpc::new(node.clone()),
    );
    let tx = sample_tx("0x01");

    manager.sign_and_send(&tx).await.unwrap();
    manager.set_private_for(vec![]);
    manager.sign_and_send(&tx).await.unwrap();

    assert_eq!(enclave.submitted().len(), 1);
    assert_eq!(node.calls_to(RpcMethod::SendRawTransaction).len(), 1);
}

#[tokio::test]
async fn test_replay_protection_applies_to_public_path_only() {
    let creds = Credentials::generate();
    let node = FakeNode::new("GoQuorum", 0);
    let manager = RawTransactionManager::new(
        ManagerConfig::new(creds.clone(), SENDER_ENCLAVE_KEY).with_chain_id(Some(10)),
        FakeEnclave::with_keys(vec![]),
        NodeRpc::new(node.clone()),
    );

    manager.sign_and_send(&sample_tx("0x01")).await.unwrap();

    let raw = node.calls_to(RpcMethod::SendRawTransaction);
    let signed = decode_signed(&hex_bytes(raw[0][0].as_str().unwrap())).unwrap();
    assert!(signed.v == 55 || signed.v == 56, "v = {}", signed.v);
    assert_eq!(signed.kind.chain_id(), Some(10));
    assert_eq!(recover_sender(&hex_bytes(raw[0][0].as_str().unwrap())).unwrap(), creds.address());
}

#[tokio::test]
async fn test_client_manager_requires_privacy_node() {
    let err = ClientTransactionManager::connect(
        NodeRpc::new(FakeNode::new("Geth/v1.13.5-stable-916d6a44", 0)),
        "0xed9d02e382b34818e88b88a309c7fe71e65f419d",
        vec!["B".into()],
    )
    .await
    .unwrap_err();

    assert!(matches!(err, ManagerError::UnsupportedTransport { .. }));
}

#[tokio::test]
async fn test_client_manager_sends_unsigned_transaction() {
    let node = FakeNode::new("Geth/v1.9.7-stable-a21e1d44(quorum-v21.1.0)", 0);
    let manager = ClientTransactionManager::connect(
        NodeRpc::new(node.clone()),
        "0xed9d02e382b34818e88b88a309c7fe71e65f419d",
        vec!["B".into()],
    )
    .await
    .unwrap();

    manager
        .send_transaction(U256::zero(), U256::from(4_300_000u64), None, "0x6060", U256::zero())
        .await
        .unwrap();

    let sent = node.calls_to(RpcMethod::SendTransaction);
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0][0]["from"], "0xed9d02e382b34818e88b88a309c7fe71e65f419d");
    assert_eq!(sent[0][0]["privateFor"], json!(["B"]));
    // The node signs; we never touch the raw submission calls.
    assert!(node.calls_to(RpcMethod::SendRawTransaction).is_empty());
    assert!(node.calls_to(RpcMethod::SendRawPrivateTransaction).is_empty());
}
