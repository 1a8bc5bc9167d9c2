//! Scripted collaborators shared by the unit tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Arc;

use crate::enclave::{Enclave, EnclaveError, StoreRawResponse};
use crate::network::{RpcClientError, RpcMethod, RpcTransport};
use crate::transaction::{PrivacyFlag, SubmissionResult};

/// Replays canned results in order and records every call.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    replies: Mutex<VecDeque<Result<Value, RpcClientError>>>,
    calls: Mutex<Vec<(RpcMethod, Value)>>,
}

impl ScriptedTransport {
    pub fn with_replies(replies: Vec<Result<Value, RpcClientError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<(RpcMethod, Value)> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl RpcTransport for ScriptedTransport {
    async fn request(&self, method: RpcMethod, params: Value) -> Result<Value, RpcClientError> {
        self.calls.lock().push((method, params));
        self.replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(RpcClientError::Transport("no scripted reply".into())))
    }
}

/// What a [`RecordingEnclave`] saw on `send_raw_request`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SentRaw {
    pub signed_hex: String,
    pub to: Vec<String>,
    pub privacy_flag: Option<PrivacyFlag>,
    pub mandatory_for: Option<Vec<String>>,
}

/// Enclave double that hands out a fixed storage key.
pub(crate) struct RecordingEnclave {
    key: String,
    fail_store: bool,
    stored: Mutex<Vec<(String, String, Vec<String>)>>,
    sent: Mutex<Vec<SentRaw>>,
}

impl RecordingEnclave {
    pub fn returning(key: &str) -> Arc<Self> {
        Arc::new(Self {
            key: key.to_string(),
            fail_store: false,
            stored: Mutex::new(Vec::new()),
            sent: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            key: String::new(),
            fail_store: true,
            stored: Mutex::new(Vec::new()),
            sent: Mutex::new(Vec::new()),
        })
    }

    pub fn stored(&self) -> Vec<(String, String, Vec<String>)> {
        self.stored.lock().clone()
    }

    pub fn sent(&self) -> Vec<SentRaw> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl Enclave for RecordingEnclave {
    async fn store_raw_request(
        &self,
        payload: &str,
        from: &str,
        to: &[String],
    ) -> Result<StoreRawResponse, EnclaveError> {
        self.stored
            .lock()
            .push((payload.to_string(), from.to_string(), to.to_vec()));
        if self.fail_store {
            return Err(EnclaveError::Rejected {
                status: 500,
                body: "enclave unavailable".into(),
            });
        }
        Ok(StoreRawResponse { key: self.key.clone() })
    }

    async fn send_raw_request(
        &self,
        signed_hex: &str,
        to: &[String],
        privacy_flag: Option<PrivacyFlag>,
        mandatory_for: Option<&[String]>,
    ) -> Result<SubmissionResult, EnclaveError> {
        self.sent.lock().push(SentRaw {
            signed_hex: signed_hex.to_string(),
            to: to.to_vec(),
            privacy_flag,
            mandatory_for: mandatory_for.map(<[String]>::to_vec),
        });
        Ok(SubmissionResult::new("0xprivate"))
    }
}
