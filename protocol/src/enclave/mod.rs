//! # Enclave Client
//!
//! The enclave keeps private payloads off-chain. Veil talks to it through two
//! calls:
//!
//! - `store_raw_request(payload, from, to)` stores a base64 payload and
//!   returns a base64 key. The key replaces the payload in the signed
//!   transaction.
//! - `send_raw_request(signed_hex, to, privacy_flag, mandatory_for)` submits
//!   the signed, marked transaction so the node can fetch the payload and
//!   distribute it to the recipients.
//!
//! [`TesseraClient`] implements the storage half over HTTP. [`QuorumEnclave`]
//! pairs it with a node connection for the submission half.
//!
//! Encoding convention: everything on this side of the boundary is base64.
//! The hex side belongs to the pipeline.

pub mod quorum;
pub mod tessera;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::network::RpcClientError;
use crate::transaction::{PrivacyFlag, SubmissionResult};

pub use quorum::QuorumEnclave;
pub use tessera::TesseraClient;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Failures of either enclave call. Never retried by Veil.
#[derive(Debug, Error)]
pub enum EnclaveError {
    /// No response (connection refused, timeout).
    #[error("enclave unreachable: {0}")]
    Transport(String),

    /// The enclave answered with a non-success status.
    #[error("enclave rejected request with status {status}: {body}")]
    Rejected { status: u16, body: String },

    /// The enclave answered, but the body isn't what we expected.
    #[error("malformed enclave response: {0}")]
    MalformedResponse(String),

    /// The submission half failed at the node.
    #[error(transparent)]
    Rpc(#[from] RpcClientError),
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// Body of the raw store call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreRawRequest {
    /// Base64 payload.
    pub payload: String,
    /// Sender's enclave public key.
    pub from: String,
    /// Recipients' enclave public keys.
    pub to: Vec<String>,
}

/// Response of the raw store call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreRawResponse {
    /// Base64 key under which the payload was stored.
    pub key: String,
}

// ---------------------------------------------------------------------------
// Enclave trait
// ---------------------------------------------------------------------------

/// The two-call enclave interface the pipeline depends on.
#[async_trait]
pub trait Enclave: Send + Sync {
    /// Stores a base64 payload and returns the key it was stored under.
    async fn store_raw_request(
        &self,
        payload: &str,
        from: &str,
        to: &[String],
    ) -> Result<StoreRawResponse, EnclaveError>;

    /// Submits a signed private transaction.
    ///
    /// `privacy_flag` and `mandatory_for` arrive exactly as configured.
    /// Implementations must not substitute a default for `None`.
    async fn send_raw_request(
        &self,
        signed_hex: &str,
        to: &[String],
        privacy_flag: Option<PrivacyFlag>,
        mandatory_for: Option<&[String]>,
    ) -> Result<SubmissionResult, EnclaveError>;
}
