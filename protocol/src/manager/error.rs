use thiserror::Error;

use crate::enclave::EnclaveError;
use crate::network::{ReceiptError, RpcClientError};
use crate::transaction::TransactionError;

/// Errors surfaced by the transaction managers.
///
/// Nothing is retried or reinterpreted on the way up. A recovery-field
/// rewrite that doesn't apply is not an error and never shows up here.
#[derive(Debug, Error)]
pub enum ManagerError {
    /// The node doesn't speak the privacy extension.
    #[error("node does not support private transactions (client version: {client_version})")]
    UnsupportedTransport { client_version: String },

    #[error("enclave error: {0}")]
    Enclave(#[from] EnclaveError),

    #[error("rpc error: {0}")]
    Rpc(#[from] RpcClientError),

    #[error("receipt error: {0}")]
    Receipt(#[from] ReceiptError),

    #[error("transaction error: {0}")]
    Transaction(#[from] TransactionError),
}
