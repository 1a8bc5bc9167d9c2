//! Receipt polling.
//!
//! Submission only tells us the node accepted a transaction. Callers that need
//! to know it was mined poll for the receipt with a
//! [`PollingReceiptProcessor`].

use std::time::Duration;
use thiserror::Error;

use super::node::{NodeRpc, TransactionReceipt};
use super::transport::RpcClientError;
use crate::config::{DEFAULT_POLLING_ATTEMPTS, DEFAULT_POLLING_INTERVAL};

#[derive(Debug, Error)]
pub enum ReceiptError {
    #[error("no receipt for {transaction_hash} after {attempts} attempts")]
    Timeout { transaction_hash: String, attempts: u32 },

    #[error(transparent)]
    Rpc(#[from] RpcClientError),
}

/// Polls `eth_getTransactionReceipt` a fixed number of times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollingReceiptProcessor {
    attempts: u32,
    interval: Duration,
}

impl Default for PollingReceiptProcessor {
    fn default() -> Self {
        Self::new(DEFAULT_POLLING_ATTEMPTS, DEFAULT_POLLING_INTERVAL)
    }
}

impl PollingReceiptProcessor {
    pub fn new(attempts: u32, interval: Duration) -> Self {
        Self { attempts, interval }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Waits until the node has a receipt for `transaction_hash`.
    ///
    /// Sleeps `interval` between polls, never after the last one. RPC errors
    /// end the wait immediately.
    pub async fn wait_for_receipt(
        &self,
        node: &NodeRpc,
        transaction_hash: &str,
    ) -> Result<TransactionReceipt, ReceiptError> {
        for attempt in 1..=self.attempts {
            if let Some(receipt) = node.transaction_receipt(transaction_hash).await? {
                tracing::debug!(tx = transaction_hash, attempt, "receipt available");
                return Ok(receipt);
            }
            if attempt < self.attempts {
                tokio::time::sleep(self.interval).await;
            }
        }

        tracing::warn!(tx = transaction_hash, attempts = self.attempts, "gave up waiting for receipt");
        Err(ReceiptError::Timeout {
            transaction_hash: transaction_hash.to_string(),
            attempts: self.attempts,
        })
    }
}
