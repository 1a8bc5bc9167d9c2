// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Veil Protocol — Core Library
//!
//! Veil signs and submits transactions to permissioned chains whose nodes
//! understand private transactions. A private transaction never puts its
//! payload on-chain: the payload goes to an enclave, the enclave hands back a
//! key, and the key is what gets signed and broadcast. The node recognizes
//! the transaction as private by its recovery id, which Veil moves from
//! 27/28 to 37/38 after signing.
//!
//! ## Architecture
//!
//! - **codec** — RLP tree decoding and encoding.
//! - **crypto** — secp256k1 credentials, Keccak-256, recoverable signatures.
//! - **transaction** — Building, signing, the private marker, inspection.
//! - **enclave** — The two-call enclave interface and its HTTP client.
//! - **network** — JSON-RPC to the chain node and receipt polling.
//! - **manager** — The pipeline and the two transaction managers.
//! - **config** — Protocol constants and defaults.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use primitive_types::U256;
//! use veil_protocol::crypto::Credentials;
//! use veil_protocol::enclave::{QuorumEnclave, TesseraClient};
//! use veil_protocol::manager::{ManagerConfig, RawTransactionManager};
//! use veil_protocol::network::NodeRpc;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let node = NodeRpc::http("http://127.0.0.1:22000")?;
//! let enclave = QuorumEnclave::new(TesseraClient::new("http://127.0.0.1:9081")?, node.clone());
//! let config = ManagerConfig::new(Credentials::generate(), "BULeR8JyUWhiuuCMU/HLA0Q5pzkYT+cHII3ZKBey3Bo=")
//!     .with_private_for(vec!["QfeDAys9MPDs2XHExtc84jKGHxZg/aj52DTh0vtA3Xc=".into()]);
//!
//! let manager = RawTransactionManager::new(config, Arc::new(enclave), node);
//! let result = manager
//!     .send_transaction(U256::zero(), U256::from(4_300_000u64), None, "0x6060", U256::zero())
//!     .await?;
//! println!("submitted {}", result.transaction_hash);
//! # Ok(())
//! # }
//! ```
//!
//! ## Design Philosophy
//!
//! 1. The private marker is a pure function over bytes. It never fails; a
//!    shape it doesn't recognize passes through unchanged.
//! 2. Absent is not a value. An unset privacy flag stays unset all the way
//!    to the wire.
//! 3. Nothing retries behind your back.

pub mod codec;
pub mod config;
pub mod crypto;
pub mod enclave;
pub mod manager;
pub mod network;
pub mod transaction;

#[cfg(test)]
pub(crate) mod testing;
