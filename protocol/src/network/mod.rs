//! # Network Module
//!
//! Everything Veil says to the chain node. The node is reached over JSON-RPC;
//! this module owns the envelope types, the transport seam, the typed calls
//! and receipt polling.
//!
//! ## Architecture
//!
//! ```text
//! rpc.rs        JSON-RPC method names and request/response envelopes
//! transport.rs  RpcTransport trait and the reqwest-backed HttpTransport
//! node.rs       NodeRpc: typed calls (nonce, submit, receipt, version)
//! receipt.rs    PollingReceiptProcessor
//! ```
//!
//! ## Design Decisions
//!
//! - The transport is a trait object so the managers can be driven by a
//!   scripted node in tests. Nothing above `transport.rs` knows about HTTP.
//! - `NodeRpc` is `Clone` and shares its transport through an `Arc`, so the
//!   raw manager, the client manager and the enclave's submission half can
//!   all hold one without coordinating lifetimes.
//! - A `null` RPC result is data, not an error: a pending receipt is `null`.

pub mod node;
pub mod receipt;
pub mod rpc;
pub mod transport;

pub use node::{NodeRpc, PrivateRawParams, TransactionReceipt};
pub use receipt::{PollingReceiptProcessor, ReceiptError};
pub use rpc::{RpcError, RpcMethod, RpcRequest, RpcResponse};
pub use transport::{HttpTransport, RpcClientError, RpcTransport};
