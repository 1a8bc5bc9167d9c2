//! # Transaction Managers
//!
//! Entry points for sending transactions.
//!
//! - [`RawTransactionManager`] signs locally. Transactions with a non-empty
//!   recipient set go through the enclave and get the private marker; the
//!   rest are submitted as ordinary signed transactions.
//! - [`ClientTransactionManager`] lets the node sign. Only usable against a
//!   privacy-capable node, which is checked on connect.
//!
//! Both take their privacy settings from instance state. See the
//! concurrency notes on [`raw`].

pub mod client;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod raw;

pub use client::ClientTransactionManager;
pub use config::{ManagerConfig, PrivacySettings};
pub use error::ManagerError;
pub use pipeline::PrivacyPipeline;
pub use raw::RawTransactionManager;
