//! # Transaction Module
//!
//! Construction, signing, privacy marking and inspection of legacy-encoded
//! transactions.
//!
//! ## Architecture
//!
//! ```text
//! types.rs        : Address, PrivacyFlag, SubmissionResult, hex helpers
//! builder.rs      : RawTransaction and its fluent builder
//! signing.rs      : canonical encoding, digest and secp256k1 signing
//! privacy.rs      : recovery-field rewrite (27/28 -> 37/38)
//! verification.rs : decoding signed encodings and recovering the sender
//! ```
//!
//! ## Transaction Lifecycle
//!
//! 1. **Build** a [`RawTransaction`] with [`RawTransactionBuilder`].
//! 2. **Sign** it with [`sign_transaction`]; the result is the signed
//!    encoding, produced once and never edited in place.
//! 3. **Mark** it with [`mark_private`] if, and only if, it is going out on
//!    the private path. Marking returns a new buffer.
//! 4. **Submit** the hex of the final bytes through the node or enclave.
//!
//! ## Design Decisions
//!
//! - All quantities are `U256`. The chain doesn't cap them at 64 bits, so
//!   neither do we.
//! - `data` stays hex on this side of the enclave boundary and base64 on the
//!   other. The pipeline in [`crate::manager`] does the one conversion at each
//!   crossing.

pub mod builder;
pub mod privacy;
pub mod signing;
pub mod types;
pub mod verification;

pub use builder::{RawTransaction, RawTransactionBuilder};
pub use privacy::mark_private;
pub use signing::sign_transaction;
pub use types::{Address, PrivacyFlag, PrivateTransaction, SubmissionResult};
pub use verification::{decode_signed, recover_sender, RecoveryKind, SignedTransaction, TransactionError};
