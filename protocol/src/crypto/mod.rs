//! # Cryptographic Primitives for Veil
//!
//! Everything that touches key material lives here. The chain speaks
//! secp256k1 ECDSA with recoverable signatures and Keccak-256 hashes, so
//! that's what we speak too:
//!
//! - **Keccak-256** for transaction hashes and address derivation.
//! - **secp256k1** for signing, with the recovery id kept around because the
//!   chain recovers the sender instead of shipping a public key.
//!
//! Both are thin wrappers around audited crates (`sha3`, `secp256k1`). We
//! don't roll our own, and neither should you.

pub mod hash;
pub mod keys;
pub mod signatures;

pub use hash::keccak256;
pub use keys::{Credentials, KeyError};
pub use signatures::{recover_address, sign_hash, EcdsaSignature, SignatureError};
