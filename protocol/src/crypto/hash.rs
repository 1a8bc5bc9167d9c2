//! # Hashing Utilities
//!
//! One hash function, and it isn't even the standardized SHA-3: the chain
//! uses the original Keccak-256 padding, which is what `sha3::Keccak256`
//! implements. Transaction hashes, signing digests and addresses all go
//! through [`keccak256`].

use sha3::{Digest, Keccak256};

/// Compute the Keccak-256 digest of the input.
///
/// # Example
///
/// ```
/// use veil_protocol::crypto::keccak256;
///
/// let hash = keccak256(b"");
/// assert_eq!(
///     hex::encode(hash),
///     "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
/// );
/// ```
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// Hex-encoded Keccak-256 with a `0x` prefix. Handy for transaction hashes
/// that end up in logs and RPC responses.
pub fn keccak256_hex(data: &[u8]) -> String {
    format!("0x{}", hex::encode(keccak256(data)))
}
