//! # Recoverable ECDSA Signatures
//!
//! The chain never sees a public key. It recovers one from `(hash, r, s,
//! recovery_id)` and derives the sender address from it, so every signature
//! we produce must keep its recovery id.
//!
//! Signing is deterministic (RFC 6979 nonces inside `secp256k1`): the same
//! credential and digest always produce the same `(r, s, recovery_id)`.

use secp256k1::ecdsa::{RecoverableSignature, RecoveryId};
use secp256k1::{Message, Secp256k1};
use thiserror::Error;

use super::keys::{public_key_to_address, Credentials};
use crate::transaction::types::Address;

/// Errors from signature parsing and sender recovery.
#[derive(Debug, Error)]
pub enum SignatureError {
    /// The recovery id is not 0 or 1 (after stripping any encoding offset).
    #[error("invalid recovery id: {0}")]
    InvalidRecoveryId(u64),

    /// `r`/`s` do not form a valid signature.
    #[error("malformed signature components")]
    Malformed,

    /// Recovery produced no valid public key for this digest.
    #[error("public key recovery failed")]
    RecoveryFailed,
}

/// A recoverable ECDSA signature in its raw form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EcdsaSignature {
    /// 0 or 1. Encodings add their own offset (27, 35 + 2 * chain_id, ...).
    pub recovery_id: u8,
    pub r: [u8; 32],
    pub s: [u8; 32],
}

impl EcdsaSignature {
    fn compact(&self) -> [u8; 64] {
        let mut out = [0u8; 64];
        out[..32].copy_from_slice(&self.r);
        out[32..].copy_from_slice(&self.s);
        out
    }
}

/// Signs a 32-byte digest.
pub fn sign_hash(credentials: &Credentials, hash: &[u8; 32]) -> EcdsaSignature {
    let secp = Secp256k1::signing_only();
    let message = Message::from_digest(*hash);
    let signature = secp.sign_ecdsa_recoverable(&message, credentials.secret_key());
    let (recovery_id, compact) = signature.serialize_compact();

    let mut r = [0u8; 32];
    let mut s = [0u8; 32];
    r.copy_from_slice(&compact[..32]);
    s.copy_from_slice(&compact[32..]);

    EcdsaSignature {
        // to_i32 is always 0..=3, and practically always 0 or 1.
        recovery_id: recovery_id.to_i32() as u8,
        r,
        s,
    }
}

/// Recovers the address that produced `signature` over `hash`.
pub fn recover_address(hash: &[u8; 32], signature: &EcdsaSignature) -> Result<Address, SignatureError> {
    let recovery_id = RecoveryId::from_i32(i32::from(signature.recovery_id))
        .map_err(|_| SignatureError::InvalidRecoveryId(u64::from(signature.recovery_id)))?;
    let recoverable = RecoverableSignature::from_compact(&signature.compact(), recovery_id)
        .map_err(|_| SignatureError::Malformed)?;

    let secp = Secp256k1::verification_only();
    let public = secp
        .recover_ecdsa(&Message::from_digest(*hash), &recoverable)
        .map_err(|_| SignatureError::RecoveryFailed)?;

    Ok(public_key_to_address(&public))
}
