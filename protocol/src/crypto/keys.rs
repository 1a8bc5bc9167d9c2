//! # Key Management
//!
//! secp256k1 credentials for signing transactions locally.
//!
//! A [`Credentials`] value is the signer credential the transaction manager
//! holds for its whole lifetime. The sender address is derived once at
//! construction (`keccak256(uncompressed_pubkey[1..])[12..]`) so it never has
//! to be recomputed on the hot path.
//!
//! ## Security considerations
//!
//! - Key generation uses `OsRng`.
//! - `Credentials` implements neither `Serialize` nor a revealing `Debug`.
//!   Exporting a secret key should be a deliberate call to
//!   [`Credentials::secret_key_hex`], not an accident in a log line.

use rand::rngs::OsRng;
use secp256k1::{PublicKey, Secp256k1, SecretKey};
use std::fmt;
use thiserror::Error;

use super::hash::keccak256;
use crate::transaction::types::Address;

/// Errors that can occur while loading key material.
///
/// Deliberately vague: error messages must never echo key bytes.
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("invalid secret key: not 32 bytes or not a valid scalar")]
    InvalidSecretKey,

    #[error("invalid secret key encoding: expected 64 hex characters")]
    InvalidHex,
}

/// A secp256k1 signing credential and the address it controls.
#[derive(Clone)]
pub struct Credentials {
    secret: SecretKey,
    address: Address,
}

impl Credentials {
    /// Generates a fresh credential from the OS RNG.
    pub fn generate() -> Self {
        Self::from_secret(SecretKey::new(&mut OsRng))
    }

    /// Loads a credential from raw 32-byte secret key material.
    pub fn from_secret_bytes(bytes: &[u8; 32]) -> Result<Self, KeyError> {
        let secret = SecretKey::from_slice(bytes).map_err(|_| KeyError::InvalidSecretKey)?;
        Ok(Self::from_secret(secret))
    }

    /// Loads a credential from a hex-encoded secret key, with or without a
    /// `0x` prefix. Convenient for config files and environment variables.
    pub fn from_hex(hex_str: &str) -> Result<Self, KeyError> {
        let trimmed = hex_str.trim();
        let stripped = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        let bytes = hex::decode(stripped).map_err(|_| KeyError::InvalidHex)?;
        let array: [u8; 32] = bytes.try_into().map_err(|_| KeyError::InvalidHex)?;
        Self::from_secret_bytes(&array)
    }

    fn from_secret(secret: SecretKey) -> Self {
        let secp = Secp256k1::signing_only();
        let public = PublicKey::from_secret_key(&secp, &secret);
        Self {
            secret,
            address: public_key_to_address(&public),
        }
    }

    /// The address this credential signs for.
    pub fn address(&self) -> Address {
        self.address
    }

    /// The address as 0x-prefixed lowercase hex.
    pub fn address_hex(&self) -> String {
        format!("0x{}", hex::encode(self.address.as_bytes()))
    }

    /// Exports the secret key as hex. Handle with care.
    pub fn secret_key_hex(&self) -> String {
        hex::encode(self.secret.secret_bytes())
    }

    pub(crate) fn secret_key(&self) -> &SecretKey {
        &self.secret
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("address", &self.address_hex())
            .finish_non_exhaustive()
    }
}

impl PartialEq for Credentials {
    fn eq(&self, other: &Self) -> bool {
        self.secret == other.secret
    }
}

impl Eq for Credentials {}

/// Derives the 20-byte address of a public key: the last 20 bytes of the
/// Keccak-256 of the uncompressed point without its `0x04` tag.
pub fn public_key_to_address(public: &PublicKey) -> Address {
    let uncompressed = public.serialize_uncompressed();
    let hash = keccak256(&uncompressed[1..]);
    Address::from_slice(&hash[12..])
}
