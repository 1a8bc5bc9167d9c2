//! Transaction signing with secp256k1 credentials.
//!
//! Signing is a separate step from building because the credential may not be
//! available at construction time. The digest is the Keccak-256 of the
//! canonical unsigned encoding:
//!
//! - legacy: `rlp([nonce, gasPrice, gasLimit, to, value, data])`
//! - replay-protected: the same list with `chain_id, 0, 0` appended
//!
//! and the output is the signed encoding
//! `rlp([nonce, gasPrice, gasLimit, to, value, data, v, r, s])` where `v` is
//! `27 + recid` (legacy) or `recid + 35 + 2 * chain_id` (replay-protected).
//!
//! Private transactions are always signed legacy-style. Their `v` is later
//! moved into the 37/38 range by [`super::privacy::mark_private`], which
//! would collide with replay-protected values for chain id 1.

use primitive_types::U256;
use rlp::RlpStream;

use super::builder::RawTransaction;
use crate::config::{EIP155_V_OFFSET, LEGACY_V_BASE, SIGNED_FIELD_COUNT, UNSIGNED_FIELD_COUNT};
use crate::crypto::{keccak256, sign_hash, Credentials, EcdsaSignature};

fn append_fields(stream: &mut RlpStream, tx: &RawTransaction) {
    stream.append(&tx.nonce());
    stream.append(&tx.gas_price());
    stream.append(&tx.gas_limit());
    match tx.to() {
        Some(address) => {
            stream.append(address);
        }
        None => {
            stream.append_empty_data();
        }
    }
    stream.append(&tx.value());
    stream.append(&tx.data_bytes());
}

/// Canonical unsigned encoding of `tx`, the preimage of the signing digest.
pub fn encode_unsigned(tx: &RawTransaction, chain_id: Option<u64>) -> Vec<u8> {
    let field_count = match chain_id {
        Some(_) => UNSIGNED_FIELD_COUNT + 3,
        None => UNSIGNED_FIELD_COUNT,
    };
    let mut stream = RlpStream::new_list(field_count);
    append_fields(&mut stream, tx);
    if let Some(id) = chain_id {
        stream.append(&id);
        stream.append(&0u8);
        stream.append(&0u8);
    }
    stream.out().to_vec()
}

/// Keccak-256 digest that gets signed.
pub fn signing_hash(tx: &RawTransaction, chain_id: Option<u64>) -> [u8; 32] {
    keccak256(&encode_unsigned(tx, chain_id))
}

/// Computes the encoded `v` for a raw recovery id.
pub fn encode_v(recovery_id: u8, chain_id: Option<u64>) -> u64 {
    match chain_id {
        Some(id) => u64::from(recovery_id) + EIP155_V_OFFSET + 2 * id,
        None => u64::from(LEGACY_V_BASE + recovery_id),
    }
}

/// Encodes `tx` together with a signature as the 9-field signed list.
pub fn encode_signed(tx: &RawTransaction, v: u64, signature: &EcdsaSignature) -> Vec<u8> {
    let mut stream = RlpStream::new_list(SIGNED_FIELD_COUNT);
    append_fields(&mut stream, tx);
    stream.append(&v);
    stream.append(&U256::from_big_endian(&signature.r));
    stream.append(&U256::from_big_endian(&signature.s));
    stream.out().to_vec()
}

/// Signs `tx` and returns the signed encoding.
///
/// With `chain_id = None` the result carries a legacy `v` of 27 or 28,
/// which is what the private path expects.
///
/// # Example
///
/// ```rust
/// use primitive_types::U256;
/// use veil_protocol::crypto::Credentials;
/// use veil_protocol::transaction::{sign_transaction, RawTransaction};
///
/// let creds = Credentials::generate();
/// let tx = RawTransaction::builder(U256::zero(), U256::zero(), U256::from(21_000u64))
///     .build()
///     .unwrap();
///
/// let signed = sign_transaction(&tx, &creds, None);
/// assert!(!signed.is_empty());
/// ```
pub fn sign_transaction(tx: &RawTransaction, credentials: &Credentials, chain_id: Option<u64>) -> Vec<u8> {
    let hash = signing_hash(tx, chain_id);
    let signature = sign_hash(credentials, &hash);
    encode_signed(tx, encode_v(signature.recovery_id, chain_id), &signature)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
