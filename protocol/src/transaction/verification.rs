//! Signed-encoding inspection: decoding, `v` classification and sender
//! recovery.
//!
//! The recovery-field rewrite only works if the receiving node can still
//! recover the sender from a marked transaction. [`recover_sender`] does what
//! such a node does, which lets tests (and operators) confirm that a marked
//! encoding still names the right signer.
//!
//! `v` classification:
//!
//! | `v`        | class              | recid           | signed digest        |
//! |------------|--------------------|-----------------|----------------------|
//! | 27, 28     | legacy             | `v - 27`        | 6-field preimage     |
//! | 37, 38     | private            | `v - 37`        | 6-field preimage     |
//! | >= 35      | replay-protected   | `(v - 35) % 2`  | 9-field preimage     |
//!
//! 37/38 would also be replay-protected values for chain id 1. Private wins:
//! a private-capable chain never runs with chain id 1.

use primitive_types::U256;
use thiserror::Error;

use super::builder::{RawTransaction, RawTransactionBuilder};
use super::signing::signing_hash;
use super::types::Address;
use crate::codec::{self, RlpNode};
use crate::config::{is_private_v, EIP155_V_OFFSET, LEGACY_V_BASE, PRIVATE_V_EVEN, SIGNED_FIELD_COUNT};
use crate::crypto::{recover_address, EcdsaSignature, SignatureError};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors raised while building, decoding or inspecting transactions.
#[derive(Debug, Error)]
pub enum TransactionError {
    /// A hex string could not be decoded.
    #[error("invalid hex: {reason}")]
    InvalidHex { reason: String },

    /// A field has the wrong size or an impossible value.
    #[error("invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    /// A privacy flag code outside 0..=3.
    #[error("unknown privacy flag code: {0}")]
    UnknownPrivacyFlag(u8),

    /// The bytes are not a 9-field signed transaction.
    #[error("malformed signed transaction: {reason}")]
    MalformedEncoding { reason: String },

    /// `v` is not a recognized recovery value.
    #[error("unrecognized recovery value v = {0}")]
    UnrecognizedV(u64),

    /// Public key recovery failed.
    #[error(transparent)]
    Signature(#[from] SignatureError),
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// How a signed transaction's `v` is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryKind {
    /// `v = 27 + recid`.
    Legacy,
    /// `v = 37 + recid`, marked private.
    Private,
    /// `v = recid + 35 + 2 * chain_id`.
    ReplayProtected { chain_id: u64 },
}

impl RecoveryKind {
    /// Classifies `v`, returning the kind and the raw recovery id.
    pub fn classify(v: u64) -> Result<(RecoveryKind, u8), TransactionError> {
        let legacy = u64::from(LEGACY_V_BASE);
        if v == legacy || v == legacy + 1 {
            Ok((RecoveryKind::Legacy, (v - legacy) as u8))
        } else if is_private_v(v) {
            Ok((RecoveryKind::Private, (v - u64::from(PRIVATE_V_EVEN)) as u8))
        } else if v >= EIP155_V_OFFSET {
            let chain_id = (v - EIP155_V_OFFSET) / 2;
            let recovery_id = ((v - EIP155_V_OFFSET) % 2) as u8;
            Ok((RecoveryKind::ReplayProtected { chain_id }, recovery_id))
        } else {
            Err(TransactionError::UnrecognizedV(v))
        }
    }

    /// Chain id baked into the signing digest for this kind.
    pub fn chain_id(&self) -> Option<u64> {
        match self {
            RecoveryKind::ReplayProtected { chain_id } => Some(*chain_id),
            RecoveryKind::Legacy | RecoveryKind::Private => None,
        }
    }
}

/// A decoded signed transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    pub transaction: RawTransaction,
    pub v: u64,
    pub kind: RecoveryKind,
    pub signature: EcdsaSignature,
}

impl SignedTransaction {
    /// Returns `true` if `v` carries the private marker.
    pub fn is_private(&self) -> bool {
        self.kind == RecoveryKind::Private
    }
}

fn malformed(reason: impl Into<String>) -> TransactionError {
    TransactionError::MalformedEncoding {
        reason: reason.into(),
    }
}

fn leaf<'a>(node: &'a RlpNode, field: &'static str) -> Result<&'a [u8], TransactionError> {
    node.as_bytes()
        .ok_or_else(|| malformed(format!("{} is a list, expected bytes", field)))
}

fn quantity(node: &RlpNode, field: &'static str) -> Result<U256, TransactionError> {
    let bytes = leaf(node, field)?;
    if bytes.len() > 32 {
        return Err(malformed(format!("{} exceeds 32 bytes", field)));
    }
    Ok(U256::from_big_endian(bytes))
}

fn word(node: &RlpNode, field: &'static str) -> Result<[u8; 32], TransactionError> {
    let bytes = leaf(node, field)?;
    if bytes.len() > 32 {
        return Err(malformed(format!("{} exceeds 32 bytes", field)));
    }
    let mut out = [0u8; 32];
    out[32 - bytes.len()..].copy_from_slice(bytes);
    Ok(out)
}

/// Decodes a 9-field signed encoding.
pub fn decode_signed(bytes: &[u8]) -> Result<SignedTransaction, TransactionError> {
    let root = codec::decode(bytes).map_err(|e| malformed(e.to_string()))?;
    let items = root.as_list().unwrap_or_default();
    if items.len() != 1 {
        return Err(malformed(format!("expected one top-level item, found {}", items.len())));
    }
    let fields = items[0]
        .as_list()
        .ok_or_else(|| malformed("top-level item is not a list"))?;
    if fields.len() != SIGNED_FIELD_COUNT {
        return Err(malformed(format!(
            "expected {} fields, found {}",
            SIGNED_FIELD_COUNT,
            fields.len()
        )));
    }

    let to = match leaf(&fields[3], "to")? {
        [] => None,
        bytes if bytes.len() == 20 => Some(Address::from_slice(bytes)),
        bytes => return Err(malformed(format!("to is {} bytes", bytes.len()))),
    };

    let transaction = RawTransactionBuilder::new()
        .nonce(quantity(&fields[0], "nonce")?)
        .gas_price(quantity(&fields[1], "gasPrice")?)
        .gas_limit(quantity(&fields[2], "gasLimit")?)
        .to(to)
        .value(quantity(&fields[4], "value")?)
        .data_bytes(leaf(&fields[5], "data")?)
        .build()?;

    let v_word = quantity(&fields[6], "v")?;
    if v_word > U256::from(u64::MAX) {
        return Err(malformed("v exceeds 64 bits"));
    }
    let v = v_word.low_u64();
    let (kind, recovery_id) = RecoveryKind::classify(v)?;

    Ok(SignedTransaction {
        transaction,
        v,
        kind,
        signature: EcdsaSignature {
            recovery_id,
            r: word(&fields[7], "r")?,
            s: word(&fields[8], "s")?,
        },
    })
}

// ---------------------------------------------------------------------------
// Recovery
// ---------------------------------------------------------------------------

/// Recovers the sender of a decoded signed transaction.
pub fn recover_signer(signed: &SignedTransaction) -> Result<Address, TransactionError> {
    let hash = signing_hash(&signed.transaction, signed.kind.chain_id());
    Ok(recover_address(&hash, &signed.signature)?)
}

/// Decodes `bytes` and recovers the sender. Works for legacy, private and
/// replay-protected encodings.
pub fn recover_sender(bytes: &[u8]) -> Result<Address, TransactionError> {
    recover_signer(&decode_signed(bytes)?)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
