//! Core type definitions for Veil transactions.
//!
//! The vocabulary shared by the builder, the signer, the enclave client and
//! the managers: addresses, the privacy flag, submission results, and the
//! hex helpers that sit on the signing side of every boundary crossing.

use primitive_types::{H160, U256};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::verification::TransactionError;

/// A 20-byte account address.
pub type Address = H160;

// ---------------------------------------------------------------------------
// PrivacyFlag
// ---------------------------------------------------------------------------

/// Enhanced-privacy mode requested for a private transaction.
///
/// Always carried as `Option<PrivacyFlag>`. `None` means the caller did not
/// ask for any mode, and it is omitted from the submission entirely. It is
/// NOT the same thing as `Some(StandardPrivate)`, even though a node may
/// treat the two alike.
///
/// On the wire the flag is its integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum PrivacyFlag {
    /// Plain private transaction. Code 0.
    StandardPrivate,
    /// Only parties to the original contract may transact with it. Code 1.
    PartyProtection,
    /// Every recipient must be a mandatory party. Code 2.
    StateValidation,
    /// Party protection plus private state validation across all
    /// participants. Code 3.
    PrivateStateValidation,
}

impl PrivacyFlag {
    /// Integer code sent to the node.
    pub fn code(self) -> u8 {
        match self {
            Self::StandardPrivate => 0,
            Self::PartyProtection => 1,
            Self::StateValidation => 2,
            Self::PrivateStateValidation => 3,
        }
    }
}

impl From<PrivacyFlag> for u8 {
    fn from(flag: PrivacyFlag) -> Self {
        flag.code()
    }
}

impl TryFrom<u8> for PrivacyFlag {
    type Error = TransactionError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::StandardPrivate),
            1 => Ok(Self::PartyProtection),
            2 => Ok(Self::StateValidation),
            3 => Ok(Self::PrivateStateValidation),
            other => Err(TransactionError::UnknownPrivacyFlag(other)),
        }
    }
}

impl fmt::Display for PrivacyFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StandardPrivate => write!(f, "StandardPrivate"),
            Self::PartyProtection => write!(f, "PartyProtection"),
            Self::StateValidation => write!(f, "StateValidation"),
            Self::PrivateStateValidation => write!(f, "PrivateStateValidation"),
        }
    }
}

impl std::str::FromStr for PrivacyFlag {
    type Err = TransactionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "standardprivate" | "0" => Ok(Self::StandardPrivate),
            "partyprotection" | "1" => Ok(Self::PartyProtection),
            "statevalidation" | "2" => Ok(Self::StateValidation),
            "privatestatevalidation" | "3" => Ok(Self::PrivateStateValidation),
            _ => Err(TransactionError::InvalidField {
                field: "privacy_flag",
                reason: format!("unknown privacy flag '{}'", s),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// SubmissionResult
// ---------------------------------------------------------------------------

/// What the node hands back after accepting a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResult {
    /// 0x-prefixed transaction hash as reported by the node.
    pub transaction_hash: String,
}

impl SubmissionResult {
    pub fn new(transaction_hash: impl Into<String>) -> Self {
        Self {
            transaction_hash: transaction_hash.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// PrivateTransaction (node-signed)
// ---------------------------------------------------------------------------

/// Unsigned transaction object handed to the node for node-side signing.
///
/// Only used by the node-signed path. The node signs and applies the private
/// marker itself; nothing here is ever RLP-encoded by us.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivateTransaction {
    pub from: String,
    /// Left to the node when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonce: Option<U256>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<U256>,
    #[serde(rename = "gas")]
    pub gas_limit: U256,
    /// `None` deploys a contract.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    pub value: U256,
    pub data: String,
    pub private_for: Vec<String>,
}

// ---------------------------------------------------------------------------
// Hex helpers
// ---------------------------------------------------------------------------

/// Strips an optional `0x`/`0X` prefix.
pub fn strip_hex_prefix(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

/// Decodes optionally-prefixed hex. The empty string and bare `0x` both
/// decode to an empty byte string.
pub fn decode_hex(s: &str) -> Result<Vec<u8>, TransactionError> {
    let stripped = strip_hex_prefix(s.trim());
    hex::decode(stripped).map_err(|e| TransactionError::InvalidHex {
        reason: e.to_string(),
    })
}

/// Encodes bytes as lowercase hex with a `0x` prefix.
pub fn to_hex_prefixed(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Parses a 20-byte address from optionally-prefixed hex.
pub fn parse_address(s: &str) -> Result<Address, TransactionError> {
    let bytes = decode_hex(s)?;
    if bytes.len() != 20 {
        return Err(TransactionError::InvalidField {
            field: "to",
            reason: format!("address must be 20 bytes, got {}", bytes.len()),
        });
    }
    Ok(Address::from_slice(&bytes))
}

/// Formats an address as 0x-prefixed lowercase hex.
pub fn address_to_hex(address: &Address) -> String {
    to_hex_prefixed(address.as_bytes())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
