//! `RlpNode` tree and its conversion to and from RLP bytes.

use rlp::{Encodable, Rlp, RlpStream};
use thiserror::Error;

/// Errors raised while decoding RLP bytes into a tree.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The underlying decoder rejected the input (bad header, truncated
    /// payload, non-canonical length prefix, ...).
    #[error("malformed rlp: {0}")]
    Malformed(#[from] rlp::DecoderError),
}

/// One node of a decoded RLP structure: either a byte-string leaf or a list
/// of nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RlpNode {
    /// A byte string. Integers are big-endian with leading zeros stripped;
    /// zero is the empty string.
    Bytes(Vec<u8>),
    /// An ordered list of nodes.
    List(Vec<RlpNode>),
}

impl RlpNode {
    /// Returns the children if this node is a list.
    pub fn as_list(&self) -> Option<&[RlpNode]> {
        match self {
            RlpNode::List(items) => Some(items),
            RlpNode::Bytes(_) => None,
        }
    }

    /// Returns the payload if this node is a byte string.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            RlpNode::Bytes(bytes) => Some(bytes),
            RlpNode::List(_) => None,
        }
    }

    /// Returns the byte if this node is a byte string of length exactly one.
    pub fn as_single_byte(&self) -> Option<u8> {
        match self.as_bytes() {
            Some([b]) => Some(*b),
            _ => None,
        }
    }

    fn from_rlp(rlp: &Rlp<'_>) -> Result<Self, CodecError> {
        if rlp.is_list() {
            let count = rlp.item_count()?;
            let mut items = Vec::with_capacity(count);
            for i in 0..count {
                items.push(Self::from_rlp(&rlp.at(i)?)?);
            }
            Ok(RlpNode::List(items))
        } else {
            Ok(RlpNode::Bytes(rlp.data()?.to_vec()))
        }
    }
}

impl Encodable for RlpNode {
    fn rlp_append(&self, s: &mut RlpStream) {
        match self {
            RlpNode::Bytes(bytes) => {
                s.append(bytes);
            }
            RlpNode::List(items) => {
                s.begin_list(items.len());
                for item in items {
                    s.append(item);
                }
            }
        }
    }
}

/// Decodes a byte string into a root list holding every top-level item.
///
/// Empty input yields an empty root list. Trailing garbage after the last
/// well-formed item is an error, not silently dropped.
pub fn decode(bytes: &[u8]) -> Result<RlpNode, CodecError> {
    let mut items = Vec::new();
    let mut rest = bytes;

    while !rest.is_empty() {
        let item = Rlp::new(rest);
        let total = item.payload_info()?.total();
        if total > rest.len() {
            return Err(CodecError::Malformed(rlp::DecoderError::RlpIsTooShort));
        }
        items.push(RlpNode::from_rlp(&Rlp::new(&rest[..total]))?);
        rest = &rest[total..];
    }

    Ok(RlpNode::List(items))
}

/// Encodes a node as RLP bytes.
pub fn encode(node: &RlpNode) -> Vec<u8> {
    rlp::encode(node).to_vec()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
