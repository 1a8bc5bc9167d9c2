//! # Binary List Codec
//!
//! The transaction wire format is a recursive, length-prefixed list of byte
//! strings (RLP). This module exposes it as a plain tree, [`RlpNode`], so the
//! privacy marker can take a signed encoding apart, swap one leaf, and put it
//! back together without caring about header arithmetic.
//!
//! The heavy lifting is done by the `rlp` crate. We only add:
//!
//! - a tree representation that can be pattern-matched and rebuilt, and
//! - a top-level decoder that accepts a concatenation of items and wraps them
//!   in a root list. A single signed transaction therefore decodes to
//!   `List([List([nonce, ..., s])])`.

pub mod rlp;

pub use self::rlp::{decode, encode, CodecError, RlpNode};
