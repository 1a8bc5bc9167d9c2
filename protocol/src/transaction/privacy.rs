//! Recovery-field rewrite that marks a signed transaction as private.
//!
//! A receiving node recognizes a private transaction by its `v`: instead of
//! the legacy 27/28 it carries 37/38. The signature itself is untouched, so
//! the node can still recover the sender by mapping 37/38 back to recid 0/1.
//!
//! The rewrite works on the decoded tree and never on the input buffer:
//!
//! 1. decode the signed bytes into a root list,
//! 2. take the first element, which must be a list of more than 3 fields,
//! 3. replace the single-byte leaf at `len - 3` (`v`): 28 becomes 38, anything
//!    else becomes 37,
//! 4. re-encode that inner list. The root wrapper is dropped.
//!
//! Any shape mismatch, including bytes that don't decode at all, returns the
//! input unchanged. This fail-open behavior is intentional compatibility with
//! existing signers and must not be turned into an error.

use crate::codec::{self, RlpNode};
use crate::config::{LEGACY_V_BASE, PRIVATE_V_EVEN, PRIVATE_V_ODD, RECOVERY_FIELD_FROM_END};

/// Maps a legacy recovery byte to its private marker.
///
/// `28 -> 38`; every other value (in practice 27) `-> 37`.
pub fn private_recovery_byte(v: u8) -> u8 {
    if v == LEGACY_V_BASE + 1 {
        PRIVATE_V_ODD
    } else {
        PRIVATE_V_EVEN
    }
}

/// Rewrites the recovery field of a decoded root, returning the new inner
/// list, or `None` when the tree doesn't have the expected shape.
pub fn rewrite_recovery_id(root: &RlpNode) -> Option<RlpNode> {
    let first = root.as_list()?.first()?;
    let fields = first.as_list()?;
    if fields.len() <= RECOVERY_FIELD_FROM_END {
        return None;
    }

    let index = fields.len() - RECOVERY_FIELD_FROM_END;
    let v = fields[index].as_single_byte()?;

    let mut rewritten = fields.to_vec();
    rewritten[index] = RlpNode::Bytes(vec![private_recovery_byte(v)]);
    Some(RlpNode::List(rewritten))
}

/// Marks a signed encoding as private.
///
/// Returns a new buffer; `signed` is never modified. If the encoding does not
/// have the expected shape the output equals the input byte for byte.
///
/// Apply exactly once per signing. Running it over an already-marked
/// encoding maps 37 and 38 both to 37, which breaks sender recovery half the
/// time.
pub fn mark_private(signed: &[u8]) -> Vec<u8> {
    let root = match codec::decode(signed) {
        Ok(root) => root,
        Err(err) => {
            tracing::debug!(error = %err, "signed encoding did not decode; leaving it unmarked");
            return signed.to_vec();
        }
    };

    match rewrite_recovery_id(&root) {
        Some(inner) => codec::encode(&inner),
        None => {
            tracing::debug!(
                len = signed.len(),
                "signed encoding has no single-byte recovery field; leaving it unmarked"
            );
            signed.to_vec()
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
