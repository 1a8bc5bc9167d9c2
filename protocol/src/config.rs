//! # Protocol Configuration & Constants
//!
//! Every magic number in Veil lives here. If you're hardcoding a recovery id
//! somewhere else, you're doing it wrong and you owe the team coffee.
//!
//! Most of these values are not ours to choose: the recovery ids are fixed by
//! the transaction encoding, and the private markers are what the receiving
//! nodes look for. Change them and every private transaction you send becomes
//! a very expensive public one.

use std::time::Duration;

// ---------------------------------------------------------------------------
// Recovery Ids
// ---------------------------------------------------------------------------

/// Base recovery id for legacy (pre replay-protection) signatures.
/// `v = 27 + recid`, so a freshly signed legacy transaction carries 27 or 28.
pub const LEGACY_V_BASE: u8 = 27;

/// Offset used by replay-protected signatures:
/// `v = recid + 35 + 2 * chain_id`.
pub const EIP155_V_OFFSET: u64 = 35;

/// Recovery id marking a private transaction whose signature had `recid = 0`.
pub const PRIVATE_V_EVEN: u8 = 37;

/// Recovery id marking a private transaction whose signature had `recid = 1`.
pub const PRIVATE_V_ODD: u8 = 38;

/// Number of fields in a signed legacy encoding:
/// `[nonce, gasPrice, gasLimit, to, value, data, v, r, s]`.
pub const SIGNED_FIELD_COUNT: usize = 9;

/// Number of fields in the unsigned encoding that gets hashed for signing.
pub const UNSIGNED_FIELD_COUNT: usize = 6;

/// Distance of the `v` field from the end of a signed field list. `r` and `s`
/// follow it, so it sits at `len - 3`.
pub const RECOVERY_FIELD_FROM_END: usize = 3;

// ---------------------------------------------------------------------------
// Node Identification
// ---------------------------------------------------------------------------

/// Substring (case-insensitive) that a node's `web3_clientVersion` must
/// contain before we trust it with node-signed private transactions.
pub const PRIVACY_CLIENT_MARKER: &str = "quorum";

/// Block tag used when asking for the next nonce. "pending" counts
/// transactions sitting in the node's pool so back-to-back sends don't
/// collide.
pub const NONCE_BLOCK_TAG: &str = "pending";

// ---------------------------------------------------------------------------
// Receipt Polling
// ---------------------------------------------------------------------------

/// Default number of receipt polls before giving up.
pub const DEFAULT_POLLING_ATTEMPTS: u32 = 20;

/// Default pause between receipt polls. 20 x 1s gives a block producer
/// twenty seconds to include us, which is plenty on a permissioned chain.
pub const DEFAULT_POLLING_INTERVAL: Duration = Duration::from_millis(1_000);

// ---------------------------------------------------------------------------
// Endpoints
// ---------------------------------------------------------------------------

/// Default JSON-RPC endpoint of the chain node.
pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:22000";

/// Default third-party API endpoint of the enclave.
pub const DEFAULT_ENCLAVE_URL: &str = "http://127.0.0.1:9081";

/// Path of the enclave's raw-payload store endpoint.
pub const ENCLAVE_STORE_RAW_PATH: &str = "/storeraw";

/// HTTP request timeout for both the node and the enclave.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// JSON-RPC protocol version string. Always "2.0", forever.
pub const JSONRPC_VERSION: &str = "2.0";

// ---------------------------------------------------------------------------
// Utility
// ---------------------------------------------------------------------------

/// Returns `true` if `v` is one of the two private markers.
pub fn is_private_v(v: u64) -> bool {
    v == PRIVATE_V_EVEN as u64 || v == PRIVATE_V_ODD as u64
}

/// Returns `true` if a node's client version string identifies a node that
/// understands private transactions.
pub fn supports_privacy(client_version: &str) -> bool {
    client_version
        .to_ascii_lowercase()
        .contains(PRIVACY_CLIENT_MARKER)
}
