//! # CLI Interface
//!
//! Defines the command-line argument structure for `veil` using `clap`
//! derive. Every connection and key setting can also come from the
//! environment (`VEIL_*`).

use clap::{Args, Parser, Subcommand};
use primitive_types::U256;

use veil_protocol::config::{DEFAULT_ENCLAVE_URL, DEFAULT_RPC_URL};
use veil_protocol::transaction::PrivacyFlag;

use crate::logging::LogFormat;

/// Veil private transaction tool.
///
/// Signs and submits transactions to a privacy-capable node. Passing
/// `--private-for` makes a transaction private: its payload goes to the
/// enclave and only the enclave key goes on-chain.
#[derive(Parser, Debug)]
#[command(name = "veil", about = "Veil private transaction tool", version, propagate_version = true)]
pub struct VeilCli {
    /// Log output format: pretty or json.
    #[arg(long, global = true, env = "VEIL_LOG_FORMAT", default_value = "pretty", value_parser = parse_log_format)]
    pub log_format: LogFormat,

    /// Default log filter when `RUST_LOG` is unset.
    #[arg(long, global = true, env = "VEIL_LOG_LEVEL", default_value = "veil=info,veil_protocol=info")]
    pub log_level: String,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign locally and submit. Private when `--private-for` is given.
    Send(SendArgs),
    /// Sign locally and print the hex encoding without submitting.
    Sign(SignArgs),
    /// Apply the private marker to an already-signed hex encoding.
    Mark(MarkArgs),
    /// Let the node sign and submit (node-held key).
    SendUnsigned(SendUnsignedArgs),
    /// Print the address of a private key.
    Address(KeyArgs),
    /// Print version information and exit.
    Version,
}

/// Node and enclave endpoints.
#[derive(Args, Debug, Clone)]
pub struct EndpointArgs {
    /// JSON-RPC endpoint of the chain node.
    #[arg(long, env = "VEIL_RPC_URL", default_value = DEFAULT_RPC_URL)]
    pub rpc_url: String,

    /// Third-party API endpoint of the enclave.
    #[arg(long, env = "VEIL_ENCLAVE_URL", default_value = DEFAULT_ENCLAVE_URL)]
    pub enclave_url: String,
}

/// Sender key material.
#[derive(Args, Debug, Clone)]
pub struct KeyArgs {
    /// Hex-encoded secp256k1 private key.
    ///
    /// **Prefer the environment variable** over the flag; flags end up in
    /// shell history.
    #[arg(long, env = "VEIL_PRIVATE_KEY", hide_env_values = true)]
    pub private_key: String,
}

/// Privacy routing.
#[derive(Args, Debug, Clone)]
pub struct PrivacyArgs {
    /// Sender's enclave public key (base64). Required for private sends.
    #[arg(long, env = "VEIL_ENCLAVE_KEY", default_value = "")]
    pub enclave_key: String,

    /// Recipient enclave keys. Comma-separated or repeated. Empty means public.
    #[arg(long, value_delimiter = ',')]
    pub private_for: Vec<String>,

    /// Privacy flag: standard-private, party-protection, state-validation,
    /// private-state-validation or 0-3. Omitted when not given.
    #[arg(long)]
    pub privacy_flag: Option<PrivacyFlag>,

    /// Mandatory recipients. Passing the flag with no values sends an
    /// explicit empty list; leaving it out omits the field.
    #[arg(long, num_args = 0.., value_delimiter = ',')]
    pub mandatory_for: Option<Vec<String>>,

    /// Chain id for replay protection on the public path.
    #[arg(long, env = "VEIL_CHAIN_ID")]
    pub chain_id: Option<u64>,
}

/// Transaction fields.
#[derive(Args, Debug, Clone)]
pub struct TxArgs {
    /// Recipient address. Omit to deploy a contract.
    #[arg(long)]
    pub to: Option<String>,

    /// Payload as hex.
    #[arg(long, default_value = "0x")]
    pub data: String,

    /// Value in wei (decimal or 0x-hex).
    #[arg(long, default_value = "0", value_parser = parse_u256)]
    pub value: U256,

    /// Gas price in wei (decimal or 0x-hex).
    #[arg(long, default_value = "0", value_parser = parse_u256)]
    pub gas_price: U256,

    /// Gas limit (decimal or 0x-hex).
    #[arg(long, default_value = "4300000", value_parser = parse_u256)]
    pub gas_limit: U256,
}

#[derive(Args, Debug)]
pub struct SendArgs {
    #[command(flatten)]
    pub endpoints: EndpointArgs,
    #[command(flatten)]
    pub key: KeyArgs,
    #[command(flatten)]
    pub privacy: PrivacyArgs,
    #[command(flatten)]
    pub tx: TxArgs,

    /// Wait for the receipt after submitting.
    #[arg(long)]
    pub wait: bool,
}

#[derive(Args, Debug)]
pub struct SignArgs {
    #[command(flatten)]
    pub endpoints: EndpointArgs,
    #[command(flatten)]
    pub key: KeyArgs,
    #[command(flatten)]
    pub privacy: PrivacyArgs,
    #[command(flatten)]
    pub tx: TxArgs,

    /// Nonce to sign with. Fetched from the node when omitted.
    #[arg(long, value_parser = parse_u256)]
    pub nonce: Option<U256>,
}

#[derive(Args, Debug)]
pub struct MarkArgs {
    /// Signed transaction as hex.
    pub signed: String,
}

#[derive(Args, Debug)]
pub struct SendUnsignedArgs {
    #[command(flatten)]
    pub endpoints: EndpointArgs,

    /// Node-managed sender account.
    #[arg(long)]
    pub from: String,

    /// Recipient enclave keys. Comma-separated or repeated.
    #[arg(long, value_delimiter = ',')]
    pub private_for: Vec<String>,

    #[command(flatten)]
    pub tx: TxArgs,

    /// Wait for the receipt after submitting.
    #[arg(long)]
    pub wait: bool,
}

/// Parses a quantity as decimal, or hex with a `0x` prefix.
pub fn parse_u256(s: &str) -> Result<U256, String> {
    let s = s.trim();
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => U256::from_str_radix(hex, 16).map_err(|e| format!("invalid hex quantity '{}': {:?}", s, e)),
        None => U256::from_dec_str(s).map_err(|e| format!("invalid quantity '{}': {:?}", s, e)),
    }
}

fn parse_log_format(s: &str) -> Result<LogFormat, String> {
    Ok(LogFormat::from_str_lossy(s))
}
