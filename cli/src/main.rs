// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Veil CLI
//!
//! Entry point for the `veil` binary. Parses CLI arguments, initializes
//! logging, and runs one command against the configured node and enclave.
//!
//! - `send`          — sign locally and submit (private with `--private-for`)
//! - `sign`          — sign locally and print the hex encoding
//! - `mark`          — apply the private marker to a signed hex encoding
//! - `send-unsigned` — let the node sign and submit
//! - `address`       — print the address for a private key
//! - `version`       — print build version information

mod cli;
mod logging;

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::sync::Arc;

use veil_protocol::crypto::Credentials;
use veil_protocol::enclave::{QuorumEnclave, TesseraClient};
use veil_protocol::manager::{ClientTransactionManager, ManagerConfig, PrivacySettings, RawTransactionManager};
use veil_protocol::network::{NodeRpc, TransactionReceipt};
use veil_protocol::transaction::types::{decode_hex, parse_address, to_hex_prefixed};
use veil_protocol::transaction::{mark_private, RawTransaction, SubmissionResult};

use cli::{Commands, EndpointArgs, KeyArgs, PrivacyArgs, VeilCli};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = VeilCli::parse();
    logging::init_logging(&cli.log_level, cli.log_format);

    match cli.command {
        Commands::Send(args) => send(args).await,
        Commands::Sign(args) => sign(args).await,
        Commands::Mark(args) => mark(args),
        Commands::SendUnsigned(args) => send_unsigned(args).await,
        Commands::Address(args) => address(args),
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

fn load_credentials(key: &KeyArgs) -> Result<Credentials> {
    Credentials::from_hex(&key.private_key).context("invalid private key")
}

fn privacy_settings(privacy: &PrivacyArgs) -> Result<PrivacySettings> {
    let settings = PrivacySettings {
        private_for: privacy.private_for.clone(),
        privacy_flag: privacy.privacy_flag,
        mandatory_for: privacy.mandatory_for.clone(),
    };
    if settings.is_private() && privacy.enclave_key.is_empty() {
        bail!("--enclave-key (or VEIL_ENCLAVE_KEY) is required with --private-for");
    }
    Ok(settings)
}

/// Builds a raw manager wired to the node and enclave at `endpoints`.
fn raw_manager(
    endpoints: &EndpointArgs,
    key: &KeyArgs,
    privacy: &PrivacyArgs,
) -> Result<(RawTransactionManager, NodeRpc)> {
    let credentials = load_credentials(key)?;
    let settings = privacy_settings(privacy)?;

    let node = NodeRpc::http(&endpoints.rpc_url)
        .with_context(|| format!("failed to create RPC client for {}", endpoints.rpc_url))?;
    let store = TesseraClient::new(&endpoints.enclave_url)
        .with_context(|| format!("failed to create enclave client for {}", endpoints.enclave_url))?;
    let enclave = QuorumEnclave::new(store, node.clone());

    let mut config = ManagerConfig::new(credentials, privacy.enclave_key.clone()).with_chain_id(privacy.chain_id);
    config.privacy = settings;

    tracing::debug!(
        rpc_url = %endpoints.rpc_url,
        enclave_url = %endpoints.enclave_url,
        private = config.privacy.is_private(),
        "manager configured"
    );
    Ok((RawTransactionManager::new(config, Arc::new(enclave), node.clone()), node))
}

fn parse_to(to: &Option<String>) -> Result<Option<veil_protocol::transaction::Address>> {
    to.as_deref()
        .map(parse_address)
        .transpose()
        .context("invalid --to address")
}

async fn send(args: cli::SendArgs) -> Result<()> {
    let (manager, _) = raw_manager(&args.endpoints, &args.key, &args.privacy)?;
    let to = parse_to(&args.tx.to)?;

    let result = manager
        .send_transaction(args.tx.gas_price, args.tx.gas_limit, to, &args.tx.data, args.tx.value)
        .await
        .context("failed to send transaction")?;
    println!("{}", result.transaction_hash);

    if args.wait {
        let receipt = manager.wait_for_receipt(&result).await?;
        print_receipt(&receipt)?;
    }
    Ok(())
}

async fn sign(args: cli::SignArgs) -> Result<()> {
    let (manager, node) = raw_manager(&args.endpoints, &args.key, &args.privacy)?;

    let nonce = match args.nonce {
        Some(nonce) => nonce,
        None => node
            .transaction_count(&manager.from_address())
            .await
            .context("failed to fetch nonce")?,
    };

    let tx = RawTransaction::builder(nonce, args.tx.gas_price, args.tx.gas_limit)
        .to(parse_to(&args.tx.to)?)
        .value(args.tx.value)
        .data(&args.tx.data)
        .build()?;

    // Private payloads never get signed in the clear.
    let tx = if manager.settings().is_private() {
        manager.store_payload(&tx).await.context("failed to store payload in enclave")?
    } else {
        tx
    };

    println!("{}", manager.sign(&tx));
    Ok(())
}

fn mark(args: cli::MarkArgs) -> Result<()> {
    let signed = decode_hex(&args.signed).context("signed transaction is not hex")?;
    let marked = mark_private(&signed);
    if marked == signed {
        tracing::warn!("input has no single-byte recovery field; printed unchanged");
    }
    println!("{}", to_hex_prefixed(&marked));
    Ok(())
}

async fn send_unsigned(args: cli::SendUnsignedArgs) -> Result<()> {
    let node = NodeRpc::http(&args.endpoints.rpc_url)
        .with_context(|| format!("failed to create RPC client for {}", args.endpoints.rpc_url))?;
    let manager = ClientTransactionManager::connect(node, args.from.clone(), args.private_for.clone())
        .await
        .context("node rejected")?;

    let result: SubmissionResult = manager
        .send_transaction(
            args.tx.gas_price,
            args.tx.gas_limit,
            args.tx.to.clone(),
            &args.tx.data,
            args.tx.value,
        )
        .await
        .context("failed to send transaction")?;
    println!("{}", result.transaction_hash);

    if args.wait {
        let receipt = manager.wait_for_receipt(&result).await?;
        print_receipt(&receipt)?;
    }
    Ok(())
}

fn address(args: KeyArgs) -> Result<()> {
    let credentials = load_credentials(&args)?;
    println!("{}", credentials.address_hex());
    Ok(())
}

fn print_receipt(receipt: &TransactionReceipt) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(receipt)?);
    if !receipt.is_success() {
        bail!("transaction {} reverted", receipt.transaction_hash);
    }
    Ok(())
}

/// Prints version information to stdout.
fn print_version() {
    println!("veil {}", env!("CARGO_PKG_VERSION"));
    println!("rustc {}", rustc_version());
}

/// Returns the Rust compiler version used to build this binary.
fn rustc_version() -> &'static str {
    option_env!("RUSTC_VERSION").unwrap_or("unknown")
}
