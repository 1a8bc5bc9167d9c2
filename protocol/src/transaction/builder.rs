//! Transaction construction via the builder pattern.
//!
//! The [`RawTransactionBuilder`] assembles an unsigned [`RawTransaction`] from
//! `(nonce, gas_price, gas_limit, to, value, data)`. It does not sign; that
//! happens in [`super::signing`]. This separation keeps construction testable
//! without key material.
//!
//! A built transaction is immutable. The private path never edits one in
//! place: it derives a new transaction with [`RawTransaction::with_data`].

use primitive_types::U256;

use super::types::{decode_hex, to_hex_prefixed, Address};
use super::verification::TransactionError;

// ---------------------------------------------------------------------------
// RawTransaction
// ---------------------------------------------------------------------------

/// An unsigned legacy transaction.
///
/// Only [`RawTransactionBuilder::build`] and [`RawTransaction::with_data`]
/// produce one, and both hold `data` as decoded bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTransaction {
    nonce: U256,
    gas_price: U256,
    gas_limit: U256,
    /// `None` creates a contract.
    to: Option<Address>,
    value: U256,
    data: Vec<u8>,
}

impl RawTransaction {
    /// Shorthand for a builder with the required nonce and gas fields set.
    pub fn builder(nonce: U256, gas_price: U256, gas_limit: U256) -> RawTransactionBuilder {
        RawTransactionBuilder::new()
            .nonce(nonce)
            .gas_price(gas_price)
            .gas_limit(gas_limit)
    }

    pub fn nonce(&self) -> U256 {
        self.nonce
    }

    pub fn gas_price(&self) -> U256 {
        self.gas_price
    }

    pub fn gas_limit(&self) -> U256 {
        self.gas_limit
    }

    pub fn to(&self) -> Option<&Address> {
        self.to.as_ref()
    }

    pub fn value(&self) -> U256 {
        self.value
    }

    /// The payload as 0x-prefixed lowercase hex.
    pub fn data(&self) -> String {
        to_hex_prefixed(&self.data)
    }

    /// The payload as raw bytes.
    pub fn data_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Returns `true` if this transaction deploys a contract.
    pub fn is_contract_creation(&self) -> bool {
        self.to.is_none()
    }

    /// Derives a copy sharing every field except `data`.
    pub fn with_data(&self, data: &[u8]) -> RawTransaction {
        RawTransaction {
            data: data.to_vec(),
            ..self.clone()
        }
    }
}

// ---------------------------------------------------------------------------
// RawTransactionBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`RawTransaction`].
///
/// # Usage
///
/// ```rust
/// use primitive_types::U256;
/// use veil_protocol::transaction::RawTransactionBuilder;
///
/// let tx = RawTransactionBuilder::new()
///     .nonce(U256::from(7u64))
///     .gas_price(U256::zero())
///     .gas_limit(U256::from(4_300_000u64))
///     .to_hex("0x2c7536e3605d9c16a7a3d7b1898e529396a65c23").unwrap()
///     .data("0xdeadbeef")
///     .build()
///     .unwrap();
///
/// assert_eq!(tx.data(), "0xdeadbeef");
/// ```
///
/// Defaults: every quantity is zero, `to` is absent (contract creation) and
/// `data` is empty.
#[derive(Debug, Clone, Default)]
pub struct RawTransactionBuilder {
    nonce: U256,
    gas_price: U256,
    gas_limit: U256,
    to: Option<Address>,
    value: U256,
    data: String,
}

impl RawTransactionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the sender's account nonce.
    pub fn nonce(mut self, nonce: U256) -> Self {
        self.nonce = nonce;
        self
    }

    pub fn gas_price(mut self, gas_price: U256) -> Self {
        self.gas_price = gas_price;
        self
    }

    pub fn gas_limit(mut self, gas_limit: U256) -> Self {
        self.gas_limit = gas_limit;
        self
    }

    /// Sets the recipient. `None` makes this a contract creation.
    pub fn to(mut self, to: Option<Address>) -> Self {
        self.to = to;
        self
    }

    /// Sets the recipient from hex. An empty string means contract creation.
    pub fn to_hex(self, to: &str) -> Result<Self, TransactionError> {
        if to.trim().is_empty() {
            return Ok(self.to(None));
        }
        let address = super::types::parse_address(to)?;
        Ok(self.to(Some(address)))
    }

    pub fn value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }

    /// Sets the payload from hex (with or without `0x`).
    pub fn data(mut self, data: &str) -> Self {
        self.data = data.to_string();
        self
    }

    /// Sets the payload from raw bytes.
    pub fn data_bytes(mut self, data: &[u8]) -> Self {
        self.data = to_hex_prefixed(data);
        self
    }

    /// Consumes the builder and produces a [`RawTransaction`].
    ///
    /// # Errors
    ///
    /// [`TransactionError::InvalidHex`] if `data` is not valid hex.
    pub fn build(self) -> Result<RawTransaction, TransactionError> {
        let data = decode_hex(&self.data)?;
        Ok(RawTransaction {
            nonce: self.nonce,
            gas_price: self.gas_price,
            gas_limit: self.gas_limit,
            to: self.to,
            value: self.value,
            data,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
