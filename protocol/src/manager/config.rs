//! Manager configuration.
//!
//! One structure with named fields replaces the pile of overloaded
//! constructors a manager would otherwise need. Defaults:
//!
//! | Field           | Default  |
//! |-----------------|----------|
//! | `private_for`   | empty (public path) |
//! | `privacy_flag`  | absent   |
//! | `mandatory_for` | absent   |
//! | `chain_id`      | absent (legacy signatures on the public path) |
//!
//! `credentials` and `enclave_key` have no default.

use crate::crypto::Credentials;
use crate::transaction::PrivacyFlag;

/// The routing-relevant part of the configuration.
///
/// Mutable at runtime through the manager's setters. Every call works on a
/// snapshot taken once at entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrivacySettings {
    /// Recipients' enclave keys. Empty selects the public path.
    pub private_for: Vec<String>,
    /// `None` is forwarded as absent, never as `StandardPrivate`.
    pub privacy_flag: Option<PrivacyFlag>,
    /// `None` is forwarded as absent. `Some(vec![])` is forwarded as an
    /// explicit empty list.
    pub mandatory_for: Option<Vec<String>>,
}

impl PrivacySettings {
    /// Returns `true` when the private path applies.
    pub fn is_private(&self) -> bool {
        !self.private_for.is_empty()
    }
}

/// Everything a [`super::RawTransactionManager`] needs at construction.
#[derive(Debug, Clone)]
pub struct ManagerConfig {
    pub credentials: Credentials,
    /// Sender's enclave public key, passed as `from` to the store call.
    pub enclave_key: String,
    pub privacy: PrivacySettings,
    /// Replay protection for the public path only.
    pub chain_id: Option<u64>,
}

impl ManagerConfig {
    /// Public-path configuration with every optional field at its default.
    pub fn new(credentials: Credentials, enclave_key: impl Into<String>) -> Self {
        Self {
            credentials,
            enclave_key: enclave_key.into(),
            privacy: PrivacySettings::default(),
            chain_id: None,
        }
    }

    pub fn with_private_for(mut self, private_for: Vec<String>) -> Self {
        self.privacy.private_for = private_for;
        self
    }

    pub fn with_privacy_flag(mut self, flag: Option<PrivacyFlag>) -> Self {
        self.privacy.privacy_flag = flag;
        self
    }

    pub fn with_mandatory_for(mut self, mandatory_for: Option<Vec<String>>) -> Self {
        self.privacy.mandatory_for = mandatory_for;
        self
    }

    pub fn with_chain_id(mut self, chain_id: Option<u64>) -> Self {
        self.chain_id = chain_id;
        self
    }
}
