//! Classified client errors.
//!
//! Every failure is returned as a `ClientError` so callers can tell a request
//! that definitely did not apply from one whose outcome is unknown. `Network`
//! and `TimedOut` are always `Outcome::Unknown`: the transaction may still land.

use solana_program::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::signer::SignerError;
use thiserror::Error;

/// What the caller may assume about the ledger after a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The transaction was never accepted or was definitively refused.
    NotApplied,
    /// The transaction may or may not have been included.
    Unknown,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotApplied => "not-applied",
            Self::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("no off-curve program address found for any bump seed")]
    DerivationExhausted,

    #[error("seed of {len} bytes exceeds the {max} byte limit")]
    MaxSeedLengthExceeded { len: usize, max: usize },

    #[error("{count} seeds exceed the limit of {max}")]
    TooManySeeds { count: usize, max: usize },

    #[error("address {address} appears with conflicting signer/writable flags")]
    ConflictingAccountFlags { address: Pubkey },

    #[error("instruction `{instruction}` requires {required} account(s), got {supplied}")]
    MissingAccounts {
        instruction: &'static str,
        required: usize,
        supplied: usize,
    },

    #[error("serialization failed: {0}")]
    Serialization(String),

    #[error("serialized transaction is {size} bytes, limit is {limit}")]
    TransactionTooLarge { size: usize, limit: usize },

    #[error("signing failed: {0}")]
    SigningFailed(#[from] SignerError),

    #[error("network error (outcome unknown): {reason}")]
    Network {
        signature: Option<Signature>,
        reason: String,
    },

    #[error("transaction rejected: {reason}")]
    Rejected {
        signature: Option<Signature>,
        reason: String,
    },

    #[error("no confirmation before deadline (outcome unknown)")]
    TimedOut { signature: Option<Signature> },

    #[error("invalid endpoint config: {0}")]
    InvalidConfig(String),
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;

impl ClientError {
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    pub fn serialization(msg: impl std::fmt::Display) -> Self {
        Self::Serialization(msg.to_string())
    }

    /// Classify the failure for retry decisions.
    pub fn outcome(&self) -> Outcome {
        match self {
            Self::Network { .. } | Self::TimedOut { .. } => Outcome::Unknown,
            _ => Outcome::NotApplied,
        }
    }

    /// Signature of the transaction, if it got far enough to be signed and sent.
    pub fn signature(&self) -> Option<&Signature> {
        match self {
            Self::Network { signature, .. }
            | Self::Rejected { signature, .. }
            | Self::TimedOut { signature } => signature.as_ref(),
            _ => None,
        }
    }

    /// Stable machine-readable classification label.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DerivationExhausted => "derivation_exhausted",
            Self::MaxSeedLengthExceeded { .. } => "max_seed_length_exceeded",
            Self::TooManySeeds { .. } => "too_many_seeds",
            Self::ConflictingAccountFlags { .. } => "conflicting_account_flags",
            Self::MissingAccounts { .. } => "missing_accounts",
            Self::Serialization(_) => "serialization",
            Self::TransactionTooLarge { .. } => "transaction_too_large",
            Self::SigningFailed(_) => "signing_failed",
            Self::Network { .. } => "network_error",
            Self::Rejected { .. } => "rejected",
            Self::TimedOut { .. } => "timed_out",
            Self::InvalidConfig(_) => "invalid_config",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_outcomes_are_network_and_timeout() {
        let net = ClientError::Network { signature: None, reason: "reset".into() };
        let timeout = ClientError::TimedOut { signature: Some(Signature::default()) };
        assert_eq!(net.outcome(), Outcome::Unknown);
        assert_eq!(timeout.outcome(), Outcome::Unknown);
        assert_eq!(timeout.signature(), Some(&Signature::default()));
    }

    #[test]
    fn rejection_is_definitive() {
        let e = ClientError::Rejected { signature: None, reason: "custom program error: 0x1770".into() };
        assert_eq!(e.outcome(), Outcome::NotApplied);
        assert_eq!(e.kind(), "rejected");
        assert!(e.to_string().contains("0x1770"));
    }

    #[test]
    fn signer_errors_convert() {
        let e: ClientError = SignerError::UserCancel("declined".into()).into();
        assert_eq!(e.kind(), "signing_failed");
        assert_eq!(e.outcome(), Outcome::NotApplied);
    }
}
