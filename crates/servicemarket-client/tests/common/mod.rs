//! Shared in-memory ledger endpoints and signers for integration tests.

#![allow(dead_code)]

use std::future;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use servicemarket_client::{EndpointConfig, EndpointError, LedgerEndpoint, TxStatus};
use solana_sdk::hash::Hash;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::signer::{Signer, SignerError};
use solana_sdk::transaction::Transaction;

#[derive(Debug, Clone)]
pub enum Behavior {
    /// Accept and confirm on the first status poll.
    Confirm,
    /// Accept, then report pending forever.
    StayPending,
    /// Never answer the send request.
    NeverRespond,
    /// Refuse at send time (e.g. preflight failure).
    RejectOnSend(String),
    /// Accept, then report an execution failure.
    FailOnChain(String),
    /// Drop the connection while sending.
    TransportErrorOnSend,
}

pub struct MockEndpoint {
    behavior: Behavior,
    /// Transaction identifier handed back on send.
    pub signature: Signature,
    pub sent: Mutex<Vec<Transaction>>,
}

impl MockEndpoint {
    pub fn new(behavior: Behavior) -> Self {
        Self {
            behavior,
            signature: Signature::from([7u8; 64]),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl LedgerEndpoint for MockEndpoint {
    async fn latest_blockhash(&self) -> Result<Hash, EndpointError> {
        Ok(Hash::new_unique())
    }

    async fn send_transaction(&self, tx: &Transaction) -> Result<Signature, EndpointError> {
        match &self.behavior {
            Behavior::NeverRespond => future::pending().await,
            Behavior::RejectOnSend(reason) => Err(EndpointError::Rejected(reason.clone())),
            Behavior::TransportErrorOnSend => Err(EndpointError::Transport("connection reset".into())),
            _ => {
                self.sent.lock().unwrap().push(tx.clone());
                Ok(self.signature)
            }
        }
    }

    async fn signature_status(&self, _signature: &Signature) -> Result<TxStatus, EndpointError> {
        match &self.behavior {
            Behavior::Confirm => Ok(TxStatus::Confirmed),
            Behavior::FailOnChain(reason) => Ok(TxStatus::Failed(reason.clone())),
            _ => Ok(TxStatus::Pending),
        }
    }
}

/// A signer that knows its address but refuses every signing request.
pub struct RefusingSigner(pub Pubkey);

impl Signer for RefusingSigner {
    fn try_pubkey(&self) -> Result<Pubkey, SignerError> {
        Ok(self.0)
    }

    fn try_sign_message(&self, _message: &[u8]) -> Result<Signature, SignerError> {
        Err(SignerError::UserCancel("user rejected request".into()))
    }

    fn is_interactive(&self) -> bool {
        true
    }
}

pub fn fast_config() -> EndpointConfig {
    EndpointConfig {
        timeout: Duration::from_millis(300),
        poll_interval: Duration::from_millis(5),
        ..EndpointConfig::default()
    }
}
